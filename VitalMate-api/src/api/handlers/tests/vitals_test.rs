#[cfg(test)]
mod vitals_tests {
    use std::sync::Arc;
    use vital_mate_domain::entities::vital::{
        CreateVitalRequest, Severity, TimeOfDay, UpdateVitalRequest, VitalType, VitalValue,
    };
    use vital_mate_domain::services::VitalServiceTrait;
    use vital_mate_domain::testing::MockVitalService;

    use chrono::Utc;

    fn sugar_request(reading: f64, recorded_at: &str) -> CreateVitalRequest {
        CreateVitalRequest {
            vital_type: VitalType::BloodSugar,
            value: VitalValue::Scalar {
                reading,
                unit: Some("mg/dL".to_string()),
            },
            recorded_at: Some(recorded_at.to_string()),
            time_of_day: Some(TimeOfDay::Morning),
            notes: None,
        }
    }

    #[test]
    fn test_mock_service_creation() {
        // Verify the mock service satisfies the trait object the handlers use
        let mock_service = Arc::new(MockVitalService::new());
        let _: Arc<dyn VitalServiceTrait + Send + Sync> = mock_service;
    }

    #[tokio::test]
    async fn test_create_reading_with_mock() {
        let mock_service = Arc::new(MockVitalService::new());

        let request = CreateVitalRequest {
            vital_type: VitalType::BloodPressure,
            value: VitalValue::BloodPressure {
                systolic: 120.0,
                diastolic: 80.0,
                unit: Some("mmHg".to_string()),
            },
            recorded_at: Some(Utc::now().to_rfc3339()),
            time_of_day: Some(TimeOfDay::Morning),
            notes: None,
        };

        let result = mock_service.create_reading(request).await;

        assert!(result.is_ok());
        let reading = result.unwrap();
        assert_eq!(reading.vital_type, VitalType::BloodPressure);
        assert_eq!(reading.value.systolic(), Some(120.0));
        assert_eq!(reading.value.diastolic(), Some(80.0));
        assert!(reading.is_normal);
        assert_eq!(reading.severity, Severity::Normal);
    }

    #[tokio::test]
    async fn test_mock_with_preconfigured_validation_failure() {
        let mock_service = Arc::new(MockVitalService::new().with_validation_failure());

        let request = sugar_request(110.0, &Utc::now().to_rfc3339());
        let result = mock_service.create_reading(request).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("validation"));
    }

    #[tokio::test]
    async fn test_mock_filtering_and_pagination() {
        let mock_service = Arc::new(MockVitalService::new());

        for (reading, when) in [
            (95.0, "2024-03-01T08:00:00Z"),
            (110.0, "2024-03-02T08:00:00Z"),
            (250.0, "2024-03-03T08:00:00Z"),
        ] {
            mock_service
                .create_reading(sugar_request(reading, when))
                .await
                .unwrap();
        }
        mock_service
            .create_reading(CreateVitalRequest {
                vital_type: VitalType::HeartRate,
                value: VitalValue::Scalar {
                    reading: 72.0,
                    unit: Some("bpm".to_string()),
                },
                recorded_at: Some("2024-03-03T09:00:00Z".to_string()),
                time_of_day: None,
                notes: None,
            })
            .await
            .unwrap();

        // Type filter
        let (sugar_readings, sugar_total) = mock_service
            .get_filtered_readings(Some(VitalType::BloodSugar), None, None, None, None, Some(true))
            .await
            .unwrap();
        assert_eq!(sugar_total, 3);
        assert!(sugar_readings.iter().all(|r| r.vital_type == VitalType::BloodSugar));

        // Newest first when sorted descending
        assert_eq!(sugar_readings[0].value.reading(), Some(250.0));

        // Limit returns a page but reports the full count
        let (page, total) = mock_service
            .get_filtered_readings(None, None, None, Some(2), Some(0), Some(true))
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 2);

        // Date range excludes readings outside the window
        let (ranged, _) = mock_service
            .get_filtered_readings(
                None,
                Some("2024-03-02T00:00:00Z".to_string()),
                Some("2024-03-02T23:59:59Z".to_string()),
                None,
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].value.reading(), Some(110.0));
    }

    #[tokio::test]
    async fn test_mock_update_and_delete() {
        let mock_service = Arc::new(MockVitalService::new());

        let created = mock_service
            .create_reading(sugar_request(110.0, &Utc::now().to_rfc3339()))
            .await
            .unwrap();
        assert!(created.is_normal);

        let updated = mock_service
            .update_reading(
                &created.id,
                UpdateVitalRequest {
                    vital_type: None,
                    value: Some(VitalValue::Scalar {
                        reading: 250.0,
                        unit: Some("mg/dL".to_string()),
                    }),
                    recorded_at: None,
                    time_of_day: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_normal);
        assert_eq!(updated.severity, Severity::Critical);

        mock_service.delete_reading(&created.id).await.unwrap();
        assert!(mock_service.get_reading_by_id(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_summary() {
        let mock_service = Arc::new(MockVitalService::new());

        for (reading, when) in [
            (110.0, "2024-03-01T08:00:00Z"),
            (250.0, "2024-03-02T08:00:00Z"),
        ] {
            mock_service
                .create_reading(sugar_request(reading, when))
                .await
                .unwrap();
        }

        let (readings, _) = mock_service
            .get_filtered_readings(None, None, None, None, None, Some(true))
            .await
            .unwrap();
        let summary = mock_service.calculate_summary(&readings, 30);

        assert_eq!(summary.period_days, 30);
        let sugar = summary.vitals.get(&VitalType::BloodSugar).unwrap();
        assert_eq!(sugar.count, 2);
        assert_eq!(sugar.abnormal_count, 1);
    }
}
