//! Vital sign classification and aggregation
//!
//! Pure functions over reading sets: threshold-based severity scoring,
//! per-type averages, and trend direction between a recent and an older
//! sub-window. No I/O and no shared state; persistence and request
//! handling live in the calling layers.

use thiserror::Error;

use crate::entities::vital::{
    Severity, Trend, VitalAverage, VitalReading, VitalStatus, VitalType, VitalValue,
};

/// Errors from the aggregation functions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    /// The reading set was empty
    #[error("No readings available to compute an average")]
    EmptyInput,
}

/// Classify a vital reading against the fixed healthy-band thresholds.
///
/// Deterministic and total: a value whose shape does not match the type
/// (or a type with no thresholds, like weight) falls through to normal.
///
/// Heart rate and temperature label any out-of-band, non-critical value
/// `high` even below the healthy band; a resting heart rate of 50 comes
/// back `high`, not `low`. Kept intact for parity with stored history.
pub fn classify(vital_type: VitalType, value: &VitalValue) -> VitalStatus {
    match (vital_type, value) {
        (VitalType::BloodPressure, VitalValue::BloodPressure { systolic, diastolic, .. }) => {
            if *systolic < 90.0 || *diastolic < 60.0 {
                VitalStatus::abnormal(Severity::Low)
            } else if *systolic > 140.0 || *diastolic > 90.0 {
                if *systolic > 180.0 || *diastolic > 110.0 {
                    VitalStatus::abnormal(Severity::Critical)
                } else {
                    VitalStatus::abnormal(Severity::High)
                }
            } else {
                VitalStatus::normal()
            }
        }

        (VitalType::BloodSugar, VitalValue::Scalar { reading, .. }) => {
            if *reading < 70.0 {
                VitalStatus::abnormal(Severity::Low)
            } else if *reading > 140.0 {
                if *reading > 200.0 {
                    VitalStatus::abnormal(Severity::Critical)
                } else {
                    VitalStatus::abnormal(Severity::High)
                }
            } else {
                VitalStatus::normal()
            }
        }

        (VitalType::HeartRate, VitalValue::Scalar { reading, .. }) => {
            if *reading < 60.0 || *reading > 100.0 {
                if *reading < 40.0 || *reading > 120.0 {
                    VitalStatus::abnormal(Severity::Critical)
                } else {
                    VitalStatus::abnormal(Severity::High)
                }
            } else {
                VitalStatus::normal()
            }
        }

        (VitalType::Temperature, VitalValue::Scalar { reading, .. }) => {
            if *reading < 97.0 || *reading > 99.5 {
                if *reading < 95.0 || *reading > 102.0 {
                    VitalStatus::abnormal(Severity::Critical)
                } else {
                    VitalStatus::abnormal(Severity::High)
                }
            } else {
                VitalStatus::normal()
            }
        }

        (VitalType::OxygenSaturation, VitalValue::Scalar { reading, .. }) => {
            if *reading < 95.0 {
                if *reading < 90.0 {
                    VitalStatus::abnormal(Severity::Critical)
                } else {
                    VitalStatus::abnormal(Severity::Low)
                }
            } else {
                VitalStatus::normal()
            }
        }

        // Weight has no thresholds; mismatched value shapes also land here
        _ => VitalStatus::normal(),
    }
}

/// Average a reading set for a vital type.
///
/// Blood pressure averages systolic and diastolic independently, each
/// rounded to the nearest integer; other types average the scalar
/// reading rounded to one decimal place.
pub fn average(readings: &[VitalReading], vital_type: VitalType) -> Result<VitalAverage, EvaluationError> {
    if readings.is_empty() {
        return Err(EvaluationError::EmptyInput);
    }

    let count = readings.len() as f64;

    if vital_type == VitalType::BloodPressure {
        let systolic_sum: f64 = readings.iter().filter_map(|r| r.value.systolic()).sum();
        let diastolic_sum: f64 = readings.iter().filter_map(|r| r.value.diastolic()).sum();

        Ok(VitalAverage::BloodPressure {
            systolic: (systolic_sum / count).round() as i64,
            diastolic: (diastolic_sum / count).round() as i64,
        })
    } else {
        let sum: f64 = readings.iter().filter_map(|r| r.value.reading()).sum();
        Ok(VitalAverage::Scalar(((sum / count) * 10.0).round() / 10.0))
    }
}

/// Trend direction between the newest and oldest sub-windows of a
/// reading history.
///
/// Expects readings sorted most-recent-first, as the query layer
/// produces them. The recent window is the first min(3, n) readings and
/// the older window the last min(3, n); for n <= 3 the windows overlap,
/// which matches the stored history semantics. Comparison field is
/// systolic for blood pressure, the scalar reading otherwise.
///
/// Fewer than two readings yield `stable` rather than an error. An
/// older-window average of zero would make the percent change
/// undefined, so that case also yields `stable`.
pub fn trend(readings: &[VitalReading], vital_type: VitalType) -> Trend {
    if readings.len() < 2 {
        return Trend::Stable;
    }

    let window = readings.len().min(3);
    let recent = &readings[..window];
    let older = &readings[readings.len() - window..];

    let recent_avg = window_mean(recent, vital_type);
    let older_avg = window_mean(older, vital_type);

    if older_avg == 0.0 {
        return Trend::Stable;
    }

    let percent_change = (recent_avg - older_avg) / older_avg * 100.0;

    if percent_change > 5.0 {
        Trend::Increasing
    } else if percent_change < -5.0 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Mean of the trend comparison field over a window
fn window_mean(readings: &[VitalReading], vital_type: VitalType) -> f64 {
    let sum: f64 = readings
        .iter()
        .map(|r| {
            if vital_type == VitalType::BloodPressure {
                r.value.systolic().unwrap_or(0.0)
            } else {
                r.value.reading().unwrap_or(0.0)
            }
        })
        .sum();

    sum / readings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vital::TimeOfDay;

    fn bp_value(systolic: f64, diastolic: f64) -> VitalValue {
        VitalValue::BloodPressure {
            systolic,
            diastolic,
            unit: Some("mmHg".to_string()),
        }
    }

    fn scalar_value(reading: f64) -> VitalValue {
        VitalValue::Scalar {
            reading,
            unit: None,
        }
    }

    fn reading(vital_type: VitalType, value: VitalValue, recorded_at: &str) -> VitalReading {
        let status = classify(vital_type, &value);
        VitalReading {
            id: recorded_at.to_string(),
            vital_type,
            value,
            recorded_at: recorded_at.to_string(),
            time_of_day: TimeOfDay::Morning,
            notes: None,
            is_normal: status.is_normal,
            severity: status.severity,
            created_at: recorded_at.to_string(),
            updated_at: recorded_at.to_string(),
        }
    }

    #[test]
    fn test_blood_pressure_healthy_band_is_normal() {
        for systolic in [90.0, 100.0, 120.0, 140.0] {
            for diastolic in [60.0, 75.0, 90.0] {
                let status = classify(VitalType::BloodPressure, &bp_value(systolic, diastolic));
                assert_eq!(status, VitalStatus::normal(), "{}/{}", systolic, diastolic);
            }
        }
    }

    #[test]
    fn test_blood_pressure_tiers() {
        assert_eq!(
            classify(VitalType::BloodPressure, &bp_value(85.0, 70.0)),
            VitalStatus::abnormal(Severity::Low)
        );
        assert_eq!(
            classify(VitalType::BloodPressure, &bp_value(150.0, 85.0)),
            VitalStatus::abnormal(Severity::High)
        );
        assert_eq!(
            classify(VitalType::BloodPressure, &bp_value(185.0, 85.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
        assert_eq!(
            classify(VitalType::BloodPressure, &bp_value(150.0, 115.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
    }

    #[test]
    fn test_blood_sugar_tiers() {
        assert_eq!(
            classify(VitalType::BloodSugar, &scalar_value(65.0)),
            VitalStatus::abnormal(Severity::Low)
        );
        assert_eq!(
            classify(VitalType::BloodSugar, &scalar_value(100.0)),
            VitalStatus::normal()
        );
        assert_eq!(
            classify(VitalType::BloodSugar, &scalar_value(150.0)),
            VitalStatus::abnormal(Severity::High)
        );
        assert_eq!(
            classify(VitalType::BloodSugar, &scalar_value(250.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
    }

    #[test]
    fn test_low_heart_rate_is_labeled_high() {
        // Below the healthy band but above the critical floor the tier
        // is "high", matching the behavior history was stored with.
        let status = classify(VitalType::HeartRate, &scalar_value(50.0));
        assert_eq!(status, VitalStatus::abnormal(Severity::High));

        assert_eq!(
            classify(VitalType::HeartRate, &scalar_value(35.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
        assert_eq!(
            classify(VitalType::HeartRate, &scalar_value(130.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
        assert_eq!(
            classify(VitalType::HeartRate, &scalar_value(72.0)),
            VitalStatus::normal()
        );
    }

    #[test]
    fn test_temperature_tiers() {
        assert_eq!(
            classify(VitalType::Temperature, &scalar_value(96.0)),
            VitalStatus::abnormal(Severity::High)
        );
        assert_eq!(
            classify(VitalType::Temperature, &scalar_value(94.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
        assert_eq!(
            classify(VitalType::Temperature, &scalar_value(103.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
        assert_eq!(
            classify(VitalType::Temperature, &scalar_value(98.6)),
            VitalStatus::normal()
        );
    }

    #[test]
    fn test_oxygen_saturation_tiers() {
        // 92 is below the healthy band but at or above the critical
        // floor, so the tier is "low"
        assert_eq!(
            classify(VitalType::OxygenSaturation, &scalar_value(92.0)),
            VitalStatus::abnormal(Severity::Low)
        );
        assert_eq!(
            classify(VitalType::OxygenSaturation, &scalar_value(88.0)),
            VitalStatus::abnormal(Severity::Critical)
        );
        assert_eq!(
            classify(VitalType::OxygenSaturation, &scalar_value(98.0)),
            VitalStatus::normal()
        );
    }

    #[test]
    fn test_weight_and_mismatched_shapes_are_normal() {
        assert_eq!(
            classify(VitalType::Weight, &scalar_value(500.0)),
            VitalStatus::normal()
        );
        // Wrong value shape for the type has no matching thresholds
        assert_eq!(
            classify(VitalType::HeartRate, &bp_value(200.0, 120.0)),
            VitalStatus::normal()
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let value = scalar_value(250.0);
        assert_eq!(
            classify(VitalType::BloodSugar, &value),
            classify(VitalType::BloodSugar, &value)
        );
    }

    #[test]
    fn test_average_blood_pressure_rounds_components() {
        let readings = vec![
            reading(VitalType::BloodPressure, bp_value(120.0, 80.0), "2024-03-03T08:00:00Z"),
            reading(VitalType::BloodPressure, bp_value(130.0, 85.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::BloodPressure, bp_value(110.0, 75.0), "2024-03-01T08:00:00Z"),
        ];

        let avg = average(&readings, VitalType::BloodPressure).unwrap();
        assert_eq!(
            avg,
            VitalAverage::BloodPressure {
                systolic: 120,
                diastolic: 80
            }
        );
    }

    #[test]
    fn test_average_scalar_rounds_to_one_decimal() {
        let readings = vec![
            reading(VitalType::BloodSugar, scalar_value(100.0), "2024-03-03T08:00:00Z"),
            reading(VitalType::BloodSugar, scalar_value(101.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::BloodSugar, scalar_value(101.0), "2024-03-01T08:00:00Z"),
        ];

        // 302 / 3 = 100.666... -> 100.7
        assert_eq!(
            average(&readings, VitalType::BloodSugar).unwrap(),
            VitalAverage::Scalar(100.7)
        );
    }

    #[test]
    fn test_average_empty_input_is_an_error() {
        let result = average(&[], VitalType::HeartRate);
        assert_eq!(result, Err(EvaluationError::EmptyInput));
    }

    #[test]
    fn test_trend_single_reading_is_stable() {
        let readings = vec![reading(
            VitalType::HeartRate,
            scalar_value(72.0),
            "2024-03-01T08:00:00Z",
        )];
        assert_eq!(trend(&readings, VitalType::HeartRate), Trend::Stable);
        assert_eq!(trend(&[], VitalType::HeartRate), Trend::Stable);
    }

    #[test]
    fn test_trend_rising_heart_rate() {
        // Newest first: recent window averages 100, older averages 80;
        // +25% change reads as increasing.
        let readings = vec![
            reading(VitalType::HeartRate, scalar_value(105.0), "2024-03-05T08:00:00Z"),
            reading(VitalType::HeartRate, scalar_value(100.0), "2024-03-04T08:00:00Z"),
            reading(VitalType::HeartRate, scalar_value(95.0), "2024-03-03T08:00:00Z"),
            reading(VitalType::HeartRate, scalar_value(75.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::HeartRate, scalar_value(70.0), "2024-03-01T08:00:00Z"),
        ];
        assert_eq!(trend(&readings, VitalType::HeartRate), Trend::Increasing);
    }

    #[test]
    fn test_trend_falling_blood_pressure_compares_systolic() {
        let readings = vec![
            reading(VitalType::BloodPressure, bp_value(110.0, 70.0), "2024-03-05T08:00:00Z"),
            reading(VitalType::BloodPressure, bp_value(112.0, 72.0), "2024-03-04T08:00:00Z"),
            reading(VitalType::BloodPressure, bp_value(115.0, 75.0), "2024-03-03T08:00:00Z"),
            reading(VitalType::BloodPressure, bp_value(135.0, 85.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::BloodPressure, bp_value(140.0, 90.0), "2024-03-01T08:00:00Z"),
        ];
        assert_eq!(trend(&readings, VitalType::BloodPressure), Trend::Decreasing);
    }

    #[test]
    fn test_trend_small_change_is_stable() {
        let readings = vec![
            reading(VitalType::Weight, scalar_value(71.0), "2024-03-04T08:00:00Z"),
            reading(VitalType::Weight, scalar_value(70.5), "2024-03-03T08:00:00Z"),
            reading(VitalType::Weight, scalar_value(70.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::Weight, scalar_value(70.0), "2024-03-01T08:00:00Z"),
        ];
        assert_eq!(trend(&readings, VitalType::Weight), Trend::Stable);
    }

    #[test]
    fn test_trend_overlapping_windows_for_two_readings() {
        // With n = 2 both windows cover the full list, so the change is
        // zero regardless of the values.
        let readings = vec![
            reading(VitalType::HeartRate, scalar_value(120.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::HeartRate, scalar_value(60.0), "2024-03-01T08:00:00Z"),
        ];
        assert_eq!(trend(&readings, VitalType::HeartRate), Trend::Stable);
    }

    #[test]
    fn test_trend_zero_older_average_is_stable() {
        // Older window averages zero, so the percent change is
        // undefined; the guard yields stable instead of NaN.
        let readings = vec![
            reading(VitalType::Weight, scalar_value(5.0), "2024-03-04T08:00:00Z"),
            reading(VitalType::Weight, scalar_value(0.0), "2024-03-03T08:00:00Z"),
            reading(VitalType::Weight, scalar_value(0.0), "2024-03-02T08:00:00Z"),
            reading(VitalType::Weight, scalar_value(0.0), "2024-03-01T08:00:00Z"),
        ];
        assert_eq!(trend(&readings, VitalType::Weight), Trend::Stable);
    }
}
