use uuid::Uuid;

use crate::entities::vital::{Severity, TimeOfDay, VitalReading, VitalStatus, VitalType, VitalValue};
use vital_mate_data::models::vital::{NewVitalRecord, VitalRecord};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Helper function to safely parse a string ID to UUID
///
/// Centralizes UUID parsing so invalid ids produce one consistent
/// error message across the application.
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert from data model to domain entity for a vital reading
///
/// Errors when the stored type/severity/time tags or the value columns
/// are inconsistent, which indicates a corrupted record.
pub fn convert_to_domain_reading(record: VitalRecord) -> Result<VitalReading, String> {
    let vital_type: VitalType = record.vital_type.parse()?;
    let severity: Severity = record.severity.parse()?;
    let time_of_day: TimeOfDay = record.time_of_day.parse()?;

    let value = match vital_type {
        VitalType::BloodPressure => VitalValue::BloodPressure {
            systolic: record
                .systolic
                .ok_or_else(|| format!("Reading {} is missing a systolic value", record.id))?,
            diastolic: record
                .diastolic
                .ok_or_else(|| format!("Reading {} is missing a diastolic value", record.id))?,
            unit: record.unit,
        },
        _ => VitalValue::Scalar {
            reading: record
                .reading
                .ok_or_else(|| format!("Reading {} is missing a scalar value", record.id))?,
            unit: record.unit,
        },
    };

    Ok(VitalReading {
        id: record.id,
        vital_type,
        value,
        recorded_at: record.recorded_at,
        time_of_day,
        notes: record.notes,
        is_normal: record.is_normal,
        severity,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// Convert a classified create request into a data-layer record
pub fn convert_to_data_new_record(
    vital_type: VitalType,
    value: &VitalValue,
    recorded_at: String,
    time_of_day: TimeOfDay,
    notes: Option<String>,
    status: VitalStatus,
) -> NewVitalRecord {
    NewVitalRecord {
        vital_type: vital_type.as_str().to_string(),
        systolic: value.systolic(),
        diastolic: value.diastolic(),
        reading: value.reading(),
        unit: value.unit().map(|u| u.to_string()),
        recorded_at,
        time_of_day: time_of_day.as_str().to_string(),
        notes,
        is_normal: status.is_normal,
        severity: status.severity.as_str().to_string(),
    }
}

/// Convert a domain reading back into its data-layer record
pub fn convert_to_data_record(reading: &VitalReading) -> VitalRecord {
    VitalRecord {
        id: reading.id.clone(),
        vital_type: reading.vital_type.as_str().to_string(),
        systolic: reading.value.systolic(),
        diastolic: reading.value.diastolic(),
        reading: reading.value.reading(),
        unit: reading.value.unit().map(|u| u.to_string()),
        recorded_at: reading.recorded_at.clone(),
        time_of_day: reading.time_of_day.as_str().to_string(),
        notes: reading.notes.clone(),
        is_normal: reading.is_normal,
        severity: reading.severity.as_str().to_string(),
        created_at: reading.created_at.clone(),
        updated_at: reading.updated_at.clone(),
    }
}
