use serde::{Deserialize, Serialize};

/// Storage model for a vital sign reading
///
/// The measurement value is flattened into optional columns: blood
/// pressure readings populate `systolic`/`diastolic`, every other
/// vital type populates `reading`. Classification results are stored
/// alongside the measurement so history queries never recompute them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalRecord {
    /// Unique identifier for the reading
    pub id: String,

    /// Vital type tag (blood_pressure, blood_sugar, weight, heart_rate,
    /// temperature, oxygen_saturation)
    pub vital_type: String,

    /// Systolic blood pressure, set only for blood_pressure readings
    pub systolic: Option<f64>,

    /// Diastolic blood pressure, set only for blood_pressure readings
    pub diastolic: Option<f64>,

    /// Scalar measurement, set for every non blood_pressure type
    pub reading: Option<f64>,

    /// Measurement unit as entered (mmHg, mg/dL, kg, bpm, ...)
    pub unit: Option<String>,

    /// When the reading was taken (RFC 3339)
    pub recorded_at: String,

    /// Part of the day the reading was taken (morning, afternoon,
    /// evening, night)
    pub time_of_day: String,

    /// Optional notes about the reading
    pub notes: Option<String>,

    /// Whether the reading fell inside the healthy band at last write
    pub is_normal: bool,

    /// Severity tier assigned at last write (normal, low, high, critical)
    pub severity: String,

    /// When the record was created in the system (RFC 3339)
    pub created_at: String,

    /// When the record was last updated (RFC 3339)
    pub updated_at: String,
}

/// Input data for creating a new vital record
///
/// The id and bookkeeping timestamps are assigned by the repository;
/// the status fields arrive pre-computed from the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVitalRecord {
    /// Vital type tag
    pub vital_type: String,

    /// Systolic blood pressure, blood_pressure readings only
    pub systolic: Option<f64>,

    /// Diastolic blood pressure, blood_pressure readings only
    pub diastolic: Option<f64>,

    /// Scalar measurement for non blood_pressure types
    pub reading: Option<f64>,

    /// Measurement unit as entered
    pub unit: Option<String>,

    /// When the reading was taken (RFC 3339)
    pub recorded_at: String,

    /// Part of the day the reading was taken
    pub time_of_day: String,

    /// Optional notes about the reading
    pub notes: Option<String>,

    /// Whether the reading is inside the healthy band
    pub is_normal: bool,

    /// Severity tier
    pub severity: String,
}
