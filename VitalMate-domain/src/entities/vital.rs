use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Vital sign types supported by the application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    BloodPressure,
    BloodSugar,
    Weight,
    HeartRate,
    Temperature,
    OxygenSaturation,
}

impl VitalType {
    /// All known vital types, in summary display order
    pub const ALL: [VitalType; 6] = [
        VitalType::BloodPressure,
        VitalType::BloodSugar,
        VitalType::Weight,
        VitalType::HeartRate,
        VitalType::Temperature,
        VitalType::OxygenSaturation,
    ];

    /// Wire/storage tag for this vital type
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalType::BloodPressure => "blood_pressure",
            VitalType::BloodSugar => "blood_sugar",
            VitalType::Weight => "weight",
            VitalType::HeartRate => "heart_rate",
            VitalType::Temperature => "temperature",
            VitalType::OxygenSaturation => "oxygen_saturation",
        }
    }
}

impl FromStr for VitalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blood_pressure" => Ok(VitalType::BloodPressure),
            "blood_sugar" => Ok(VitalType::BloodSugar),
            "weight" => Ok(VitalType::Weight),
            "heart_rate" => Ok(VitalType::HeartRate),
            "temperature" => Ok(VitalType::Temperature),
            "oxygen_saturation" => Ok(VitalType::OxygenSaturation),
            _ => Err(format!("Unknown vital type: {}", s)),
        }
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement value of a vital reading
///
/// Blood pressure carries a systolic/diastolic pair; every other vital
/// type carries a single scalar. The JSON shape is untagged, so field
/// presence selects the variant, matching the original document schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(untagged)]
pub enum VitalValue {
    /// Blood pressure measurement
    BloodPressure {
        systolic: f64,
        diastolic: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    /// Scalar measurement for every other vital type
    Scalar {
        reading: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl VitalValue {
    /// Systolic component, when this is a blood pressure value
    pub fn systolic(&self) -> Option<f64> {
        match self {
            VitalValue::BloodPressure { systolic, .. } => Some(*systolic),
            VitalValue::Scalar { .. } => None,
        }
    }

    /// Diastolic component, when this is a blood pressure value
    pub fn diastolic(&self) -> Option<f64> {
        match self {
            VitalValue::BloodPressure { diastolic, .. } => Some(*diastolic),
            VitalValue::Scalar { .. } => None,
        }
    }

    /// Scalar reading, when this is not a blood pressure value
    pub fn reading(&self) -> Option<f64> {
        match self {
            VitalValue::BloodPressure { .. } => None,
            VitalValue::Scalar { reading, .. } => Some(*reading),
        }
    }

    /// Measurement unit as entered
    pub fn unit(&self) -> Option<&str> {
        match self {
            VitalValue::BloodPressure { unit, .. } | VitalValue::Scalar { unit, .. } => unit.as_deref(),
        }
    }
}

/// Severity tier derived from the classification thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Low,
    High,
    Critical,
}

impl Severity {
    /// Wire/storage tag for this severity tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Low => "low",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Severity::Normal),
            "low" => Ok(Severity::Low),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Part of the day a reading was taken
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Wire/storage tag for this time of day
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            "night" => Ok(TimeOfDay::Night),
            _ => Err(format!("Unknown time of day: {}", s)),
        }
    }
}

/// Classification result for a single reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalStatus {
    /// Whether the reading sits inside the healthy band
    pub is_normal: bool,

    /// Severity tier assigned by the threshold rules
    pub severity: Severity,
}

impl VitalStatus {
    /// Status for a reading inside the healthy band
    pub fn normal() -> Self {
        Self {
            is_normal: true,
            severity: Severity::Normal,
        }
    }

    /// Status for a reading outside the healthy band
    pub fn abnormal(severity: Severity) -> Self {
        Self {
            is_normal: false,
            severity,
        }
    }
}

/// Domain model for a vital sign reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalReading {
    /// Unique identifier for the reading
    pub id: String,

    /// Vital sign type
    #[serde(rename = "type")]
    pub vital_type: VitalType,

    /// Measurement value
    pub value: VitalValue,

    /// When the reading was taken (RFC 3339)
    pub recorded_at: String,

    /// Part of the day the reading was taken
    pub time_of_day: TimeOfDay,

    /// Optional notes about the reading
    pub notes: Option<String>,

    /// Whether the reading sits inside the healthy band; derived,
    /// never accepted from callers
    pub is_normal: bool,

    /// Severity tier; derived, never accepted from callers
    pub severity: Severity,

    /// When the record was created in the system (RFC 3339)
    pub created_at: String,

    /// When the record was last updated (RFC 3339)
    pub updated_at: String,
}

/// Request payload for creating a new vital reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateVitalRequest {
    /// Vital sign type
    #[serde(rename = "type")]
    pub vital_type: VitalType,

    /// Measurement value; must match the shape expected by the type
    pub value: VitalValue,

    /// When the reading was taken. Defaults to current time if not provided.
    pub recorded_at: Option<String>,

    /// Part of the day the reading was taken. Defaults to morning.
    pub time_of_day: Option<TimeOfDay>,

    /// Optional notes about the reading
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Request payload for updating an existing vital reading
///
/// All fields are optional; when type or value changes, the reading is
/// reclassified before persisting.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpdateVitalRequest {
    /// New vital sign type
    #[serde(rename = "type")]
    pub vital_type: Option<VitalType>,

    /// New measurement value
    pub value: Option<VitalValue>,

    /// New recording time (RFC 3339)
    pub recorded_at: Option<String>,

    /// New part of the day
    pub time_of_day: Option<TimeOfDay>,

    /// New notes
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Average of a reading set
///
/// Blood pressure averages keep the systolic/diastolic pair (each
/// rounded to the nearest integer); every other type averages to a
/// single scalar rounded to one decimal place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(untagged)]
pub enum VitalAverage {
    /// Averaged blood pressure pair
    BloodPressure { systolic: i64, diastolic: i64 },
    /// Averaged scalar measurement
    Scalar(f64),
}

/// Trend direction between a recent and an older sub-window of a
/// reading history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Per-type statistics within a summary window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TypeSummary {
    /// Number of readings of this type in the window
    pub count: usize,

    /// Most recent reading of this type
    pub latest: VitalReading,

    /// Average over the window
    pub average: VitalAverage,

    /// Trend direction over the window
    pub trend: Trend,

    /// Number of readings outside the healthy band
    pub abnormal_count: usize,
}

/// Vital statistics summary over a lookback window
///
/// Derived on every request; never persisted. Types with no readings in
/// the window are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalSummary {
    /// Lookback window in days
    pub period_days: u32,

    /// Per-type statistics, keyed by vital type tag
    pub vitals: BTreeMap<VitalType, TypeSummary>,

    /// When the summary was generated (RFC 3339)
    pub generated_at: String,
}
