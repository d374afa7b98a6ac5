use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use vital_mate_domain::entities::{Severity, TimeOfDay, VitalType, VitalValue};

/// Public representation of a vital sign reading
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VitalReading {
    /// Unique identifier for the reading
    pub id: Uuid,

    /// Vital sign type
    #[serde(rename = "type")]
    pub vital_type: VitalType,

    /// The measured value; shape depends on the vital type
    pub value: VitalValue,

    /// When the reading was taken
    pub recorded_at: DateTime<Utc>,

    /// Time of day the reading belongs to
    pub time_of_day: TimeOfDay,

    /// Optional notes about the reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Whether the value falls inside the normal range for its type
    pub is_normal: bool,

    /// Severity bucket assigned by classification
    pub severity: Severity,

    /// When the reading was created in the system
    pub created_at: DateTime<Utc>,

    /// When the reading was last updated
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new vital reading
///
/// Classification fields are never accepted from the client; the server
/// computes them from the type and value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVitalRequest {
    /// Vital sign type
    #[serde(rename = "type")]
    pub vital_type: VitalType,

    /// The measured value; shape must match the vital type
    pub value: VitalValue,

    /// When the reading was taken. Defaults to current time if not provided.
    pub recorded_at: Option<DateTime<Utc>>,

    /// Time of day the reading belongs to. Defaults to morning.
    pub time_of_day: Option<TimeOfDay>,

    /// Optional notes about the reading
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Request payload for updating an existing vital reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateVitalRequest {
    /// New vital sign type
    #[serde(rename = "type")]
    pub vital_type: Option<VitalType>,

    /// New measured value
    pub value: Option<VitalValue>,

    /// New recording timestamp
    pub recorded_at: Option<DateTime<Utc>>,

    /// New time of day
    pub time_of_day: Option<TimeOfDay>,

    /// New notes
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}
