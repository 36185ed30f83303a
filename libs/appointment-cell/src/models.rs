// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shared_database::StoreError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A persisted appointment document. Wire names follow the document
/// store's conventions: camelCase attributes, `$`-prefixed metadata keys
/// owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
    pub patient: String,
    pub primary_physician: String,
    pub schedule: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Closed status set. Every write path goes through this enum, so no
/// unknown status can be persisted by this service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Scheduled,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The caller's requested lifecycle action. Determines both the resulting
/// status and which fields are required.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Create,
    Schedule,
    Cancel,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Create => write!(f, "create"),
            Intent::Schedule => write!(f, "schedule"),
            Intent::Cancel => write!(f, "cancel"),
        }
    }
}

impl FromStr for Intent {
    type Err = AppointmentError;

    // No default fallback: an unrecognized intent aborts before any write.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Intent::Create),
            "schedule" => Ok(Intent::Schedule),
            "cancel" => Ok(Intent::Cancel),
            other => Err(AppointmentError::InvalidIntent(other.to_string())),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Raw form values for the intent-dependent fields. Requiredness is
/// decided by the field contract, not by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFields {
    pub primary_physician: Option<String>,
    pub schedule: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub note: Option<String>,
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub user_id: String,
    pub patient: Option<String>,
    #[serde(flatten)]
    pub fields: AppointmentFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub intent: Intent,
    pub appointment: AppointmentFields,
    /// Optimistic concurrency guard: when set, the update fails with
    /// `Conflict` if the stored document advanced past this instant.
    #[serde(default)]
    pub expected_updated_at: Option<DateTime<Utc>>,
}

/// Derived dashboard summary. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentReport {
    pub total_count: u64,
    pub scheduled_count: u32,
    pub pending_count: u32,
    pub cancelled_count: u32,
    pub documents: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Unknown appointment intent: {0}")]
    InvalidIntent(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Create intent requires a patient reference")]
    MissingPatient,

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment was modified concurrently")]
    Conflict,

    #[error("Cannot transition appointment from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Malformed appointment document: {0}")]
    Malformed(String),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppointmentError::NotFound,
            StoreError::Conflict => AppointmentError::Conflict,
            StoreError::Malformed(msg) => AppointmentError::Malformed(msg),
            other => AppointmentError::Store(other.to_string()),
        }
    }
}
