// libs/appointment-cell/src/services/scheduling.rs
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::DocumentStore;

use crate::models::{
    Appointment, AppointmentError, CreateAppointmentRequest, Intent, UpdateAppointmentRequest,
};
use crate::services::dashboard::DashboardNotifier;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::validation::select_schema;

/// The lifecycle controller. Derives status from intent, assembles the
/// persisted representation, and drives the repository adapter. The store
/// is injected so tests can substitute an in-memory one.
pub struct AppointmentService {
    store: Arc<dyn DocumentStore>,
    collection_id: String,
    lifecycle: AppointmentLifecycleService,
    dashboard: DashboardNotifier,
}

impl AppointmentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: &AppConfig,
        dashboard: DashboardNotifier,
    ) -> Self {
        Self {
            store,
            collection_id: config.appointment_collection_id.clone(),
            lifecycle: AppointmentLifecycleService::new(),
            dashboard,
        }
    }

    /// Create a new appointment request. Status is always `pending`;
    /// the identifier is assigned here and returned so the caller can
    /// navigate to a confirmation view keyed by it.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let patient = match request.patient {
            Some(patient) if !patient.trim().is_empty() => patient,
            _ => return Err(AppointmentError::MissingPatient),
        };

        select_schema(Intent::Create).validate(&request.fields, Utc::now())?;

        let status = self.lifecycle.status_for_intent(Intent::Create);
        let document_id = Uuid::new_v4().to_string();
        let fields = request.fields;

        let data = json!({
            "userId": request.user_id,
            "patient": patient,
            "primaryPhysician": required(fields.primary_physician, "primaryPhysician")?,
            "schedule": required(fields.schedule, "schedule")?.to_rfc3339(),
            "reason": required(fields.reason, "reason")?,
            "note": fields.note,
            "status": status,
        });

        debug!("Creating appointment {}", document_id);
        let stored = self
            .store
            .create_document(&self.collection_id, &document_id, data)
            .await?;
        let appointment = parse_document(stored)?;

        info!(
            "Appointment {} created with status {}",
            appointment.id, appointment.status
        );
        Ok(appointment)
    }

    /// Apply a schedule or cancel intent to an existing appointment. The
    /// update is a merge: the payload carries only the update-path fields,
    /// so `reason`, `note` and the creation timestamp stay untouched.
    pub async fn update_appointment(
        &self,
        appointment_id: &str,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if request.intent == Intent::Create {
            return Err(AppointmentError::InvalidIntent(
                "create is not an update intent".to_string(),
            ));
        }

        select_schema(request.intent).validate(&request.appointment, Utc::now())?;

        let current = self.get_appointment(appointment_id).await?;
        let new_status = self.lifecycle.status_for_intent(request.intent);
        self.lifecycle
            .validate_status_transition(current.status, new_status)?;

        let fields = request.appointment;
        let mut data = Map::new();
        data.insert("status".to_string(), json!(new_status));
        match request.intent {
            Intent::Schedule => {
                data.insert(
                    "primaryPhysician".to_string(),
                    json!(required(fields.primary_physician, "primaryPhysician")?),
                );
                data.insert(
                    "schedule".to_string(),
                    json!(required(fields.schedule, "schedule")?.to_rfc3339()),
                );
            }
            Intent::Cancel => {
                data.insert(
                    "cancellationReason".to_string(),
                    json!(required(fields.cancellation_reason, "cancellationReason")?),
                );
            }
            Intent::Create => unreachable!("rejected above"),
        }

        debug!(
            "Applying {} intent to appointment {}",
            request.intent, appointment_id
        );
        let stored = self
            .store
            .update_document(
                &self.collection_id,
                appointment_id,
                Value::Object(data),
                request.expected_updated_at,
            )
            .await?;
        let appointment = parse_document(stored)?;

        // Listing views aggregate over statuses; tell them to re-fetch.
        self.dashboard.notify_changed();

        info!(
            "Appointment {} transitioned to {}",
            appointment.id, appointment.status
        );
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);
        let stored = self
            .store
            .get_document(&self.collection_id, appointment_id)
            .await?;
        parse_document(stored)
    }
}

fn parse_document(document: Value) -> Result<Appointment, AppointmentError> {
    serde_json::from_value(document)
        .map_err(|e| AppointmentError::Malformed(format!("failed to parse appointment: {}", e)))
}

// The field contract has already run; a missing value here means the
// contract and the payload assembly disagree.
fn required<T>(value: Option<T>, name: &str) -> Result<T, AppointmentError> {
    value.ok_or_else(|| AppointmentError::Validation(format!("{} is required", name)))
}
