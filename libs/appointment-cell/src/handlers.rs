// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::DocumentStore;
use shared_models::error::AppError;

use crate::models::{AppointmentError, CreateAppointmentRequest, Intent, UpdateAppointmentRequest};
use crate::services::dashboard::DashboardNotifier;
use crate::services::reporting::AppointmentReportService;
use crate::services::scheduling::AppointmentService;

/// Process-wide wiring handed to every handler: configuration, the
/// injected document store and the dashboard refresh signal.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub dashboard: DashboardNotifier,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            dashboard: DashboardNotifier::new(),
        }
    }

    fn scheduling(&self) -> AppointmentService {
        AppointmentService::new(
            Arc::clone(&self.store),
            &self.config,
            self.dashboard.clone(),
        )
    }

    fn reporting(&self) -> AppointmentReportService {
        AppointmentReportService::new(Arc::clone(&self.store), &self.config)
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .scheduling()
        .create_appointment(request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment requested successfully"
    })))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let intent = request.intent;
    let appointment = state
        .scheduling()
        .update_appointment(&appointment_id, request)
        .await
        .map_err(map_appointment_error)?;

    let message = match intent {
        Intent::Schedule => "Appointment scheduled successfully",
        Intent::Cancel => "Appointment cancelled successfully",
        Intent::Create => "Appointment updated successfully",
    };

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .scheduling()
        .get_appointment(&appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn recent_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let report = state
        .reporting()
        .recent_appointments()
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(report)))
}

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::Conflict => AppError::Conflict(
            "Appointment was modified concurrently, retry with fresh state".to_string(),
        ),
        AppointmentError::InvalidIntent(_)
        | AppointmentError::Validation(_)
        | AppointmentError::MissingPatient
        | AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(e.to_string()),
        AppointmentError::Store(msg) => AppError::ExternalService(msg),
        AppointmentError::Malformed(msg) => AppError::Internal(msg),
    }
}
