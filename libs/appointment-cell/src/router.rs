// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{self, AppState};

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_appointment))
        .route("/recent", get(handlers::recent_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", patch(handlers::update_appointment))
        .with_state(state)
}
