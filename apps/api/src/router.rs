use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{appointment_routes, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic appointment API is running!" }))
        .nest("/appointments", appointment_routes(state))
}
