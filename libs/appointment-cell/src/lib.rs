pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod validation;

pub use handlers::AppState;
pub use router::appointment_routes;
