use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_endpoint: String,
    pub store_project_id: String,
    pub store_api_key: String,
    pub database_id: String,
    pub appointment_collection_id: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_endpoint: env::var("DOCUMENT_STORE_ENDPOINT")
                .unwrap_or_else(|_| {
                    warn!("DOCUMENT_STORE_ENDPOINT not set, using empty value");
                    String::new()
                }),
            store_project_id: env::var("DOCUMENT_STORE_PROJECT_ID")
                .unwrap_or_else(|_| {
                    warn!("DOCUMENT_STORE_PROJECT_ID not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("DOCUMENT_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("DOCUMENT_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            database_id: env::var("DATABASE_ID")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_ID not set, using empty value");
                    String::new()
                }),
            appointment_collection_id: env::var("APPOINTMENT_COLLECTION_ID")
                .unwrap_or_else(|_| {
                    warn!("APPOINTMENT_COLLECTION_ID not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_endpoint.is_empty()
            && !self.store_project_id.is_empty()
            && !self.store_api_key.is_empty()
            && !self.database_id.is_empty()
            && !self.appointment_collection_id.is_empty()
    }
}
