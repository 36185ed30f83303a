// libs/appointment-cell/src/services/reporting.rs
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{DocumentStore, ListQuery, ListResult};

use crate::models::{Appointment, AppointmentError, AppointmentReport, AppointmentStatus};

/// Aggregation reporter for the staff dashboard: per-status counts plus
/// the raw ordered document list.
pub struct AppointmentReportService {
    store: Arc<dyn DocumentStore>,
    collection_id: String,
}

impl AppointmentReportService {
    pub fn new(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        Self {
            store,
            collection_id: config.appointment_collection_id.clone(),
        }
    }

    /// List all appointments, most recent first, and fold them into the
    /// dashboard report.
    pub async fn recent_appointments(&self) -> Result<AppointmentReport, AppointmentError> {
        debug!("Listing appointments for dashboard report");

        let listed = self
            .store
            .list_documents(&self.collection_id, &[ListQuery::order_desc("$createdAt")])
            .await?;

        let total = listed.total;
        let documents: Vec<Appointment> = listed
            .documents
            .into_iter()
            .filter_map(|raw: Value| match serde_json::from_value(raw) {
                Ok(appointment) => Some(appointment),
                Err(e) => {
                    // Foreign writers can leave documents this service
                    // would never produce; they stay out of the buckets
                    // but remain in the store's total.
                    warn!("Skipping unreadable appointment document: {}", e);
                    None
                }
            })
            .collect();

        Ok(summarize(ListResult { total, documents }))
    }
}

/// Pure single-pass fold over an ordered appointment list. `total_count`
/// comes from the store's own total; for data written by this service it
/// always equals the sum of the three buckets.
pub fn summarize(appointments: ListResult<Appointment>) -> AppointmentReport {
    let mut scheduled_count = 0u32;
    let mut pending_count = 0u32;
    let mut cancelled_count = 0u32;

    for appointment in &appointments.documents {
        match appointment.status {
            AppointmentStatus::Scheduled => scheduled_count += 1,
            AppointmentStatus::Pending => pending_count += 1,
            AppointmentStatus::Cancelled => cancelled_count += 1,
        }
    }

    let bucket_sum = u64::from(scheduled_count + pending_count + cancelled_count);
    if appointments.total > bucket_sum {
        warn!(
            "Store total {} exceeds bucket sum {}; collection holds documents this service did not write",
            appointments.total, bucket_sum
        );
    }

    AppointmentReport {
        total_count: appointments.total,
        scheduled_count,
        pending_count,
        cancelled_count,
        documents: appointments.documents,
    }
}
