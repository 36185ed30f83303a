// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus, Intent};

/// Single authority over appointment status. Status is a pure function of
/// the applied intent and is never taken from caller input.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn status_for_intent(&self, intent: Intent) -> AppointmentStatus {
        match intent {
            Intent::Create => AppointmentStatus::Pending,
            Intent::Schedule => AppointmentStatus::Scheduled,
            Intent::Cancel => AppointmentStatus::Cancelled,
        }
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!(
            "Validating status transition from {} to {}",
            current_status, new_status
        );

        if !self.valid_transitions(current_status).contains(&new_status) {
            warn!(
                "Invalid status transition attempted: {} -> {}",
                current_status, new_status
            );
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    /// All valid next statuses for a given current status.
    pub fn valid_transitions(&self, current_status: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current_status {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Scheduled, AppointmentStatus::Cancelled]
            }
            // Scheduled -> Scheduled covers re-scheduling to a new slot.
            AppointmentStatus::Scheduled => {
                &[AppointmentStatus::Scheduled, AppointmentStatus::Cancelled]
            }
            // Terminal state - no transitions allowed
            AppointmentStatus::Cancelled => &[],
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
