// libs/appointment-cell/src/validation.rs
use chrono::{DateTime, Utc};

use crate::models::{AppointmentError, AppointmentFields, Intent};

/// Per-field requiredness for a given intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Present values are ignored; the controller never copies the field
    /// into a persisted payload for this intent.
    Disallowed,
}

/// The set of field rules applicable to one intent.
#[derive(Debug, Clone)]
pub struct FieldContract {
    pub primary_physician: Requirement,
    pub schedule: Requirement,
    pub reason: Requirement,
    pub note: Requirement,
    pub cancellation_reason: Requirement,
    /// Create requests must point at a present-or-future slot. Schedule
    /// updates re-use whatever slot the staff picked, including moving an
    /// appointment that has already slipped into the past.
    pub schedule_must_not_be_past: bool,
}

/// Pure mapping from intent to field contract. No side effects.
pub fn select_schema(intent: Intent) -> FieldContract {
    match intent {
        Intent::Create => FieldContract {
            primary_physician: Requirement::Required,
            schedule: Requirement::Required,
            reason: Requirement::Required,
            note: Requirement::Optional,
            cancellation_reason: Requirement::Disallowed,
            schedule_must_not_be_past: true,
        },
        Intent::Schedule => FieldContract {
            primary_physician: Requirement::Required,
            schedule: Requirement::Required,
            reason: Requirement::Optional,
            note: Requirement::Optional,
            cancellation_reason: Requirement::Disallowed,
            schedule_must_not_be_past: false,
        },
        Intent::Cancel => FieldContract {
            primary_physician: Requirement::Disallowed,
            schedule: Requirement::Disallowed,
            reason: Requirement::Disallowed,
            note: Requirement::Disallowed,
            cancellation_reason: Requirement::Required,
            schedule_must_not_be_past: false,
        },
    }
}

impl FieldContract {
    /// Enforce the contract against raw form values. Runs before any
    /// repository call, so a failure here means no write was attempted.
    pub fn validate(
        &self,
        fields: &AppointmentFields,
        now: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        require_text("primaryPhysician", self.primary_physician, &fields.primary_physician)?;
        require_text("reason", self.reason, &fields.reason)?;
        require_text("note", self.note, &fields.note)?;
        require_text(
            "cancellationReason",
            self.cancellation_reason,
            &fields.cancellation_reason,
        )?;

        if self.schedule == Requirement::Required {
            let schedule = fields.schedule.ok_or_else(|| {
                AppointmentError::Validation("schedule is required".to_string())
            })?;
            if self.schedule_must_not_be_past && schedule < now {
                return Err(AppointmentError::Validation(
                    "schedule must not be in the past".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn require_text(
    name: &str,
    requirement: Requirement,
    value: &Option<String>,
) -> Result<(), AppointmentError> {
    if requirement != Requirement::Required {
        return Ok(());
    }
    match value {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(AppointmentError::Validation(format!(
            "{} is required",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn valid_create_fields() -> AppointmentFields {
        AppointmentFields {
            primary_physician: Some("Dr. A".to_string()),
            schedule: Some(Utc::now() + Duration::hours(2)),
            reason: Some("checkup".to_string()),
            note: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn create_contract_requires_physician_schedule_and_reason() {
        let contract = select_schema(Intent::Create);
        assert_eq!(contract.primary_physician, Requirement::Required);
        assert_eq!(contract.schedule, Requirement::Required);
        assert_eq!(contract.reason, Requirement::Required);
        assert_eq!(contract.note, Requirement::Optional);
        assert_eq!(contract.cancellation_reason, Requirement::Disallowed);
    }

    #[test]
    fn schedule_contract_carries_reason_and_note_over() {
        let contract = select_schema(Intent::Schedule);
        assert_eq!(contract.primary_physician, Requirement::Required);
        assert_eq!(contract.schedule, Requirement::Required);
        assert_eq!(contract.reason, Requirement::Optional);
        assert_eq!(contract.note, Requirement::Optional);
        assert_eq!(contract.cancellation_reason, Requirement::Disallowed);
    }

    #[test]
    fn cancel_contract_requires_only_a_cancellation_reason() {
        let contract = select_schema(Intent::Cancel);
        assert_eq!(contract.cancellation_reason, Requirement::Required);
        assert_eq!(contract.primary_physician, Requirement::Disallowed);
        assert_eq!(contract.schedule, Requirement::Disallowed);
        assert_eq!(contract.reason, Requirement::Disallowed);
        assert_eq!(contract.note, Requirement::Disallowed);
    }

    #[test]
    fn unknown_intent_fails_instead_of_falling_back() {
        assert_matches!(
            Intent::from_str("reschedule"),
            Err(AppointmentError::InvalidIntent(value)) if value == "reschedule"
        );
    }

    #[test]
    fn create_rejects_past_schedule() {
        let mut fields = valid_create_fields();
        fields.schedule = Some(Utc::now() - Duration::hours(1));

        let result = select_schema(Intent::Create).validate(&fields, Utc::now());
        assert_matches!(result, Err(AppointmentError::Validation(_)));
    }

    #[test]
    fn schedule_intent_allows_past_slot() {
        let mut fields = valid_create_fields();
        fields.schedule = Some(Utc::now() - Duration::hours(1));

        select_schema(Intent::Schedule)
            .validate(&fields, Utc::now())
            .expect("past slot allowed on reschedule");
    }

    #[test]
    fn empty_cancellation_reason_fails_validation() {
        let fields = AppointmentFields {
            cancellation_reason: Some("   ".to_string()),
            ..Default::default()
        };

        let result = select_schema(Intent::Cancel).validate(&fields, Utc::now());
        assert_matches!(result, Err(AppointmentError::Validation(_)));
    }

    #[test]
    fn cancel_ignores_disallowed_fields() {
        let fields = AppointmentFields {
            primary_physician: Some("Dr. A".to_string()),
            cancellation_reason: Some("Patient unavailable".to_string()),
            ..Default::default()
        };

        select_schema(Intent::Cancel)
            .validate(&fields, Utc::now())
            .expect("disallowed fields are ignored, not rejected");
    }
}
