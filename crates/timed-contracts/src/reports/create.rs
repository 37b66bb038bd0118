//! Create contract for reports

use chrono::Duration;
use timed_core::error::ValidationErrors;
use timed_core::Id;

use crate::actor::ActorContext;
use crate::base::{PolicyError, PolicyResult};

/// Contract for creating a report.
///
/// Any authenticated actor may create; the owning user is forced to the
/// actor by the service regardless of the payload. Only staff may arrive
/// with `verified_by` already set.
pub struct CreateReportContract<'a> {
    actor: &'a dyn ActorContext,
}

impl<'a> CreateReportContract<'a> {
    pub fn new(actor: &'a dyn ActorContext) -> Self {
        Self { actor }
    }

    pub fn validate(&self, duration: Duration, verified_by_id: Option<Id>) -> PolicyResult {
        if duration < Duration::zero() {
            let mut errors = ValidationErrors::new();
            errors.add("duration", "must not be negative");
            return Err(PolicyError::Validation(errors));
        }

        if verified_by_id.is_some() && !self.actor.is_staff() {
            return Err(PolicyError::not_writable("verified_by"));
        }

        Ok(())
    }
}
