//! Delete contract for reports

use timed_models::Report;

use crate::actor::ActorContext;
use crate::base::{PolicyError, PolicyResult};

/// Contract for deleting a report: owner or staff, nobody else.
///
/// The superuser flag alone grants no standing here.
pub struct DeleteReportContract<'a> {
    actor: &'a dyn ActorContext,
    report: &'a Report,
}

impl<'a> DeleteReportContract<'a> {
    pub fn new(actor: &'a dyn ActorContext, report: &'a Report) -> Self {
        Self { actor, report }
    }

    pub fn validate(&self) -> PolicyResult {
        if self.report.is_owned_by(self.actor.id()) || self.actor.is_staff() {
            Ok(())
        } else {
            Err(PolicyError::forbidden(
                "may not delete reports of other users",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{report, MockActor};
    use super::*;

    #[test]
    fn test_owner_can_delete() {
        let actor = MockActor::regular(1);
        let report = report(1, None);
        assert!(DeleteReportContract::new(&actor, &report).validate().is_ok());
    }

    #[test]
    fn test_owner_can_delete_verified_report() {
        let actor = MockActor::regular(1);
        let report = report(1, Some(2));
        assert!(DeleteReportContract::new(&actor, &report).validate().is_ok());
    }

    #[test]
    fn test_staff_can_delete_others_report() {
        let actor = MockActor::staff(2);
        let report = report(1, None);
        assert!(DeleteReportContract::new(&actor, &report).validate().is_ok());
    }

    #[test]
    fn test_superuser_without_staff_cannot_delete_others_report() {
        let actor = MockActor::superuser(2);
        let report = report(1, None);
        let err = DeleteReportContract::new(&actor, &report)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PolicyError::Forbidden(_)));
    }
}
