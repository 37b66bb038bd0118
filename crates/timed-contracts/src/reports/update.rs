//! Update contract for reports
//!
//! The worktime fields (task, date, duration) belong to the owner and
//! freeze once the report is verified. Staff never write them directly:
//! a staff payload naming one is malformed (400), whatever the report's
//! verification state. An owner editing a verified report is denied for
//! lack of standing instead (403).

use timed_models::Report;

use crate::actor::ActorContext;
use crate::base::{PolicyError, PolicyResult};
use crate::reports::ReportChanges;

pub struct UpdateReportContract<'a> {
    actor: &'a dyn ActorContext,
    report: &'a Report,
}

impl<'a> UpdateReportContract<'a> {
    pub fn new(actor: &'a dyn ActorContext, report: &'a Report) -> Self {
        Self { actor, report }
    }

    fn is_owner(&self) -> bool {
        self.report.is_owned_by(self.actor.id())
    }

    pub fn validate(&self, changes: &ReportChanges) -> PolicyResult {
        if !self.is_owner() && !self.actor.is_staff() {
            return Err(PolicyError::forbidden(
                "may not update reports of other users",
            ));
        }

        if changes.verified_by_id.is_some() && !self.actor.is_staff() {
            return Err(PolicyError::not_writable("verified_by"));
        }

        if changes.touches_worktime() {
            if self.actor.is_staff() {
                let field = if changes.duration.is_some() {
                    "duration"
                } else if changes.date.is_some() {
                    "date"
                } else {
                    "task"
                };
                return Err(PolicyError::not_writable(field));
            }
            if self.report.is_verified() {
                return Err(PolicyError::forbidden(
                    "may not change a verified report",
                ));
            }
        }

        if let Some(duration) = changes.duration {
            if duration < chrono::Duration::zero() {
                let mut errors = timed_core::error::ValidationErrors::new();
                errors.add("duration", "must not be negative");
                return Err(PolicyError::Validation(errors));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::super::testing::{report, MockActor};
    use super::*;

    fn duration_change() -> ReportChanges {
        ReportChanges {
            duration: Some(Duration::hours(1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_owner_updates_unverified_report() {
        let actor = MockActor::regular(1);
        let report = report(1, None);
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            comment: Some("foobar".into()),
            duration: Some(Duration::hours(1)),
            date: NaiveDate::from_ymd_opt(2017, 2, 4),
            task_id: Some(11),
            ..Default::default()
        };
        assert!(contract.validate(&changes).is_ok());
    }

    #[test]
    fn test_owner_cannot_change_verified_duration() {
        let actor = MockActor::regular(1);
        let report = report(1, Some(2));
        let contract = UpdateReportContract::new(&actor, &report);

        let err = contract.validate(&duration_change()).unwrap_err();
        assert!(matches!(err, PolicyError::Forbidden(_)));
    }

    #[test]
    fn test_owner_of_verified_report_can_still_edit_comment() {
        let actor = MockActor::regular(1);
        let report = report(1, Some(2));
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            comment: Some("foobar".into()),
            ..Default::default()
        };
        assert!(contract.validate(&changes).is_ok());
    }

    #[test]
    fn test_staff_duration_write_is_malformed_not_forbidden() {
        let actor = MockActor::staff(2);
        for verified_by in [None, Some(2)] {
            let report = report(1, verified_by);
            let contract = UpdateReportContract::new(&actor, &report);
            let err = contract.validate(&duration_change()).unwrap_err();
            assert!(matches!(err, PolicyError::Validation(_)));
        }
    }

    #[test]
    fn test_staff_date_write_is_malformed_on_own_report_too() {
        let actor = MockActor::staff(1);
        let report = report(1, None);
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            date: NaiveDate::from_ymd_opt(2017, 2, 4),
            ..Default::default()
        };
        let err = contract.validate(&changes).unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }

    #[test]
    fn test_staff_updates_comment_and_verified_by() {
        let actor = MockActor::staff(2);
        let report = report(1, None);
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            comment: Some("foobar".into()),
            verified_by_id: Some(Some(2)),
            ..Default::default()
        };
        assert!(contract.validate(&changes).is_ok());
    }

    #[test]
    fn test_staff_resets_verified_by() {
        let actor = MockActor::staff(2);
        let report = report(1, Some(2));
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            verified_by_id: Some(None),
            ..Default::default()
        };
        assert!(contract.validate(&changes).is_ok());
    }

    #[test]
    fn test_non_staff_cannot_set_verified_by_on_own_report() {
        let actor = MockActor::regular(1);
        let report = report(1, None);
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            verified_by_id: Some(Some(1)),
            ..Default::default()
        };
        let err = contract.validate(&changes).unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }

    #[test]
    fn test_non_owner_non_staff_is_forbidden() {
        let actor = MockActor::regular(2);
        let report = report(1, None);
        let contract = UpdateReportContract::new(&actor, &report);

        let changes = ReportChanges {
            comment: Some("foobar".into()),
            ..Default::default()
        };
        let err = contract.validate(&changes).unwrap_err();
        assert!(matches!(err, PolicyError::Forbidden(_)));
    }
}
