//! Report contracts
//!
//! The decision table, per operation:
//!
//! | operation                         | owner           | staff         | other |
//! |-----------------------------------|-----------------|---------------|-------|
//! | create                            | anyone (user forced to actor)   | |       |
//! | update comment/review/not_billable| allow           | allow         | 403   |
//! | update duration/date/task         | allow if unverified, else 403 | 400 | 403 |
//! | set/clear verified_by             | 400             | allow         | 403   |
//! | delete                            | allow           | allow         | 403   |
//! | read                              | owner, staff, or project reviewer       |
//!
//! A superuser without the staff flag is "other" everywhere.

mod create;
mod delete;
mod update;
mod verify;

pub use create::CreateReportContract;
pub use delete::DeleteReportContract;
pub use update::UpdateReportContract;
pub use verify::VerifyReportsContract;

use chrono::{Duration, NaiveDate};
use timed_core::Id;
use timed_models::Report;

use crate::actor::ActorContext;

/// The set of attributes a report payload wants to change.
///
/// `verified_by_id` is doubly optional: the outer `Option` is "present in
/// the payload", the inner one distinguishes setting from clearing.
#[derive(Debug, Clone, Default)]
pub struct ReportChanges {
    pub task_id: Option<Id>,
    pub date: Option<NaiveDate>,
    pub duration: Option<Duration>,
    pub comment: Option<String>,
    pub review: Option<bool>,
    pub not_billable: Option<bool>,
    pub verified_by_id: Option<Option<Id>>,
}

impl ReportChanges {
    pub fn touches_worktime(&self) -> bool {
        self.task_id.is_some() || self.date.is_some() || self.duration.is_some()
    }
}

/// Whether the actor may see the given report at all.
///
/// `project_id` is the project of the report's task. Reports outside the
/// readable set surface as not-found, never as forbidden.
pub fn can_read(actor: &dyn ActorContext, report: &Report, project_id: Id) -> bool {
    report.is_owned_by(actor.id()) || actor.is_staff() || actor.reviews_project(project_id)
}


#[cfg(test)]
mod tests {
    use super::testing::{report, MockActor};
    use super::*;

    #[test]
    fn test_owner_can_read() {
        let actor = MockActor::regular(1);
        assert!(can_read(&actor, &report(1, None), 5));
    }

    #[test]
    fn test_staff_can_read_any() {
        let actor = MockActor::staff(2);
        assert!(can_read(&actor, &report(1, None), 5));
    }

    #[test]
    fn test_reviewer_can_read_own_project_only() {
        let mut actor = MockActor::regular(2);
        actor.reviewed = vec![5];
        assert!(can_read(&actor, &report(1, None), 5));
        assert!(!can_read(&actor, &report(1, None), 6));
    }

    #[test]
    fn test_unrelated_user_cannot_read() {
        let actor = MockActor::regular(2);
        assert!(!can_read(&actor, &report(1, None), 5));
    }
}
