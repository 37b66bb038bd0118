//! Report filtering predicates
//!
//! A filter narrows the report set for listing, export, and bulk
//! verification. The SQL store translates it into WHERE clauses; the
//! in-memory store evaluates [`ReportFilter::matches`] directly. Both must
//! agree on the semantics tested here, in particular cost-center
//! inheritance: the task's cost center wins, the project's is the
//! fallback, and a report with neither never matches a cost-center filter.

use chrono::NaiveDate;
use serde::Deserialize;
use timed_core::Id;
use timed_models::{Project, Report, Task};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub user: Option<Id>,
    pub task: Option<Id>,
    pub project: Option<Id>,
    pub customer: Option<Id>,
    pub cost_center: Option<Id>,
    pub reviewer: Option<Id>,
    pub date: Option<NaiveDate>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// `Some(false)` keeps only unverified reports, `Some(true)` only
    /// verified ones.
    pub verified: Option<bool>,
    /// Wire form of the verified-state predicate: `1` keeps only
    /// unverified reports, `0` only verified ones.
    #[serde(default, deserialize_with = "zero_or_one")]
    pub not_verified: Option<bool>,
}

fn zero_or_one<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None => Ok(None),
        Some("1") => Ok(Some(true)),
        Some("0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "not_verified must be 0 or 1, got {}",
            other
        ))),
    }
}

impl ReportFilter {
    pub fn for_user(user_id: Id) -> Self {
        Self {
            user: Some(user_id),
            ..Default::default()
        }
    }

    /// Evaluate the filter against one report and its joined context.
    ///
    /// `reviewers` are the reviewer user ids of the report's project.
    pub fn matches(
        &self,
        report: &Report,
        task: &Task,
        project: &Project,
        reviewers: &[Id],
    ) -> bool {
        if let Some(user) = self.user {
            if report.user_id != user {
                return false;
            }
        }
        if let Some(task_id) = self.task {
            if report.task_id != task_id {
                return false;
            }
        }
        if let Some(project_id) = self.project {
            if task.project_id != project_id {
                return false;
            }
        }
        if let Some(customer_id) = self.customer {
            if project.customer_id != customer_id {
                return false;
            }
        }
        if let Some(cost_center_id) = self.cost_center {
            if task.effective_cost_center(project.cost_center_id) != Some(cost_center_id) {
                return false;
            }
        }
        if let Some(reviewer_id) = self.reviewer {
            if !reviewers.contains(&reviewer_id) {
                return false;
            }
        }
        if let Some(date) = self.date {
            if report.date != date {
                return false;
            }
        }
        if let Some(from) = self.from_date {
            if report.date < from {
                return false;
            }
        }
        if let Some(to) = self.to_date {
            if report.date > to {
                return false;
            }
        }
        if let Some(verified) = self.verified {
            if report.is_verified() != verified {
                return false;
            }
        }
        if let Some(not_verified) = self.not_verified {
            if report.is_verified() == not_verified {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(cost_center_id: Option<Id>) -> Project {
        Project {
            id: 1,
            name: "timed".into(),
            customer_id: 1,
            cost_center_id,
            estimated_time_secs: None,
            archived: false,
        }
    }

    fn task(cost_center_id: Option<Id>) -> Task {
        Task {
            id: 10,
            name: "backend".into(),
            project_id: 1,
            cost_center_id,
            estimated_time_secs: None,
            archived: false,
        }
    }

    fn report() -> Report {
        Report {
            id: 1,
            user_id: 1,
            task_id: 10,
            date: NaiveDate::from_ymd_opt(2017, 2, 1).unwrap(),
            duration_secs: 3600,
            comment: String::new(),
            review: false,
            not_billable: false,
            verified_by_id: None,
        }
    }

    fn cost_center_filter(id: Id) -> ReportFilter {
        ReportFilter {
            cost_center: Some(id),
            ..Default::default()
        }
    }

    #[test]
    fn test_cost_center_on_task_wins_over_project() {
        let filter = cost_center_filter(7);
        assert!(filter.matches(&report(), &task(Some(7)), &project(Some(9)), &[]));
        assert!(!cost_center_filter(9).matches(&report(), &task(Some(7)), &project(Some(9)), &[]));
    }

    #[test]
    fn test_cost_center_inherited_from_project() {
        let filter = cost_center_filter(9);
        assert!(filter.matches(&report(), &task(None), &project(Some(9)), &[]));
    }

    #[test]
    fn test_report_without_cost_center_never_matches() {
        let filter = cost_center_filter(9);
        assert!(!filter.matches(&report(), &task(None), &project(None), &[]));
    }

    #[test]
    fn test_verified_state_filter() {
        let unverified = ReportFilter {
            verified: Some(false),
            ..Default::default()
        };
        let verified = ReportFilter {
            verified: Some(true),
            ..Default::default()
        };
        let mut r = report();
        assert!(unverified.matches(&r, &task(None), &project(None), &[]));
        assert!(!verified.matches(&r, &task(None), &project(None), &[]));

        r.verified_by_id = Some(2);
        assert!(verified.matches(&r, &task(None), &project(None), &[]));
        assert!(!unverified.matches(&r, &task(None), &project(None), &[]));
    }

    #[test]
    fn test_not_verified_flag_mirrors_verified_state() {
        let only_unverified = ReportFilter {
            not_verified: Some(true),
            ..Default::default()
        };
        let only_verified = ReportFilter {
            not_verified: Some(false),
            ..Default::default()
        };
        let mut r = report();
        assert!(only_unverified.matches(&r, &task(None), &project(None), &[]));
        assert!(!only_verified.matches(&r, &task(None), &project(None), &[]));

        r.verified_by_id = Some(2);
        assert!(only_verified.matches(&r, &task(None), &project(None), &[]));
        assert!(!only_unverified.matches(&r, &task(None), &project(None), &[]));
    }

    #[test]
    fn test_reviewer_filter_uses_project_membership() {
        let filter = ReportFilter {
            reviewer: Some(5),
            ..Default::default()
        };
        assert!(filter.matches(&report(), &task(None), &project(None), &[5]));
        assert!(!filter.matches(&report(), &task(None), &project(None), &[6]));
    }

    #[test]
    fn test_combined_filters() {
        let filter = ReportFilter {
            user: Some(1),
            task: Some(10),
            project: Some(1),
            customer: Some(1),
            date: NaiveDate::from_ymd_opt(2017, 2, 1),
            ..Default::default()
        };
        assert!(filter.matches(&report(), &task(None), &project(None), &[]));

        let other_user = ReportFilter {
            user: Some(2),
            ..filter
        };
        assert!(!other_user.matches(&report(), &task(None), &project(None), &[]));
    }
}
