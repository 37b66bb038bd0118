//! Report model
//!
//! A report is a single time entry: one user, one task, one date, one
//! duration. Once persisted its duration is always a multiple of the
//! rounding increment. A set `verified_by_id` freezes owner-side edits of
//! duration and date.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use timed_core::Id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Id,
    pub user_id: Id,
    pub task_id: Id,
    pub date: NaiveDate,
    pub duration_secs: i64,
    pub comment: String,
    pub review: bool,
    pub not_billable: bool,
    pub verified_by_id: Option<Id>,
}

impl Report {
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_secs)
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.num_seconds();
    }

    pub fn is_verified(&self) -> bool {
        self.verified_by_id.is_some()
    }

    pub fn is_owned_by(&self, user_id: Id) -> bool {
        self.user_id == user_id
    }
}

/// A report about to be inserted; `user_id` is always the acting user.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: Id,
    pub task_id: Id,
    pub date: NaiveDate,
    pub duration_secs: i64,
    pub comment: String,
    pub review: bool,
    pub not_billable: bool,
    pub verified_by_id: Option<Id>,
}

/// One export row: a report joined with the names around it.
#[derive(Debug, Clone, Serialize)]
pub struct ReportExportRow {
    pub user: String,
    pub customer: String,
    pub project: String,
    pub task: String,
    pub date: NaiveDate,
    pub duration_secs: i64,
    pub comment: String,
}

impl ReportExportRow {
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_secs)
    }
}
