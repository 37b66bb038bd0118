//! Task model

use chrono::Duration;
use serde::{Deserialize, Serialize};
use timed_core::Id;

/// A task under a project.
///
/// A task-level `cost_center_id` overrides the project's cost center; a
/// report's effective cost center is the task's if set, else the
/// project's, else absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub name: String,
    pub project_id: Id,
    pub cost_center_id: Option<Id>,
    pub estimated_time_secs: Option<i64>,
    pub archived: bool,
}

impl Task {
    pub fn estimated_time(&self) -> Option<Duration> {
        self.estimated_time_secs.map(Duration::seconds)
    }

    /// The cost center this task bills against, given its project's.
    pub fn effective_cost_center(&self, project_cost_center: Option<Id>) -> Option<Id> {
        self.cost_center_id.or(project_cost_center)
    }
}
