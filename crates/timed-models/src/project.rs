//! Project model

use chrono::Duration;
use serde::{Deserialize, Serialize};
use timed_core::Id;

/// A project belonging to a customer.
///
/// `estimated_time` replaced a legacy hours-based numeric field; it is
/// stored with second precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    pub customer_id: Id,
    pub cost_center_id: Option<Id>,
    pub estimated_time_secs: Option<i64>,
    pub archived: bool,
}

impl Project {
    pub fn estimated_time(&self) -> Option<Duration> {
        self.estimated_time_secs.map(Duration::seconds)
    }
}
