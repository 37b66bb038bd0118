//! Customer model

use serde::{Deserialize, Serialize};
use timed_core::Id;

/// A customer owning one or more projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Id,
    pub name: String,
    pub archived: bool,
}
