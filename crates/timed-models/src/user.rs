//! User model

use serde::{Deserialize, Serialize};
use timed_core::Id;

/// An authenticated identity.
///
/// `is_staff` grants project-independent review rights. `is_superuser` on
/// its own grants nothing in the tracking engine; a superuser without the
/// staff flag cannot verify or touch other users' reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        if self.first_name.is_empty() && self.last_name.is_empty() {
            self.username.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string()
        }
    }
}
