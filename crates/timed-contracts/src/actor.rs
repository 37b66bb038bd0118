//! Actor context threaded into every contract

use std::collections::HashSet;

use timed_core::Id;
use timed_models::User;

/// The acting user as seen by contracts.
pub trait ActorContext: Send + Sync {
    fn id(&self) -> Id;
    fn is_staff(&self) -> bool;
    fn is_superuser(&self) -> bool;
    /// Whether the actor is a reviewer on the given project.
    fn reviews_project(&self, project_id: Id) -> bool;
}

/// A loaded user plus the projects they review.
#[derive(Debug, Clone)]
pub struct CurrentActor {
    pub user: User,
    reviewed_projects: HashSet<Id>,
}

impl CurrentActor {
    pub fn new(user: User, reviewed_projects: impl IntoIterator<Item = Id>) -> Self {
        Self {
            user,
            reviewed_projects: reviewed_projects.into_iter().collect(),
        }
    }
}

impl ActorContext for CurrentActor {
    fn id(&self) -> Id {
        self.user.id
    }

    fn is_staff(&self) -> bool {
        self.user.is_staff
    }

    fn is_superuser(&self) -> bool {
        self.user.is_superuser
    }

    fn reviews_project(&self, project_id: Id) -> bool {
        self.reviewed_projects.contains(&project_id)
    }
}
