//! Bulk verification contract

use crate::actor::ActorContext;
use crate::base::{PolicyError, PolicyResult};

/// Contract for the bulk verify workflow: staff only.
///
/// Denial happens before any report is touched, so a failed call has no
/// partial effect.
pub struct VerifyReportsContract<'a> {
    actor: &'a dyn ActorContext,
}

impl<'a> VerifyReportsContract<'a> {
    pub fn new(actor: &'a dyn ActorContext) -> Self {
        Self { actor }
    }

    pub fn validate(&self) -> PolicyResult {
        if self.actor.is_staff() {
            Ok(())
        } else {
            Err(PolicyError::forbidden("only staff may verify reports"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::MockActor;
    use super::*;

    #[test]
    fn test_staff_may_verify() {
        let actor = MockActor::staff(1);
        assert!(VerifyReportsContract::new(&actor).validate().is_ok());
    }

    #[test]
    fn test_non_staff_may_not_verify() {
        let actor = MockActor::regular(1);
        let err = VerifyReportsContract::new(&actor).validate().unwrap_err();
        assert!(matches!(err, PolicyError::Forbidden(_)));
    }

    #[test]
    fn test_superuser_flag_is_not_enough() {
        let actor = MockActor::superuser(1);
        assert!(VerifyReportsContract::new(&actor).validate().is_err());
    }
}
