//! Base contract types

use thiserror::Error;
use timed_core::error::{TrackingError, ValidationErrors};

/// A contract denial.
///
/// `Validation` covers payloads that are malformed for the acting user
/// (a field they may never write), `Forbidden` covers well-formed
/// operations the actor lacks standing for. The two map to 400 and 403.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl PolicyError {
    pub fn not_writable(field: &str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, "is not writable");
        Self::Validation(errors)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

impl From<PolicyError> for TrackingError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Validation(errors) => TrackingError::Validation(errors),
            PolicyError::Forbidden(message) => TrackingError::Forbidden { message },
        }
    }
}

pub type PolicyResult = Result<(), PolicyError>;
