//! Core error types for Timed RS
//!
//! The engine distinguishes malformed requests (validation, 400) from
//! well-formed requests by actors without standing (forbidden, 403).
//! All policy violations are raised before any mutation is applied.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all tracking operations
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackingError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    pub fn status_code(&self) -> u16 {
        match self {
            TrackingError::NotFound { .. } => 404,
            TrackingError::Unauthorized { .. } => 401,
            TrackingError::Forbidden { .. } => 403,
            TrackingError::Validation(_) => 400,
            TrackingError::Database(_) | TrackingError::Internal(_) => 500,
            TrackingError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TrackingError::NotFound { .. } => "not_found",
            TrackingError::Unauthorized { .. } => "unauthorized",
            TrackingError::Forbidden { .. } => "forbidden",
            TrackingError::Validation(_) => "validation_failed",
            TrackingError::Database(_) => "database_error",
            TrackingError::Internal(_) => "internal_error",
            TrackingError::Config(_) => "configuration_error",
        }
    }
}

/// Validation errors collection keyed by field name
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}
