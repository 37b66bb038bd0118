//! API error handling
//!
//! Maps engine errors onto status codes. Policy violations split two
//! ways: malformed or non-writable payloads are 400, standing failures
//! are 403, and unreadable reports surface as 404.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use timed_core::{TrackingError, ValidationErrors};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TrackingError> for ApiError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::NotFound { entity, id } => ApiError::NotFound {
                resource: entity,
                id,
            },
            TrackingError::Unauthorized { message } => ApiError::Unauthorized(message),
            TrackingError::Forbidden { message } => ApiError::Forbidden(message),
            TrackingError::Validation(errors) => ApiError::Validation(errors),
            TrackingError::Database(msg)
            | TrackingError::Internal(msg)
            | TrackingError::Config(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::NotFound { resource, id } => ErrorBody {
                error: "not_found",
                message: format!("{} with id {} not found", resource, id),
            },
            ApiError::Validation(errors) => ErrorBody {
                error: "validation_failed",
                message: errors.full_messages().join(", "),
            },
            ApiError::Unauthorized(msg) => ErrorBody {
                error: "unauthorized",
                message: msg.clone(),
            },
            ApiError::Forbidden(msg) => ErrorBody {
                error: "forbidden",
                message: msg.clone(),
            },
            ApiError::BadRequest(msg) => ErrorBody {
                error: "bad_request",
                message: msg.clone(),
            },
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                ErrorBody {
                    error: "internal_error",
                    message: "internal server error".into(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
