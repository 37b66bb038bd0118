//! # timed-api
//!
//! REST handlers for the tracking engine. Policy lives in the contracts
//! and services crates; this layer translates HTTP payloads into service
//! calls and service errors into status codes.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
