//! # timed-core
//!
//! Core types, traits, and utilities for Timed RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Duration parsing, formatting, and rounding
//! - Pagination types
//! - Configuration types

pub mod config;
pub mod duration;
pub mod error;
pub mod pagination;
pub mod traits;

pub use duration::*;
pub use error::*;
pub use pagination::*;
pub use traits::*;

/// Standard Result type for tracking operations
pub type TrackingResult<T> = Result<T, error::TrackingError>;
