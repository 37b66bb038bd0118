//! Core traits and type aliases shared across crates

/// Primary key type
pub type Id = i64;
