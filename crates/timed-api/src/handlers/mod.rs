//! API request handlers

pub mod reports;
