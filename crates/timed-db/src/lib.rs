//! # timed-db
//!
//! PostgreSQL persistence for the tracking engine, built on SQLx. The
//! crate provides the connection pool plus [`PgTrackingStore`], the SQL
//! implementation of the `TrackingStore` seam. Filter semantics are shared
//! with the in-memory store through `ReportFilter`; the SQL here must
//! produce the same report sets as `ReportFilter::matches`.

pub mod pool;
pub mod reports;

pub use pool::Database;
pub use reports::PgTrackingStore;
