//! # timed-services
//!
//! Business logic for the tracking engine. Services receive the acting
//! user explicitly, gate every mutation through the contracts crate,
//! round durations in the write path, and talk to persistence through the
//! [`TrackingStore`] seam.

pub mod aggregate;
pub mod filter;
pub mod memory;
pub mod reports;
pub mod store;

pub use aggregate::total_duration;
pub use filter::ReportFilter;
pub use memory::MemoryStore;
pub use reports::{NewReportParams, ReportsService};
pub use store::TrackingStore;
