//! # timed-models
//!
//! Domain entities for Timed RS: users, customers, projects, tasks, and
//! the reports that tie them together. Cost centers appear only as id
//! columns on tasks and projects; nothing reads the entity itself.

pub mod customer;
pub mod project;
pub mod report;
pub mod task;
pub mod user;

pub use customer::Customer;
pub use project::Project;
pub use report::{NewReport, Report, ReportExportRow};
pub use task::Task;
pub use user::User;
