//! Persistence seam for the tracking engine

use async_trait::async_trait;
use chrono::Duration;
use timed_core::{Id, PageParams, Paginated, TrackingResult};
use timed_models::{NewReport, Report, ReportExportRow, Task, User};

use crate::filter::ReportFilter;

/// Everything the report services need from persistence.
///
/// Implementations must uphold two contracts: `total_duration` is the sum
/// over the whole filtered set regardless of paging, and
/// `verify_unverified` transitions only reports whose `verified_by_id` is
/// unset, under one consistent snapshot, returning the number actually
/// transitioned. That makes bulk verification idempotent and safe to
/// retry or run concurrently.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn find_user(&self, id: Id) -> TrackingResult<Option<User>>;

    /// Project ids the user reviews.
    async fn reviewed_projects(&self, user_id: Id) -> TrackingResult<Vec<Id>>;

    async fn find_task(&self, id: Id) -> TrackingResult<Option<Task>>;

    async fn find_report(&self, id: Id) -> TrackingResult<Option<Report>>;

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: PageParams,
    ) -> TrackingResult<Paginated<Report>>;

    /// Sum of durations over the whole filtered set, not just one page.
    async fn total_duration(&self, filter: &ReportFilter) -> TrackingResult<Duration>;

    async fn insert_report(&self, report: NewReport) -> TrackingResult<Report>;

    async fn update_report(&self, report: &Report) -> TrackingResult<Report>;

    async fn delete_report(&self, id: Id) -> TrackingResult<()>;

    /// Set `verified_by_id` on every matching unverified report.
    async fn verify_unverified(
        &self,
        filter: &ReportFilter,
        verified_by: Id,
    ) -> TrackingResult<u64>;

    /// One row per matching report, in filter-defined order.
    async fn export_rows(&self, filter: &ReportFilter)
        -> TrackingResult<Vec<ReportExportRow>>;
}
