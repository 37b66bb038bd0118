//! Report services
//!
//! Every operation takes the acting user explicitly and runs its contract
//! before touching the store. Durations are rounded here, in the write
//! path, never by the store.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use timed_contracts::reports::{
    can_read, CreateReportContract, DeleteReportContract, ReportChanges,
    UpdateReportContract, VerifyReportsContract,
};
use timed_contracts::{ActorContext, CurrentActor};
use timed_core::{
    round_duration, Id, PageParams, Paginated, TrackingError, TrackingResult,
    ROUNDING_INCREMENT_SECS,
};
use timed_models::{NewReport, Report, ReportExportRow};

use crate::filter::ReportFilter;
use crate::store::TrackingStore;

/// Parameters for creating a report. The owning user is not part of the
/// payload; it is always the acting user.
#[derive(Debug, Clone)]
pub struct NewReportParams {
    pub task_id: Id,
    pub date: NaiveDate,
    pub duration: Duration,
    pub comment: String,
    pub review: bool,
    pub not_billable: bool,
    pub verified_by_id: Option<Id>,
}

#[derive(Clone)]
pub struct ReportsService {
    store: Arc<dyn TrackingStore>,
    rounding_increment_secs: i64,
}

impl ReportsService {
    pub fn new(store: Arc<dyn TrackingStore>) -> Self {
        Self {
            store,
            rounding_increment_secs: ROUNDING_INCREMENT_SECS,
        }
    }

    /// Override the quarter-hour default, e.g. from `TrackingConfig`.
    pub fn with_rounding_increment(mut self, minutes: i64) -> Self {
        self.rounding_increment_secs = minutes.max(1) * 60;
        self
    }

    fn round(&self, duration: Duration) -> Duration {
        round_duration(duration, self.rounding_increment_secs)
    }

    /// Load a user and their reviewer memberships into an actor context.
    pub async fn load_actor(&self, user_id: Id) -> TrackingResult<CurrentActor> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(TrackingError::Unauthorized {
                message: format!("unknown user {}", user_id),
            })?;
        let reviewed = self.store.reviewed_projects(user_id).await?;
        Ok(CurrentActor::new(user, reviewed))
    }

    /// List reports with the filtered set's total time.
    pub async fn list(
        &self,
        filter: &ReportFilter,
        page: PageParams,
    ) -> TrackingResult<(Paginated<Report>, Duration)> {
        let reports = self.store.list_reports(filter, page).await?;
        let total_time = self.store.total_duration(filter).await?;
        Ok((reports, total_time))
    }

    /// Fetch a single report the actor may see.
    ///
    /// Reports outside the actor's readable set are indistinguishable
    /// from missing ones.
    pub async fn get(&self, actor: &CurrentActor, id: Id) -> TrackingResult<Report> {
        let report = self
            .store
            .find_report(id)
            .await?
            .ok_or(TrackingError::not_found("report", id))?;
        let task = self
            .store
            .find_task(report.task_id)
            .await?
            .ok_or(TrackingError::not_found("task", report.task_id))?;
        if !can_read(actor, &report, task.project_id) {
            return Err(TrackingError::not_found("report", id));
        }
        Ok(report)
    }

    pub async fn create(
        &self,
        actor: &CurrentActor,
        params: NewReportParams,
    ) -> TrackingResult<Report> {
        CreateReportContract::new(actor).validate(params.duration, params.verified_by_id)?;

        if self.store.find_task(params.task_id).await?.is_none() {
            return Err(TrackingError::validation("task", "does not exist"));
        }

        let duration = self.round(params.duration);
        let report = self
            .store
            .insert_report(NewReport {
                user_id: actor.id(),
                task_id: params.task_id,
                date: params.date,
                duration_secs: duration.num_seconds(),
                comment: params.comment,
                review: params.review,
                not_billable: params.not_billable,
                verified_by_id: params.verified_by_id,
            })
            .await?;

        tracing::debug!(report = report.id, user = actor.id(), "created report");
        Ok(report)
    }

    pub async fn update(
        &self,
        actor: &CurrentActor,
        id: Id,
        changes: ReportChanges,
    ) -> TrackingResult<Report> {
        // Mutations are not read-scoped: an actor without standing gets
        // the 403 from the contract, not a 404.
        let mut report = self
            .store
            .find_report(id)
            .await?
            .ok_or(TrackingError::not_found("report", id))?;

        UpdateReportContract::new(actor, &report).validate(&changes)?;

        if let Some(task_id) = changes.task_id {
            if self.store.find_task(task_id).await?.is_none() {
                return Err(TrackingError::validation("task", "does not exist"));
            }
            report.task_id = task_id;
        }
        if let Some(date) = changes.date {
            report.date = date;
        }
        if let Some(duration) = changes.duration {
            report.set_duration(self.round(duration));
        }
        if let Some(comment) = changes.comment {
            report.comment = comment;
        }
        if let Some(review) = changes.review {
            report.review = review;
        }
        if let Some(not_billable) = changes.not_billable {
            report.not_billable = not_billable;
        }
        if let Some(verified_by_id) = changes.verified_by_id {
            report.verified_by_id = verified_by_id;
        }

        self.store.update_report(&report).await
    }

    pub async fn delete(&self, actor: &CurrentActor, id: Id) -> TrackingResult<()> {
        let report = self
            .store
            .find_report(id)
            .await?
            .ok_or(TrackingError::not_found("report", id))?;
        DeleteReportContract::new(actor, &report).validate()?;
        self.store.delete_report(id).await
    }

    /// Bulk-verify every unverified report matching the filter.
    ///
    /// Idempotent: a second run with the same filter affects zero
    /// reports. Returns the number of reports actually transitioned.
    pub async fn verify(
        &self,
        actor: &CurrentActor,
        filter: &ReportFilter,
    ) -> TrackingResult<u64> {
        VerifyReportsContract::new(actor).validate()?;
        let affected = self.store.verify_unverified(filter, actor.id()).await?;
        tracing::info!(affected, verified_by = actor.id(), "verified reports");
        Ok(affected)
    }

    /// Assemble export rows and the set's total for a tabular encoder.
    pub async fn export(
        &self,
        filter: &ReportFilter,
    ) -> TrackingResult<(Vec<ReportExportRow>, Duration)> {
        let rows = self.store.export_rows(filter).await?;
        let total = self.store.total_duration(filter).await?;
        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use timed_core::format_duration;
    use timed_models::{Customer, Project, Task, User};

    use super::*;
    use crate::memory::MemoryStore;

    fn user(id: Id, is_staff: bool, is_superuser: bool) -> User {
        User {
            id,
            username: format!("user{}", id),
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
            is_superuser,
        }
    }

    fn service_with_fixtures() -> (ReportsService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.add_user(user(1, false, false));
        store.add_user(user(2, true, false));
        store.add_user(user(3, false, true));
        store.add_customer(Customer {
            id: 1,
            name: "acme".into(),
            archived: false,
        });
        store.add_project(Project {
            id: 1,
            name: "timed".into(),
            customer_id: 1,
            cost_center_id: None,
            estimated_time_secs: None,
            archived: false,
        });
        store.add_task(Task {
            id: 10,
            name: "backend".into(),
            project_id: 1,
            cost_center_id: None,
            estimated_time_secs: None,
            archived: false,
        });
        (ReportsService::new(store.clone()), store)
    }

    fn params(minutes: i64) -> NewReportParams {
        NewReportParams {
            task_id: 10,
            date: NaiveDate::from_ymd_opt(2017, 2, 1).unwrap(),
            duration: Duration::minutes(minutes),
            comment: "foo".into(),
            review: false,
            not_billable: false,
            verified_by_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_forces_user_and_rounds_duration() {
        let (service, _) = service_with_fixtures();
        let actor = service.load_actor(1).await.unwrap();

        let report = service.create(&actor, params(67)).await.unwrap();
        assert_eq!(report.user_id, 1);
        assert_eq!(format_duration(report.duration()), "01:00:00");

        let report = service.create(&actor, params(68)).await.unwrap();
        assert_eq!(format_duration(report.duration()), "01:15:00");

        let report = service.create(&actor, params(113)).await.unwrap();
        assert_eq!(format_duration(report.duration()), "02:00:00");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_task() {
        let (service, _) = service_with_fixtures();
        let actor = service.load_actor(1).await.unwrap();

        let mut p = params(60);
        p.task_id = 99;
        let err = service.create(&actor, p).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_configured_rounding_increment() {
        let (service, _) = service_with_fixtures();
        let service = service.with_rounding_increment(30);
        let actor = service.load_actor(1).await.unwrap();

        let report = service.create(&actor, params(50)).await.unwrap();
        assert_eq!(format_duration(report.duration()), "01:00:00");

        let report = service.create(&actor, params(40)).await.unwrap();
        assert_eq!(format_duration(report.duration()), "00:30:00");
    }

    #[tokio::test]
    async fn test_update_rounds_duration() {
        let (service, _) = service_with_fixtures();
        let actor = service.load_actor(1).await.unwrap();
        let report = service.create(&actor, params(60)).await.unwrap();

        let changes = ReportChanges {
            duration: Some(Duration::minutes(53 + 60)),
            ..Default::default()
        };
        let updated = service.update(&actor, report.id, changes).await.unwrap();
        assert_eq!(format_duration(updated.duration()), "02:00:00");
    }

    #[tokio::test]
    async fn test_list_total_time() {
        let (service, _) = service_with_fixtures();
        let actor = service.load_actor(1).await.unwrap();
        service.create(&actor, params(50)).await.unwrap();

        let filter = ReportFilter::for_user(1);
        let (reports, total) = service.list(&filter, PageParams::default()).await.unwrap();
        assert_eq!(reports.items.len(), 1);
        // 50 minutes round to 45 at write time
        assert_eq!(format_duration(total), "00:45:00");
    }

    #[tokio::test]
    async fn test_verify_is_idempotent() {
        let (service, _) = service_with_fixtures();
        let owner = service.load_actor(1).await.unwrap();
        let staff = service.load_actor(2).await.unwrap();
        service.create(&owner, params(60)).await.unwrap();
        service.create(&owner, params(60)).await.unwrap();

        let filter = ReportFilter::for_user(1);
        let affected = service.verify(&staff, &filter).await.unwrap();
        assert_eq!(affected, 2);

        // re-running the same filter touches nothing
        let affected = service.verify(&staff, &filter).await.unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_verify_requires_staff() {
        let (service, _) = service_with_fixtures();
        let owner = service.load_actor(1).await.unwrap();
        service.create(&owner, params(60)).await.unwrap();

        let filter = ReportFilter::for_user(1);
        let err = service.verify(&owner, &filter).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        // no partial effect
        let verified_only = ReportFilter {
            verified: Some(true),
            ..Default::default()
        };
        let (verified, _) = service
            .list(&verified_only, PageParams::default())
            .await
            .unwrap();
        assert_eq!(verified.items.len(), 0);
    }

    #[tokio::test]
    async fn test_superuser_cannot_delete_foreign_report() {
        // the superuser flag alone grants no standing
        let (service, _) = service_with_fixtures();
        let owner = service.load_actor(1).await.unwrap();
        let superuser = service.load_actor(3).await.unwrap();
        let report = service.create(&owner, params(60)).await.unwrap();

        let err = service.delete(&superuser, report.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_reviewer_cannot_delete_foreign_report() {
        let (service, store) = service_with_fixtures();
        store.add_user(user(4, false, false));
        store.add_reviewer(1, 4);
        let owner = service.load_actor(1).await.unwrap();
        let reviewer = service.load_actor(4).await.unwrap();
        let report = service.create(&owner, params(60)).await.unwrap();

        let err = service.delete(&reviewer, report.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_owner_deletes_own_report() {
        let (service, _) = service_with_fixtures();
        let owner = service.load_actor(1).await.unwrap();
        let report = service.create(&owner, params(60)).await.unwrap();

        service.delete(&owner, report.id).await.unwrap();
        let err = service.get(&owner, report.id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_foreign_report_reads_as_not_found() {
        let (service, store) = service_with_fixtures();
        store.add_user(user(4, false, false));
        let owner = service.load_actor(1).await.unwrap();
        let other = service.load_actor(4).await.unwrap();
        let report = service.create(&owner, params(60)).await.unwrap();

        let err = service.get(&other, report.id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_reviewer_reads_project_reports() {
        let (service, store) = service_with_fixtures();
        store.add_user(user(4, false, false));
        store.add_reviewer(1, 4);
        let owner = service.load_actor(1).await.unwrap();
        let reviewer = service.load_actor(4).await.unwrap();
        let report = service.create(&owner, params(60)).await.unwrap();

        assert!(service.get(&reviewer, report.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_export_rows_and_total() {
        let (service, _) = service_with_fixtures();
        let owner = service.load_actor(1).await.unwrap();
        service.create(&owner, params(60)).await.unwrap();
        service.create(&owner, params(30)).await.unwrap();

        let (rows, total) = service.export(&ReportFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(format_duration(total), "01:30:00");
        assert_eq!(rows[0].project, "timed");
        assert_eq!(rows[0].customer, "acme");
    }
}
