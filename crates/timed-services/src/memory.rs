//! In-memory tracking store
//!
//! Backs the integration test suite and lets the server come up without a
//! database. Filter semantics must stay in lockstep with the SQL store;
//! both delegate the per-report predicate to [`ReportFilter::matches`]
//! semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Duration;
use timed_core::{Id, PageParams, Paginated, TrackingError, TrackingResult};
use timed_models::{Customer, NewReport, Project, Report, ReportExportRow, Task, User};

use crate::aggregate::total_duration;
use crate::filter::ReportFilter;
use crate::store::TrackingStore;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Id, User>,
    customers: HashMap<Id, Customer>,
    projects: HashMap<Id, Project>,
    tasks: HashMap<Id, Task>,
    reports: HashMap<Id, Report>,
    /// project id -> reviewer user ids
    reviewers: HashMap<Id, Vec<Id>>,
    next_report_id: Id,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    pub fn add_customer(&self, customer: Customer) {
        self.lock().customers.insert(customer.id, customer);
    }

    pub fn add_project(&self, project: Project) {
        self.lock().projects.insert(project.id, project);
    }

    pub fn add_task(&self, task: Task) {
        self.lock().tasks.insert(task.id, task);
    }

    pub fn add_reviewer(&self, project_id: Id, user_id: Id) {
        self.lock()
            .reviewers
            .entry(project_id)
            .or_default()
            .push(user_id);
    }

    /// Insert a report directly, bypassing policy. Test seeding only.
    pub fn add_report(&self, report: Report) {
        let mut inner = self.lock();
        inner.next_report_id = inner.next_report_id.max(report.id);
        inner.reports.insert(report.id, report);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Inner {
    fn matching(&self, filter: &ReportFilter) -> Vec<Report> {
        let mut matched: Vec<Report> = self
            .reports
            .values()
            .filter(|report| {
                let Some(task) = self.tasks.get(&report.task_id) else {
                    return false;
                };
                let Some(project) = self.projects.get(&task.project_id) else {
                    return false;
                };
                let reviewers = self
                    .reviewers
                    .get(&project.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                filter.matches(report, task, project, reviewers)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        matched
    }
}

#[async_trait]
impl TrackingStore for MemoryStore {
    async fn find_user(&self, id: Id) -> TrackingResult<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn reviewed_projects(&self, user_id: Id) -> TrackingResult<Vec<Id>> {
        Ok(self
            .lock()
            .reviewers
            .iter()
            .filter(|(_, users)| users.contains(&user_id))
            .map(|(project_id, _)| *project_id)
            .collect())
    }

    async fn find_task(&self, id: Id) -> TrackingResult<Option<Task>> {
        Ok(self.lock().tasks.get(&id).cloned())
    }

    async fn find_report(&self, id: Id) -> TrackingResult<Option<Report>> {
        Ok(self.lock().reports.get(&id).cloned())
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: PageParams,
    ) -> TrackingResult<Paginated<Report>> {
        let matched = self.lock().matching(filter);
        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Paginated::new(items, total, page))
    }

    async fn total_duration(&self, filter: &ReportFilter) -> TrackingResult<Duration> {
        let matched = self.lock().matching(filter);
        Ok(total_duration(&matched))
    }

    async fn insert_report(&self, report: NewReport) -> TrackingResult<Report> {
        let mut inner = self.lock();
        inner.next_report_id += 1;
        let stored = Report {
            id: inner.next_report_id,
            user_id: report.user_id,
            task_id: report.task_id,
            date: report.date,
            duration_secs: report.duration_secs,
            comment: report.comment,
            review: report.review,
            not_billable: report.not_billable,
            verified_by_id: report.verified_by_id,
        };
        inner.reports.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_report(&self, report: &Report) -> TrackingResult<Report> {
        let mut inner = self.lock();
        if !inner.reports.contains_key(&report.id) {
            return Err(TrackingError::not_found("report", report.id));
        }
        inner.reports.insert(report.id, report.clone());
        Ok(report.clone())
    }

    async fn delete_report(&self, id: Id) -> TrackingResult<()> {
        if self.lock().reports.remove(&id).is_none() {
            return Err(TrackingError::not_found("report", id));
        }
        Ok(())
    }

    async fn verify_unverified(
        &self,
        filter: &ReportFilter,
        verified_by: Id,
    ) -> TrackingResult<u64> {
        let mut inner = self.lock();
        let candidates: Vec<Id> = inner
            .matching(filter)
            .into_iter()
            .filter(|report| !report.is_verified())
            .map(|report| report.id)
            .collect();
        let mut affected = 0;
        for id in candidates {
            if let Some(report) = inner.reports.get_mut(&id) {
                report.verified_by_id = Some(verified_by);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn export_rows(
        &self,
        filter: &ReportFilter,
    ) -> TrackingResult<Vec<ReportExportRow>> {
        let inner = self.lock();
        let rows = inner
            .matching(filter)
            .into_iter()
            .map(|report| {
                let task = inner.tasks.get(&report.task_id);
                let project = task.and_then(|t| inner.projects.get(&t.project_id));
                let customer = project.and_then(|p| inner.customers.get(&p.customer_id));
                ReportExportRow {
                    user: inner
                        .users
                        .get(&report.user_id)
                        .map(User::full_name)
                        .unwrap_or_default(),
                    customer: customer.map(|c| c.name.clone()).unwrap_or_default(),
                    project: project.map(|p| p.name.clone()).unwrap_or_default(),
                    task: task.map(|t| t.name.clone()).unwrap_or_default(),
                    date: report.date,
                    duration_secs: report.duration_secs,
                    comment: report.comment,
                }
            })
            .collect();
        Ok(rows)
    }
}
