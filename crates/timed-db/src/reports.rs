//! SQL tracking store
//!
//! Translates `ReportFilter` into WHERE clauses over the reports table and
//! its joins. Cost-center filtering resolves inheritance in SQL with
//! `COALESCE(t.cost_center_id, p.cost_center_id)`, matching the in-memory
//! predicate. Bulk verification is a single UPDATE guarded by
//! `verified_by_id IS NULL`, so concurrent verify calls never double-count
//! and already-verified rows keep their original verifier.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use timed_core::{Id, PageParams, Paginated, TrackingError, TrackingResult};
use timed_models::{NewReport, Report, ReportExportRow, Task, User};
use timed_services::{ReportFilter, TrackingStore};

const REPORT_COLUMNS: &str = "r.id, r.user_id, r.task_id, r.date, r.duration_secs, \
     r.comment, r.review, r.not_billable, r.verified_by_id";

const REPORT_JOINS: &str = "FROM reports r \
     JOIN tasks t ON t.id = r.task_id \
     JOIN projects p ON p.id = t.project_id";

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    is_staff: bool,
    is_superuser: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct TaskRow {
    id: i64,
    name: String,
    project_id: i64,
    cost_center_id: Option<i64>,
    estimated_time_secs: Option<i64>,
    archived: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            name: row.name,
            project_id: row.project_id,
            cost_center_id: row.cost_center_id,
            estimated_time_secs: row.estimated_time_secs,
            archived: row.archived,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct ReportRow {
    id: i64,
    user_id: i64,
    task_id: i64,
    date: NaiveDate,
    duration_secs: i64,
    comment: String,
    review: bool,
    not_billable: bool,
    verified_by_id: Option<i64>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Report {
            id: row.id,
            user_id: row.user_id,
            task_id: row.task_id,
            date: row.date,
            duration_secs: row.duration_secs,
            comment: row.comment,
            review: row.review,
            not_billable: row.not_billable,
            verified_by_id: row.verified_by_id,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct ExportRow {
    user: String,
    customer: String,
    project: String,
    task: String,
    date: NaiveDate,
    duration_secs: i64,
    comment: String,
}

impl From<ExportRow> for ReportExportRow {
    fn from(row: ExportRow) -> Self {
        ReportExportRow {
            user: row.user,
            customer: row.customer,
            project: row.project,
            task: row.task,
            date: row.date,
            duration_secs: row.duration_secs,
            comment: row.comment,
        }
    }
}

/// Append the filter's WHERE fragments. Callers must have emitted
/// `WHERE TRUE` (with the `r`/`t`/`p` aliases in scope) beforehand.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ReportFilter) {
    if let Some(user) = filter.user {
        qb.push(" AND r.user_id = ").push_bind(user);
    }
    if let Some(task) = filter.task {
        qb.push(" AND r.task_id = ").push_bind(task);
    }
    if let Some(project) = filter.project {
        qb.push(" AND t.project_id = ").push_bind(project);
    }
    if let Some(customer) = filter.customer {
        qb.push(" AND p.customer_id = ").push_bind(customer);
    }
    if let Some(cost_center) = filter.cost_center {
        qb.push(" AND COALESCE(t.cost_center_id, p.cost_center_id) = ")
            .push_bind(cost_center);
    }
    if let Some(reviewer) = filter.reviewer {
        qb.push(
            " AND EXISTS (SELECT 1 FROM project_reviewers pr \
             WHERE pr.project_id = p.id AND pr.user_id = ",
        )
        .push_bind(reviewer)
        .push(")");
    }
    if let Some(date) = filter.date {
        qb.push(" AND r.date = ").push_bind(date);
    }
    if let Some(from) = filter.from_date {
        qb.push(" AND r.date >= ").push_bind(from);
    }
    if let Some(to) = filter.to_date {
        qb.push(" AND r.date <= ").push_bind(to);
    }
    if let Some(verified) = filter.verified {
        if verified {
            qb.push(" AND r.verified_by_id IS NOT NULL");
        } else {
            qb.push(" AND r.verified_by_id IS NULL");
        }
    }
    if let Some(not_verified) = filter.not_verified {
        if not_verified {
            qb.push(" AND r.verified_by_id IS NULL");
        } else {
            qb.push(" AND r.verified_by_id IS NOT NULL");
        }
    }
}

fn db_err(err: sqlx::Error) -> TrackingError {
    TrackingError::Database(err.to_string())
}

/// PostgreSQL-backed tracking store
pub struct PgTrackingStore {
    pool: PgPool,
}

impl PgTrackingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingStore for PgTrackingStore {
    async fn find_user(&self, id: Id) -> TrackingResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, first_name, last_name, is_staff, is_superuser
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(User::from))
    }

    async fn reviewed_projects(&self, user_id: Id) -> TrackingResult<Vec<Id>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT project_id FROM project_reviewers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(ids)
    }

    async fn find_task(&self, id: Id) -> TrackingResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, name, project_id, cost_center_id, estimated_time_secs, archived
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Task::from))
    }

    async fn find_report(&self, id: Id) -> TrackingResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, user_id, task_id, date, duration_secs,
                   comment, review, not_billable, verified_by_id
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Report::from))
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: PageParams,
    ) -> TrackingResult<Paginated<Report>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {REPORT_COLUMNS} {REPORT_JOINS} WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY r.date DESC, r.id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<ReportRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let mut count_qb =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {REPORT_JOINS} WHERE TRUE"));
        push_filter(&mut count_qb, filter);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let items = rows.into_iter().map(Report::from).collect();
        Ok(Paginated::new(items, total, page))
    }

    async fn total_duration(&self, filter: &ReportFilter) -> TrackingResult<Duration> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT COALESCE(SUM(r.duration_secs), 0)::BIGINT {REPORT_JOINS} WHERE TRUE"
        ));
        push_filter(&mut qb, filter);

        let secs: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Duration::seconds(secs))
    }

    async fn insert_report(&self, report: NewReport) -> TrackingResult<Report> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO reports (
                user_id, task_id, date, duration_secs,
                comment, review, not_billable, verified_by_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, task_id, date, duration_secs,
                      comment, review, not_billable, verified_by_id
            "#,
        )
        .bind(report.user_id)
        .bind(report.task_id)
        .bind(report.date)
        .bind(report.duration_secs)
        .bind(&report.comment)
        .bind(report.review)
        .bind(report.not_billable)
        .bind(report.verified_by_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn update_report(&self, report: &Report) -> TrackingResult<Report> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            UPDATE reports SET
                task_id = $1,
                date = $2,
                duration_secs = $3,
                comment = $4,
                review = $5,
                not_billable = $6,
                verified_by_id = $7
            WHERE id = $8
            RETURNING id, user_id, task_id, date, duration_secs,
                      comment, review, not_billable, verified_by_id
            "#,
        )
        .bind(report.task_id)
        .bind(report.date)
        .bind(report.duration_secs)
        .bind(&report.comment)
        .bind(report.review)
        .bind(report.not_billable)
        .bind(report.verified_by_id)
        .bind(report.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or_else(|| TrackingError::not_found("report", report.id))?;

        Ok(row.into())
    }

    async fn delete_report(&self, id: Id) -> TrackingResult<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(TrackingError::not_found("report", id));
        }

        Ok(())
    }

    async fn verify_unverified(
        &self,
        filter: &ReportFilter,
        verified_by: Id,
    ) -> TrackingResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE reports SET verified_by_id = ");
        qb.push_bind(verified_by);
        qb.push(format!(
            " WHERE id IN (SELECT r.id {REPORT_JOINS} WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        qb.push(") AND verified_by_id IS NULL");

        let result = qb.build().execute(&self.pool).await.map_err(db_err)?;

        Ok(result.rows_affected())
    }

    async fn export_rows(&self, filter: &ReportFilter) -> TrackingResult<Vec<ReportExportRow>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT CASE WHEN u.first_name = '' AND u.last_name = '' \
                  THEN u.username \
                  ELSE TRIM(u.first_name || ' ' || u.last_name) END AS \"user\", \
                  c.name AS customer, p.name AS project, t.name AS task, \
                  r.date, r.duration_secs, r.comment \
             {REPORT_JOINS} \
             JOIN users u ON u.id = r.user_id \
             JOIN customers c ON c.id = p.customer_id \
             WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY r.date DESC, r.id ASC");

        let rows: Vec<ExportRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(ReportExportRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(filter: &ReportFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("WHERE TRUE");
        push_filter(&mut qb, filter);
        qb.sql().to_string()
    }

    #[test]
    fn test_empty_filter_adds_no_clauses() {
        assert_eq!(sql_of(&ReportFilter::default()), "WHERE TRUE");
    }

    #[test]
    fn test_cost_center_clause_resolves_inheritance() {
        let filter = ReportFilter {
            cost_center: Some(7),
            ..Default::default()
        };
        assert!(sql_of(&filter).contains("COALESCE(t.cost_center_id, p.cost_center_id)"));
    }

    #[test]
    fn test_verified_clause_uses_null_checks() {
        let verified = ReportFilter {
            verified: Some(true),
            ..Default::default()
        };
        assert!(sql_of(&verified).contains("verified_by_id IS NOT NULL"));

        let unverified = ReportFilter {
            verified: Some(false),
            ..Default::default()
        };
        let sql = sql_of(&unverified);
        assert!(sql.contains("verified_by_id IS NULL"));
        assert!(!sql.contains("IS NOT NULL"));
    }

    #[test]
    fn test_not_verified_flag_uses_null_checks() {
        let only_unverified = ReportFilter {
            not_verified: Some(true),
            ..Default::default()
        };
        let sql = sql_of(&only_unverified);
        assert!(sql.contains("verified_by_id IS NULL"));
        assert!(!sql.contains("IS NOT NULL"));

        let only_verified = ReportFilter {
            not_verified: Some(false),
            ..Default::default()
        };
        assert!(sql_of(&only_verified).contains("verified_by_id IS NOT NULL"));
    }

    #[test]
    fn test_reviewer_clause_checks_project_membership() {
        let filter = ReportFilter {
            reviewer: Some(5),
            ..Default::default()
        };
        assert!(sql_of(&filter).contains("project_reviewers"));
    }
}
