//! Report API handlers
//!
//! Field names on the wire are kebab-case. `verified-by` on update is
//! doubly optional: absent means untouched, `null` means clear. Listing
//! is not access-scoped (the roster is visible to every authenticated
//! user); the detail route is, and hides unreadable reports as 404.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use timed_core::{format_duration, parse_duration, Id};
use timed_export::ExportFormat;
use timed_models::Report;
use timed_services::{NewReportParams, ReportFilter};
use timed_contracts::reports::ReportChanges;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUserId, Pagination};

/// GET /api/v1/reports
pub async fn list_reports(
    State(state): State<AppState>,
    user: CurrentUserId,
    pagination: Pagination,
    Query(filter): Query<ReportFilter>,
) -> ApiResult<impl IntoResponse> {
    state.service.load_actor(user.0).await?;

    let (reports, total_time) = state.service.list(&filter, *pagination).await?;

    let data: Vec<ReportResponse> = reports.items.into_iter().map(ReportResponse::from).collect();
    Ok(Json(ReportCollection {
        meta: CollectionMeta {
            total_time: format_duration(total_time),
            count: reports.total,
            page: reports.page,
            page_size: reports.page_size,
        },
        data,
    }))
}

/// GET /api/v1/reports/:id
pub async fn get_report(
    State(state): State<AppState>,
    user: CurrentUserId,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.service.load_actor(user.0).await?;
    let report = state.service.get(&actor, id).await?;
    Ok(Json(ReportResponse::from(report)))
}

/// POST /api/v1/reports
pub async fn create_report(
    State(state): State<AppState>,
    user: CurrentUserId,
    Json(dto): Json<CreateReportDto>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.service.load_actor(user.0).await?;

    let duration = parse_duration(&dto.duration)
        .ok_or_else(|| ApiError::bad_request("duration must be HH:MM or HH:MM:SS"))?;

    let report = state
        .service
        .create(
            &actor,
            NewReportParams {
                task_id: dto.task,
                date: dto.date,
                duration,
                comment: dto.comment,
                review: dto.review,
                not_billable: dto.not_billable,
                verified_by_id: dto.verified_by,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// PATCH /api/v1/reports/:id
pub async fn update_report(
    State(state): State<AppState>,
    user: CurrentUserId,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateReportDto>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.service.load_actor(user.0).await?;

    let duration = dto
        .duration
        .as_deref()
        .map(|value| {
            parse_duration(value)
                .ok_or_else(|| ApiError::bad_request("duration must be HH:MM or HH:MM:SS"))
        })
        .transpose()?;

    let changes = ReportChanges {
        task_id: dto.task,
        date: dto.date,
        duration,
        comment: dto.comment,
        review: dto.review,
        not_billable: dto.not_billable,
        verified_by_id: dto.verified_by,
    };

    let report = state.service.update(&actor, id, changes).await?;
    Ok(Json(ReportResponse::from(report)))
}

/// DELETE /api/v1/reports/:id
pub async fn delete_report(
    State(state): State<AppState>,
    user: CurrentUserId,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.service.load_actor(user.0).await?;
    state.service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/reports/verify
///
/// `page_size` is accepted for clients that batch their progress UI; the
/// whole filtered set is verified either way.
pub async fn verify_reports(
    State(state): State<AppState>,
    user: CurrentUserId,
    Query(filter): Query<ReportFilter>,
    Query(batch): Query<VerifyParams>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.service.load_actor(user.0).await?;

    if let Some(page_size) = batch.page_size {
        tracing::debug!(page_size, "verify requested with client-side batching");
    }

    let verified = state.service.verify(&actor, &filter).await?;
    Ok(Json(VerifyResponse { verified }))
}

/// GET /api/v1/reports/export
pub async fn export_reports(
    State(state): State<AppState>,
    user: CurrentUserId,
    Query(filter): Query<ReportFilter>,
    Query(params): Query<ExportParams>,
) -> ApiResult<impl IntoResponse> {
    state.service.load_actor(user.0).await?;

    // Reject bad formats before touching the report set.
    let file_type = params
        .file_type
        .ok_or_else(|| ApiError::bad_request("file_type is required"))?;
    let format = ExportFormat::from_param(&file_type).ok_or_else(|| {
        ApiError::bad_request(format!("unsupported file_type: {}", file_type))
    })?;

    let (rows, total) = state.service.export(&filter).await?;
    let bytes = timed_export::render(format, &rows)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"reports.{}\"", format.as_str()),
        ),
        (
            header::HeaderName::from_static("x-total-time"),
            format_duration(total),
        ),
    ];
    Ok((headers, bytes))
}

// Query parameters

#[derive(Debug, Deserialize, Default)]
pub struct VerifyParams {
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExportParams {
    pub file_type: Option<String>,
}

// DTOs

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportCollection {
    pub data: Vec<ReportResponse>,
    pub meta: CollectionMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CollectionMeta {
    pub total_time: String,
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportResponse {
    pub id: Id,
    pub user: Id,
    pub task: Id,
    pub date: NaiveDate,
    pub duration: String,
    pub comment: String,
    pub review: bool,
    pub not_billable: bool,
    pub verified_by: Option<Id>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            user: report.user_id,
            task: report.task_id,
            date: report.date,
            duration: format_duration(report.duration()),
            comment: report.comment,
            review: report.review,
            not_billable: report.not_billable,
            verified_by: report.verified_by_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateReportDto {
    pub task: Id,
    pub date: NaiveDate,
    pub duration: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub review: bool,
    #[serde(default)]
    pub not_billable: bool,
    #[serde(default)]
    pub verified_by: Option<Id>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateReportDto {
    pub task: Option<Id>,
    pub date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub comment: Option<String>,
    pub review: Option<bool>,
    pub not_billable: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub verified_by: Option<Option<Id>>,
}

/// Distinguish an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
