//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use timed_core::{Id, PageParams};
use timed_services::ReportsService;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: ReportsService,
}

impl AppState {
    pub fn new(service: ReportsService) -> Self {
        Self { service }
    }
}

/// The acting user's id, taken from the `x-user-id` header.
///
/// Authentication itself happens upstream (the session gateway strips
/// credentials and forwards the resolved user id). A missing or garbled
/// header is a 401 here.
pub struct CurrentUserId(pub Id);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Id>().ok())
            .map(CurrentUserId)
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}

/// Pagination parameters from the query string
pub struct Pagination(pub PageParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PageParams::default()));
        Ok(Pagination(params))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PageParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
