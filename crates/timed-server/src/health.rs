//! Health endpoints
//!
//! `/health/live` answers as long as the process runs; `/health/ready`
//! additionally pings the database when one is attached. A server running
//! on the in-memory store is always ready.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use timed_db::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub database: &'static str,
}

pub struct HealthState {
    start_time: Instant,
    database: Option<Database>,
}

impl HealthState {
    pub fn new(database: Option<Database>) -> Self {
        Self {
            start_time: Instant::now(),
            database,
        }
    }

    async fn database_status(&self) -> (&'static str, bool) {
        match &self.database {
            Some(db) => match db.ping().await {
                Ok(()) => ("connected", true),
                Err(e) => {
                    tracing::warn!("database health check failed: {}", e);
                    ("unreachable", false)
                }
            },
            None => ("in-memory", true),
        }
    }
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(
    State(state): State<Arc<HealthState>>,
) -> (StatusCode, Json<HealthReport>) {
    let (database, healthy) = state.database_status().await;
    let report = HealthReport {
        status: if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
