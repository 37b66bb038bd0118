//! API routes

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::extractors::AppState;
use crate::handlers::reports;

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/reports", reports_router())
}

fn reports_router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports).post(reports::create_report))
        .route("/verify", post(reports::verify_reports))
        .route("/export", get(reports::export_reports))
        .route(
            "/:id",
            get(reports::get_report)
                .patch(reports::update_report)
                .delete(reports::delete_report),
        )
}

async fn api_root() -> axum::Json<ApiRoot> {
    axum::Json(ApiRoot {
        instance_name: "Timed RS".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

#[derive(Serialize)]
struct ApiRoot {
    #[serde(rename = "instanceName")]
    instance_name: String,
    version: String,
}
