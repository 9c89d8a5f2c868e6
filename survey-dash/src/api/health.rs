//! Liveness probe for the dashboard service
//!
//! Answers from process state alone: a down or misconfigured response store
//! shows up on `/api/dashboard`, never here.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Service name reported by `/health`
pub const MODULE_NAME: &str = "survey-dash";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_service() {
        let Json(health) = health_check().await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.module, MODULE_NAME);
        assert!(!health.version.is_empty());
    }
}
