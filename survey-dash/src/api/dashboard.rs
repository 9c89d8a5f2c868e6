//! Dashboard API: every panel in one response

use axum::{extract::State, Json};
use survey_common::db::FixedQuery;
use tracing::warn;

use super::ApiError;
use crate::dashboard::{build_dashboard, DashboardReport};
use crate::AppState;

/// GET /api/dashboard
///
/// Always 200 when the store is the problem: the report then carries the
/// `unavailable` status and a warning. Schema and vocabulary errors are 500.
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardReport>, ApiError> {
    let snapshot = match state.accessor.fetch(FixedQuery::AllResponses).await {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_store_failure() => {
            warn!("Dashboard rendered without data: {}", e);
            return Ok(Json(DashboardReport::unavailable()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(build_dashboard(&snapshot, &state.settings)?))
}
