//! Manual cache invalidation

use axum::{extract::State, Json};
use serde::Serialize;
use survey_common::db::FixedQuery;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub query: String,
}

/// POST /api/refresh
///
/// The next data request goes to the store regardless of snapshot age.
pub async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let query = FixedQuery::AllResponses;
    state.accessor.invalidate(query).await;

    Json(RefreshResponse {
        status: "invalidated",
        query: query.to_string(),
    })
}
