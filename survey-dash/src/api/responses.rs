//! Raw-data view: the cached snapshot, 100 rows per page

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use survey_common::db::FixedQuery;
use survey_common::CellValue;

use super::ApiError;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResponsesQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct ResponsesPage {
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub fetched_at: DateTime<Utc>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// GET /api/responses?page=N
pub async fn get_responses(
    State(state): State<AppState>,
    Query(query): Query<ResponsesQuery>,
) -> Result<Json<ResponsesPage>, ApiError> {
    let snapshot = state.accessor.fetch(FixedQuery::AllResponses).await?;
    let pagination = calculate_pagination(snapshot.row_count(), query.page);

    Ok(Json(ResponsesPage {
        total_rows: snapshot.row_count(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        fetched_at: snapshot.fetched_at(),
        columns: snapshot.columns().to_vec(),
        rows: snapshot.rows()[pagination.range()].to_vec(),
    }))
}
