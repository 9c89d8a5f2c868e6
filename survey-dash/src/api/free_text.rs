//! Descriptive answers for one free-text question

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use survey_common::db::FixedQuery;
use survey_common::pipeline::collect_free_text;

use super::ApiError;
use crate::dashboard::{free_text_heading, number_answers, NumberedAnswer};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FreeTextResponse {
    pub column: String,
    pub heading: &'static str,
    pub total: usize,
    pub answers: Vec<NumberedAnswer>,
}

/// GET /api/free-text/:column
pub async fn get_free_text(
    State(state): State<AppState>,
    Path(column): Path<String>,
) -> Result<Json<FreeTextResponse>, ApiError> {
    let heading = free_text_heading(&column).ok_or_else(|| ApiError::NotFreeText(column.clone()))?;

    let snapshot = state.accessor.fetch(FixedQuery::AllResponses).await?;
    let answers = if snapshot.is_empty() {
        Vec::new()
    } else {
        number_answers(collect_free_text(&snapshot, &column)?)
    };

    Ok(Json(FreeTextResponse {
        column,
        heading,
        total: answers.len(),
        answers,
    }))
}
