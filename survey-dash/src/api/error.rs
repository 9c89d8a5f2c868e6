//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by the data routes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Store unreachable or query failed
    #[error("Survey responses unavailable: {0}")]
    StoreUnavailable(survey_common::Error),

    /// Snapshot arrived but could not be analysed (schema, vocabulary)
    #[error("{0}")]
    Data(survey_common::Error),

    #[error("Not a free-text column: {0}")]
    NotFreeText(String),
}

impl From<survey_common::Error> for ApiError {
    fn from(err: survey_common::Error) -> Self {
        if err.is_store_failure() {
            ApiError::StoreUnavailable(err)
        } else {
            ApiError::Data(err)
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFreeText(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Data(_) => error!("{}", self),
            _ => warn!("{}", self),
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
