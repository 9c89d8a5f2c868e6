//! survey-dash library - survey response dashboard service
//!
//! Serves the aggregated survey dashboard, the raw-data view and the
//! descriptive answers over HTTP. All data routes read one cached snapshot
//! through the shared [`ResponseAccessor`].

use axum::Router;
use std::sync::Arc;
use survey_common::config::DashboardConfig;
use survey_common::db::ResponseAccessor;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod dashboard;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Snapshot source with time-boxed reuse
    pub accessor: Arc<ResponseAccessor>,
    /// Vocabulary, unmatched-label policy and tag delimiter
    pub settings: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(accessor: Arc<ResponseAccessor>, settings: DashboardConfig) -> Self {
        Self {
            accessor,
            settings: Arc::new(settings),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let data = Router::new()
        .route("/api/dashboard", get(api::get_dashboard))
        .route("/api/responses", get(api::get_responses))
        .route("/api/free-text/:column", get(api::get_free_text))
        .route("/api/refresh", post(api::refresh));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(data)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
