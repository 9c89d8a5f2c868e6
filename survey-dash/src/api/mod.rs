//! HTTP API handlers for survey-dash

pub mod buildinfo;
pub mod dashboard;
pub mod error;
pub mod free_text;
pub mod health;
pub mod refresh;
pub mod responses;
pub mod ui;

pub use buildinfo::get_build_info;
pub use dashboard::get_dashboard;
pub use error::ApiError;
pub use free_text::get_free_text;
pub use health::health_routes;
pub use refresh::refresh;
pub use responses::get_responses;
pub use ui::{serve_app_js, serve_index};
