//! survey-dash - survey response dashboard
//!
//! Reads the survey response table through a time-boxed snapshot cache and
//! serves the aggregated dashboard over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use survey_common::columns::EXPECTED_COLUMNS;
use survey_common::config::{resolve_database_url, TomlConfig};
use survey_common::db::{ResponseAccessor, ResponseStore, SnapshotCache, SqlxStore, UnavailableStore};
use survey_dash::{build_router, AppState};
use tracing::{error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "survey-dash")]
#[command(about = "Survey response dashboard")]
#[command(version)]
struct Args {
    /// Configuration file (default: ~/.config/survey-dash/config.toml)
    #[arg(short, long, env = "SURVEY_DASH_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides server.bind
    #[arg(short, long, env = "SURVEY_DASH_BIND")]
    bind: Option<String>,

    /// Survey table, overrides database.table
    #[arg(long)]
    table: Option<String>,

    /// Default log level, overrides logging.level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Level comes from the config file, so load it before the subscriber
    let loaded = TomlConfig::load(args.config.as_deref());

    let level = args
        .log_level
        .as_deref()
        .or_else(|| loaded.as_ref().ok().map(|c| c.logging.level.as_str()))
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!(
        "Starting survey-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config = loaded.context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(table) = args.table {
        config.database.table = table;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        "Survey table: {} (snapshot reused for {}s)",
        config.database.table, config.database.freshness_window_secs
    );

    let store: Arc<dyn ResponseStore> = match resolve_database_url(&config.database).and_then(|url| {
        SqlxStore::new(url, &config.database.table, config.database.connect_timeout())
            .map(|store| store.with_query_timeout(config.database.query_timeout()))
    }) {
        Ok(store) => {
            info!("✓ Response store configured ({:?} backend)", store.backend());
            Arc::new(store)
        }
        Err(e) => {
            error!("Response store not available: {}", e);
            warn!("Dashboard will report the store as unavailable until restarted");
            Arc::new(UnavailableStore::new(e.to_string()))
        }
    };

    let cache = Arc::new(SnapshotCache::new(config.database.freshness_window()));
    let accessor = Arc::new(
        ResponseAccessor::new(
            store,
            cache,
            EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        )
        .with_fetch_timeout(config.database.fetch_timeout()),
    );

    let state = AppState::new(accessor, config.dashboard);
    let app = build_router(state);

    let bind = config.server.bind;
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("survey-dash listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
