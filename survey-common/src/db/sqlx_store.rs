//! sqlx-backed [`ResponseStore`] for PostgreSQL and SQLite
//!
//! The backend is chosen from the URL scheme (`postgres://`, `postgresql://`,
//! `sqlite:`). Each [`ResponseStore::run`] call opens its own connection and
//! closes it before returning. Connecting and closing are bounded by the
//! connect timeout, the statement by the query timeout.

use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, ValueRef};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::store::{FixedQuery, ResponseStore};
use crate::config::is_valid_identifier;
use crate::snapshot::{CellValue, Snapshot};
use crate::{Error, Result};

/// Database engine behind a store URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            // Never echo the URL: it carries credentials
            Err(Error::Connection(
                "Unsupported store URL scheme (expected postgres:// or sqlite:)".to_string(),
            ))
        }
    }
}

/// Statement bound unless configured otherwise
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Store that runs the fixed query through sqlx
pub struct SqlxStore {
    url: String,
    table: String,
    backend: Backend,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl std::fmt::Debug for SqlxStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxStore")
            .field("table", &self.table)
            .field("backend", &self.backend)
            .field("connect_timeout", &self.connect_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl SqlxStore {
    pub fn new(
        url: impl Into<String>,
        table: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let url = url.into();
        let table = table.into();
        if !is_valid_identifier(&table) {
            return Err(Error::Config(format!("Invalid table name: {}", table)));
        }
        let backend = Backend::from_url(&url)?;
        Ok(Self {
            url,
            table,
            backend,
            connect_timeout,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    async fn connect<C: Connection>(&self) -> Result<C> {
        match tokio::time::timeout(self.connect_timeout, C::connect(&self.url)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(Error::Connection(e.to_string())),
            Err(_) => Err(Error::Connection(format!(
                "Timed out after {}s connecting to store",
                self.connect_timeout.as_secs()
            ))),
        }
    }

    /// Run one statement future under the query timeout
    async fn bounded<T, F>(&self, statement: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, statement).await {
            Ok(result) => result.map_err(classify),
            Err(_) => Err(Error::Connection(format!(
                "Timed out after {}s waiting for query result",
                self.query_timeout.as_secs()
            ))),
        }
    }

    async fn close<C: Connection>(&self, conn: C) {
        match tokio::time::timeout(self.connect_timeout, conn.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to close store connection cleanly: {}", e),
            Err(_) => warn!("Timed out closing store connection, dropping it"),
        }
    }
}

#[async_trait]
impl ResponseStore for SqlxStore {
    async fn run(&self, query: FixedQuery) -> Result<Snapshot> {
        let sql = query.sql(&self.table);
        debug!("Running {} on {:?} store: {}", query, self.backend, sql);

        match self.backend {
            Backend::Postgres => {
                let mut conn: PgConnection = self.connect().await?;
                let result = self.bounded(sqlx::query(&sql).fetch_all(&mut conn)).await;
                self.close(conn).await;
                snapshot_from_rows(&result?, pg_cell)
            }
            Backend::Sqlite => {
                let mut conn: SqliteConnection = self.connect().await?;
                let result = self.bounded(sqlx::query(&sql).fetch_all(&mut conn)).await;
                self.close(conn).await;
                snapshot_from_rows(&result?, sqlite_cell)
            }
        }
    }
}

/// Transport failures mid-query are connection errors; the rest are query errors
fn classify(e: sqlx::Error) -> Error {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => {
            Error::Connection(e.to_string())
        }
        other => Error::Query(other.to_string()),
    }
}

fn snapshot_from_rows<R: Row>(rows: &[R], cell: fn(&R, usize) -> CellValue) -> Result<Snapshot> {
    let Some(first) = rows.first() else {
        return Ok(Snapshot::empty());
    };

    let columns = first
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();

    let cells = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| cell(row, i)).collect())
        .collect();

    Snapshot::new(columns, cells)
}

fn pg_cell(row: &PgRow, i: usize) -> CellValue {
    match row.try_get_raw(i) {
        Ok(value) if !value.is_null() => {}
        _ => return CellValue::Null,
    }

    if let Ok(v) = row.try_get::<String, _>(i) {
        return CellValue::Text(v);
    }
    if let Ok(v) = row.try_get::<i64, _>(i) {
        return CellValue::Integer(v);
    }
    if let Ok(v) = row.try_get::<i32, _>(i) {
        return CellValue::Integer(v.into());
    }
    if let Ok(v) = row.try_get::<i16, _>(i) {
        return CellValue::Integer(v.into());
    }
    if let Ok(v) = row.try_get::<f64, _>(i) {
        return CellValue::Float(v);
    }
    if let Ok(v) = row.try_get::<f32, _>(i) {
        return CellValue::Float(v.into());
    }
    if let Ok(v) = row.try_get::<bool, _>(i) {
        return CellValue::Text(v.to_string());
    }
    if let Ok(v) = row.try_get::<chrono::DateTime<chrono::Utc>, _>(i) {
        return CellValue::Text(v.to_rfc3339());
    }
    if let Ok(v) = row.try_get::<chrono::NaiveDateTime, _>(i) {
        return CellValue::Text(v.to_string());
    }
    if let Ok(v) = row.try_get::<chrono::NaiveDate, _>(i) {
        return CellValue::Text(v.to_string());
    }

    debug!("Unsupported column type at index {}, treating as null", i);
    CellValue::Null
}

fn sqlite_cell(row: &SqliteRow, i: usize) -> CellValue {
    match row.try_get_raw(i) {
        Ok(value) if !value.is_null() => {}
        _ => return CellValue::Null,
    }

    if let Ok(v) = row.try_get::<String, _>(i) {
        return CellValue::Text(v);
    }
    if let Ok(v) = row.try_get::<i64, _>(i) {
        return CellValue::Integer(v);
    }
    if let Ok(v) = row.try_get::<f64, _>(i) {
        return CellValue::Float(v);
    }

    debug!("Unsupported column type at index {}, treating as null", i);
    CellValue::Null
}
