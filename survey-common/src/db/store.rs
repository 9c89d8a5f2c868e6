//! Response store: the one fixed query and the backends that run it
//!
//! A backend opens a connection per call, runs the statement, materializes
//! every row into a [`Snapshot`] and closes the connection on every exit
//! path. Read-only: no statement other than [`FixedQuery::sql`] is issued.

use async_trait::async_trait;
use std::fmt;

use crate::snapshot::Snapshot;
use crate::Result;

/// Identifier of one parameterless statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedQuery {
    /// `SELECT * FROM <survey table>`
    AllResponses,
}

impl FixedQuery {
    /// SQL text for this query; `table` must already be a validated identifier
    pub fn sql(&self, table: &str) -> String {
        match self {
            FixedQuery::AllResponses => format!("SELECT * FROM {}", table),
        }
    }
}

impl fmt::Display for FixedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedQuery::AllResponses => write!(f, "all-responses"),
        }
    }
}

/// Source of snapshots
///
/// Implementations fail with [`crate::Error::Connection`] when the store
/// cannot be reached and [`crate::Error::Query`] when the statement fails.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn run(&self, query: FixedQuery) -> Result<Snapshot>;
}

/// Stand-in used when no usable store URL was configured
///
/// Every call fails with a connection error carrying `reason`, so the
/// service still starts and reports the store as unavailable.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ResponseStore for UnavailableStore {
    async fn run(&self, _query: FixedQuery) -> Result<Snapshot> {
        Err(crate::Error::Connection(self.reason.clone()))
    }
}
