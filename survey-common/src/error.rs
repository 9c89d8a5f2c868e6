//! Common error types for the survey dashboard

use thiserror::Error;

/// Common result type for survey operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the accessor, the pipeline and the service
///
/// A snapshot with zero rows is NOT an error; see [`crate::snapshot::Snapshot::is_empty`].
#[derive(Error, Debug)]
pub enum Error {
    /// Store unreachable, credentials missing or rejected, connect timeout
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement failed against the store (missing table, bad SQL)
    #[error("Query error: {0}")]
    Query(String),

    /// Expected column(s) absent from the snapshot
    #[error("Schema error: missing column(s) {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// Data labels outside the ordered vocabulary (only under the reject policy)
    #[error("Labels outside vocabulary: {}", .0.join(", "))]
    UnmatchedLabels(Vec<String>),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a single missing column
    pub fn missing_column(name: impl Into<String>) -> Self {
        Error::Schema {
            missing: vec![name.into()],
        }
    }

    /// True for failures of the store itself (connection or query)
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Query(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_columns() {
        let err = Error::Schema {
            missing: vec!["course".to_string(), "university".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Schema error: missing column(s) course, university"
        );
    }

    #[test]
    fn test_store_failure_classification() {
        assert!(Error::Connection("refused".into()).is_store_failure());
        assert!(Error::Query("no such table".into()).is_store_failure());
        assert!(!Error::missing_column("course").is_store_failure());
    }
}
