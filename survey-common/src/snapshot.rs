//! In-memory snapshot of the survey response table
//!
//! A [`Snapshot`] is produced once per fetch and never mutated afterwards.
//! Everything downstream (pipeline, dashboard, raw-data view) reads it
//! through a shared `Arc<Snapshot>`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;

use crate::{Error, Result};

/// One cell of a snapshot row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Textual form used as a category label; `None` for null cells
    pub fn as_label(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            CellValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            CellValue::Float(f) => Some(Cow::Owned(f.to_string())),
        }
    }

}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for CellValue {
    fn from(value: Option<&str>) -> Self {
        value.map(CellValue::from).unwrap_or(CellValue::Null)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

/// Immutable tabular copy of one query result
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot, checking every row has one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::Query(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self {
            columns,
            rows,
            fetched_at: Utc::now(),
        })
    }

    /// Snapshot of a query that returned no rows
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Zero rows; a valid, non-error result
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Position of `name` in the column list
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// All cells of one column, in row order
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a CellValue> + 'a> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    /// Fail with every absent column named at once
    pub fn require_columns<S: AsRef<str>>(&self, expected: &[S]) -> Result<()> {
        let missing: Vec<String> = expected
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.columns.iter().any(|c| c == name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Schema { missing })
        }
    }
}
