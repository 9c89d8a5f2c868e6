//! Per-group response counts

use serde::Serialize;

use super::{count_categorical, CategoricalCount};
use crate::snapshot::Snapshot;
use crate::Result;

/// Rows per group plus the mean group size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub counts: CategoricalCount,
    /// Arithmetic mean of the group counts; 0.0 when there are no groups
    pub mean: f64,
}

impl GroupSummary {
    pub fn from_counts(counts: CategoricalCount) -> Self {
        let mean = if counts.is_empty() {
            0.0
        } else {
            counts.total() as f64 / counts.len() as f64
        };
        Self { counts, mean }
    }

    /// Mean rendered for display (two decimals)
    pub fn mean_display(&self) -> String {
        format!("{:.2}", self.mean)
    }
}

/// Count rows per value of `group_column` and average the group sizes
pub fn summarize_by_group(snapshot: &Snapshot, group_column: &str) -> Result<GroupSummary> {
    Ok(GroupSummary::from_counts(count_categorical(
        snapshot,
        group_column,
    )?))
}
