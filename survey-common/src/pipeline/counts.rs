//! Categorical, normalized and multi-value tag counts

use super::normalize::normalize_label;
use super::{CategoricalCount, MultiValueTagCount};
use crate::snapshot::Snapshot;
use crate::Result;

/// Delimiter used by the multi-value survey columns
pub const DEFAULT_TAG_DELIMITER: &str = ",";

/// Count non-null values of `column` verbatim (case-sensitive)
pub fn count_categorical(snapshot: &Snapshot, column: &str) -> Result<CategoricalCount> {
    let mut counts = CategoricalCount::new();
    for cell in snapshot.column_values(column)? {
        if let Some(label) = cell.as_label() {
            counts.increment(&label);
        }
    }
    Ok(counts)
}

/// Count values of `column` after trimming and title-casing
///
/// Lexical variants (`"letras "`, `" LETRAS"`) collapse into one label.
/// Null and blank cells count under [`super::UNSPECIFIED_LABEL`].
pub fn count_normalized_categorical(snapshot: &Snapshot, column: &str) -> Result<CategoricalCount> {
    let mut counts = CategoricalCount::new();
    for cell in snapshot.column_values(column)? {
        counts.increment(&normalize_label(cell));
    }
    Ok(counts)
}

/// Split each value of `column` on `delimiter` and count the trimmed tags
///
/// Empty fragments are skipped; null rows contribute nothing.
pub fn count_multi_value_tags(
    snapshot: &Snapshot,
    column: &str,
    delimiter: &str,
) -> Result<MultiValueTagCount> {
    let mut counts = MultiValueTagCount::new();
    for cell in snapshot.column_values(column)? {
        let Some(raw) = cell.as_label() else {
            continue;
        };
        for tag in raw.split(delimiter).map(str::trim) {
            if !tag.is_empty() {
                counts.increment(tag);
            }
        }
    }
    Ok(counts)
}

/// Non-null, non-blank answers of a free-text column in row order
pub fn collect_free_text(snapshot: &Snapshot, column: &str) -> Result<Vec<String>> {
    Ok(snapshot
        .column_values(column)?
        .filter_map(|cell| cell.as_label())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}
