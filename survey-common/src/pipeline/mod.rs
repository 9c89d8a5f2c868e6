//! Aggregation pipeline: snapshot rows → ready-to-plot series
//!
//! Every function here is a pure function of its inputs. Null cells are
//! excluded from counts (never zero-counted); a column absent from the
//! snapshot is reported as [`crate::Error::Schema`].
//!
//! | Function | Output |
//! |----------|--------|
//! | [`count_categorical`] | [`CategoricalCount`] of verbatim values |
//! | [`count_normalized_categorical`] | [`CategoricalCount`] of trimmed, title-cased values |
//! | [`count_multi_value_tags`] | [`MultiValueTagCount`] of delimiter-separated tags |
//! | [`to_ordered_frequency_series`] | [`OrderedFrequencySeries`] over a fixed vocabulary |
//! | [`summarize_by_group`] | [`GroupSummary`] with mean responses per group |
//! | [`sort_descending_by_count`] | stable `(label, count)` sequence |
//! | [`collect_free_text`] | non-blank free-text answers |

mod counts;
mod groups;
mod normalize;
mod ordered;
mod sort;

pub use counts::{
    collect_free_text, count_categorical, count_multi_value_tags, count_normalized_categorical,
    DEFAULT_TAG_DELIMITER,
};
pub use groups::{summarize_by_group, GroupSummary};
pub use normalize::{normalize_label, title_case, UNSPECIFIED_LABEL};
pub use ordered::{to_ordered_frequency_series, OrderedFrequencySeries, UnmatchedLabelPolicy};
pub use sort::sort_descending_by_count;

use indexmap::IndexMap;
use serde::Serialize;

/// Label → occurrence count, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoricalCount {
    counts: IndexMap<String, u64>,
}

/// Tag counts from a multi-value column; a row may contribute to several labels
pub type MultiValueTagCount = CategoricalCount;

impl CategoricalCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `label`, keeping first-seen order
    pub fn increment(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_string(), 1);
            }
        }
    }

    /// Count for `label`, 0 when never seen
    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(label, count)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for CategoricalCount {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = IndexMap::new();
        for (label, count) in iter {
            *counts.entry(label.into()).or_insert(0) += count;
        }
        Self { counts }
    }
}
