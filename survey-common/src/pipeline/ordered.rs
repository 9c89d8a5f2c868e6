//! Reindexing counts against an ordered vocabulary

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::CategoricalCount;
use crate::{Error, Result};

/// What to do with data labels that are not part of the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "label")]
pub enum UnmatchedLabelPolicy {
    /// Leave them out of the ordered output (reported in `unmatched`)
    #[default]
    Drop,
    /// Append one trailing bucket holding their summed count
    Bucket(String),
    /// Fail with [`Error::UnmatchedLabels`]
    Reject,
}

/// Counts laid out in vocabulary order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedFrequencySeries {
    /// One entry per vocabulary label, in vocabulary order (plus the bucket, if any)
    pub points: Vec<(String, u64)>,
    /// Data labels absent from the vocabulary, with their counts
    pub unmatched: Vec<(String, u64)>,
}

impl OrderedFrequencySeries {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(label, _)| label.as_str())
    }

    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.points.iter().map(|(_, count)| *count)
    }
}

/// Reindex `counts` against `vocabulary`, filling absent labels with 0
pub fn to_ordered_frequency_series<S: AsRef<str>>(
    counts: &CategoricalCount,
    vocabulary: &[S],
    policy: &UnmatchedLabelPolicy,
) -> Result<OrderedFrequencySeries> {
    let mut points: Vec<(String, u64)> = vocabulary
        .iter()
        .map(|label| {
            let label = label.as_ref();
            (label.to_string(), counts.get(label))
        })
        .collect();

    let unmatched: Vec<(String, u64)> = counts
        .iter()
        .filter(|(label, _)| !vocabulary.iter().any(|v| v.as_ref() == *label))
        .map(|(label, count)| (label.to_string(), count))
        .collect();

    if !unmatched.is_empty() {
        match policy {
            UnmatchedLabelPolicy::Drop => {
                warn!(
                    "Dropping {} label(s) outside the frequency vocabulary: {:?}",
                    unmatched.len(),
                    unmatched
                );
            }
            UnmatchedLabelPolicy::Bucket(bucket) => {
                let total = unmatched.iter().map(|(_, count)| count).sum::<u64>();
                points.push((bucket.clone(), total));
            }
            UnmatchedLabelPolicy::Reject => {
                return Err(Error::UnmatchedLabels(
                    unmatched.into_iter().map(|(label, _)| label).collect(),
                ));
            }
        }
    }

    Ok(OrderedFrequencySeries { points, unmatched })
}
