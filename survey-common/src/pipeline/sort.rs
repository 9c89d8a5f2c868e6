//! Stable descending sort for count series

use super::CategoricalCount;

/// `(label, count)` pairs by count descending; equal counts keep insertion order
pub fn sort_descending_by_count(counts: &CategoricalCount) -> Vec<(String, u64)> {
    let mut pairs: Vec<(String, u64)> = counts
        .iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    // sort_by is stable
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_with_stable_ties() {
        let counts: CategoricalCount = vec![("Radio", 1), ("Phone", 3), ("Library", 1), ("School", 3)]
            .into_iter()
            .collect();
        let sorted = sort_descending_by_count(&counts);
        let labels: Vec<&str> = sorted.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Phone", "School", "Radio", "Library"]);
    }

    #[test]
    fn test_empty() {
        assert!(sort_descending_by_count(&CategoricalCount::new()).is_empty());
    }
}
