//! Free-text label normalization

use crate::snapshot::CellValue;

/// Label substituted for null cells in normalized counts
pub const UNSPECIFIED_LABEL: &str = "Unspecified";

/// Title-case `text`: a letter following a non-letter is upper-cased,
/// every other letter is lower-cased, anything else is kept as-is.
///
/// Applying it twice gives the same result as applying it once.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_was_letter = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_was_letter {
                out.extend(ch.to_lowercase());
            } else {
                // Multi-char upper-case expansions (ß → SS) keep only the
                // leading char upper-cased so the result is stable.
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                for rest in upper {
                    out.extend(rest.to_lowercase());
                }
            }
            previous_was_letter = true;
        } else {
            out.push(ch);
            previous_was_letter = false;
        }
    }

    out
}

/// Canonical category label for one free-text cell
///
/// Null and blank cells become [`UNSPECIFIED_LABEL`]; numbers use their
/// textual form.
pub fn normalize_label(cell: &CellValue) -> String {
    match cell.as_label() {
        Some(label) if !label.trim().is_empty() => title_case(label.trim()),
        _ => UNSPECIFIED_LABEL.to_string(),
    }
}
