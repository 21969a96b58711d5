//! Join-key normalization for the demand and macro tables.
//!
//! Macro length cells arrive as free text (`"32L"`, `"  45"`, blank) or as
//! numbers; [`length_token`] reduces any of them to a bare digit string.
//! [`canonical_text`] trims the textual form of a key cell. Demand keys are
//! trimmed but never extracted, so a style matches a norm only when its
//! trimmed text equals the extracted length token exactly.

use std::sync::OnceLock;

use regex::Regex;

use crate::{data::Value, frame::Frame};

fn digit_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[0-9]+").expect("digit-run pattern"))
}

/// Extracts the first maximal run of decimal digits from the cell's textual
/// form. Absent cells and digit-free text both yield `"0"`. Context around
/// the run is discarded: `"32L"` and `"L32"` both produce `"32"`.
pub fn length_token(cell: Option<&Value>) -> String {
    let text = match cell {
        Some(value) => value.as_display(),
        None => return "0".to_string(),
    };
    match digit_run().find(&text) {
        Some(hit) => hit.as_str().to_string(),
        None => "0".to_string(),
    }
}

/// Trimmed textual form of a key cell; absent cells read as the empty
/// string. No casing normalization is applied: a case mismatch is a
/// non-match.
pub fn canonical_text(cell: Option<&Value>) -> String {
    cell.map(|value| value.as_display().trim().to_string())
        .unwrap_or_default()
}

/// New frame with the named length column rewritten to its digit token.
/// Every cell in the column comes out populated ("0" stands in for blanks).
pub fn normalize_length_column(frame: &Frame, column: usize) -> Frame {
    frame.map_column(column, |cell| Some(Value::String(length_token(cell))))
}

/// New frame with a join-key column rewritten to trimmed text. Absent cells
/// stay absent so the output never fabricates key values.
pub fn canonicalize_column(frame: &Frame, column: usize) -> Frame {
    frame.map_column(column, |cell| {
        cell.map(|value| Value::String(value.as_display().trim().to_string()))
    })
}
