//! Projection of schedule columns to plain ISO dates.

use log::warn;

use crate::{
    data::{self, Value},
    frame::Frame,
};

/// Schedule columns rewritten to `YYYY-MM-DD` text when present in the
/// merged table. A missing column is skipped, never created.
pub const DATE_COLUMNS: [&str; 4] = ["Start Date", "End Date", "Ramp up date", "Ramp down date"];

const ISO_DATE: &str = "%Y-%m-%d";

/// Rewrites every recognized schedule column to ISO date text. Cells that
/// cannot be read as a date or datetime come out blank; running the
/// projection twice is a no-op.
pub fn project_dates(frame: &Frame) -> Frame {
    let mut projected = frame.clone();
    for name in DATE_COLUMNS {
        let Some(column) = projected.column_index(name) else {
            continue;
        };
        projected = projected.map_column(column, |cell| project_cell(name, cell));
    }
    projected
}

fn project_cell(column: &str, cell: Option<&Value>) -> Option<Value> {
    let value = cell?;
    let date = match value {
        Value::Date(date) => Some(*date),
        Value::DateTime(stamp) => Some(stamp.date()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            data::parse_naive_date(trimmed).ok().or_else(|| {
                data::parse_naive_datetime(trimmed)
                    .ok()
                    .map(|stamp| stamp.date())
            })
        }
        _ => None,
    };
    match date {
        Some(date) => Some(Value::String(date.format(ISO_DATE).to_string())),
        None => {
            warn!(
                "column {:?}: value {:?} does not read as a date; leaving it blank",
                column,
                value.as_display()
            );
            None
        }
    }
}
