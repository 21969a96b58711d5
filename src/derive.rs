//! Derived requirement columns appended after the join.

use log::{debug, warn};

use crate::{data::Value, frame::Frame};

pub const PIECES_HEADER: &str = "No of Pieces";
pub const REQUIREMENT_HEADER: &str = "Requirement";

/// Appends `No of Pieces` (concluded norm / CF) and `Requirement`
/// (pieces x consumption) to the merged frame. Any blank or unreadable
/// operand blanks the result for that row, and a zero CF blanks the
/// division instead of producing an infinity. Existing columns with the
/// same names are overwritten.
pub fn append_derived(frame: &Frame, concluded: usize, cf: usize, consumption: usize) -> Frame {
    let mut pieces = Vec::with_capacity(frame.row_count());
    let mut requirements = Vec::with_capacity(frame.row_count());
    for (position, row) in frame.rows().iter().enumerate() {
        let piece_count = divide(
            numeric_cell(frame, row, concluded, position),
            numeric_cell(frame, row, cf, position),
            position,
        );
        let requirement = match (piece_count, numeric_cell(frame, row, consumption, position)) {
            (Some(count), Some(norm)) => Some(count * norm),
            _ => None,
        };
        pieces.push(piece_count.map(Value::Float));
        requirements.push(requirement.map(Value::Float));
    }
    frame
        .with_column(PIECES_HEADER, pieces)
        .with_column(REQUIREMENT_HEADER, requirements)
}

fn numeric_cell(
    frame: &Frame,
    row: &[Option<Value>],
    column: usize,
    position: usize,
) -> Option<f64> {
    let value = row.get(column).and_then(|cell| cell.as_ref())?;
    let number = value.to_f64();
    if number.is_none() {
        warn!(
            "row {}: {:?} value {:?} is not numeric; derived fields left blank",
            position + 1,
            frame.headers().get(column).map(String::as_str).unwrap_or("?"),
            value.as_display()
        );
    }
    number
}

fn divide(numerator: Option<f64>, denominator: Option<f64>, position: usize) -> Option<f64> {
    match (numerator, denominator) {
        (Some(_), Some(den)) if den == 0.0 => {
            debug!("row {}: CF is zero; piece count left blank", position + 1);
            None
        }
        (Some(num), Some(den)) => Some(num / den),
        _ => None,
    }
}
