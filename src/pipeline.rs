//! End-to-end reconciliation of a demand table against consumption norms.
//!
//! Everything here operates on in-memory frames; file formats, delimiters,
//! and the CLI live elsewhere. [`reconcile`] takes its inputs and the
//! program selection as plain arguments and returns a new frame, so the
//! same run over the same tables always produces the same output.

use std::collections::HashSet;

use log::{info, warn};
use thiserror::Error;

use crate::{aggregate, dates, derive, frame::Frame, join, normalize};

pub const DEMAND_TABLE: &str = "demand";
pub const MACRO_TABLE: &str = "macro";

pub const DEMAND_PROGRAM: &str = "Program";
pub const DEMAND_STYLE: &str = "Style";
pub const DEMAND_COLOR: &str = "GMT Color";
pub const DEMAND_CONCLUDED: &str = "Concluded Norms - Post discussion";
pub const DEMAND_CF: &str = "CF";

pub const MACRO_PROC_GRP: &str = "PROC_GRP";
pub const MACRO_LENGTH: &str = "l";
pub const MACRO_COLOUR: &str = "GMT colour";
pub const MACRO_CONSUMPTION: &str = "CONSUMPTION";

pub const DEMAND_REQUIRED: [&str; 5] = [
    DEMAND_PROGRAM,
    DEMAND_STYLE,
    DEMAND_COLOR,
    DEMAND_CONCLUDED,
    DEMAND_CF,
];

pub const MACRO_REQUIRED: [&str; 4] = [
    MACRO_PROC_GRP,
    MACRO_LENGTH,
    MACRO_COLOUR,
    MACRO_CONSUMPTION,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("required column {column:?} is missing from the {table} table")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Reconciles the demand table against the macro consumption norms and
/// returns the merged table with schedule dates projected and requirement
/// columns appended.
///
/// An empty `programs` selection keeps every demand row; otherwise only
/// rows whose `Program` cell matches one of the selected names survive.
/// A missing required column in either table fails the whole run before
/// any row is touched; value-level problems only blank the affected cells.
pub fn reconcile(
    demand: &Frame,
    norms: &Frame,
    programs: &[String],
) -> Result<Frame, ReconcileError> {
    let program = require_column(demand, DEMAND_TABLE, DEMAND_PROGRAM)?;
    let style = require_column(demand, DEMAND_TABLE, DEMAND_STYLE)?;
    let colour = require_column(demand, DEMAND_TABLE, DEMAND_COLOR)?;
    let concluded = require_column(demand, DEMAND_TABLE, DEMAND_CONCLUDED)?;
    let cf = require_column(demand, DEMAND_TABLE, DEMAND_CF)?;

    let proc_group = require_column(norms, MACRO_TABLE, MACRO_PROC_GRP)?;
    let length = require_column(norms, MACRO_TABLE, MACRO_LENGTH)?;
    let norm_colour = require_column(norms, MACRO_TABLE, MACRO_COLOUR)?;
    let consumption = require_column(norms, MACRO_TABLE, MACRO_CONSUMPTION)?;

    let selected = filter_programs(demand, program, programs);
    info!(
        "Selected {} of {} demand row(s)",
        selected.row_count(),
        demand.row_count()
    );

    // Only the macro length is digit-extracted; demand keys are trimmed as-is.
    let trimmed = normalize::canonicalize_column(&selected, style);
    let demand_ready = normalize::canonicalize_column(&trimmed, colour);
    let macro_ready = normalize::canonicalize_column(
        &normalize::normalize_length_column(norms, length),
        norm_colour,
    );

    let aggregated = aggregate::aggregate_norms(&macro_ready, length, norm_colour, proc_group, consumption);
    info!(
        "Aggregated {} consumption norm(s) from {} macro row(s)",
        aggregated.len(),
        norms.row_count()
    );

    let merged = join::left_join_norms(&demand_ready, style, colour, &aggregated);
    let dated = dates::project_dates(&merged);

    // Appended norm columns sit after the demand block; CONSUMPTION is last.
    let merged_consumption = demand.headers().len() + join::NORM_HEADERS.len() - 1;
    Ok(derive::append_derived(&dated, concluded, cf, merged_consumption))
}

fn require_column(
    frame: &Frame,
    table: &'static str,
    column: &'static str,
) -> Result<usize, ReconcileError> {
    frame
        .column_index(column)
        .ok_or(ReconcileError::MissingColumn { table, column })
}

/// Distinct `Program` values in demand-table order, with occurrence counts.
pub fn program_counts(demand: &Frame) -> Result<Vec<(String, usize)>, ReconcileError> {
    let program = require_column(demand, DEMAND_TABLE, DEMAND_PROGRAM)?;
    let mut counts: Vec<(String, usize)> = Vec::new();
    for row in demand.rows() {
        let name = normalize::canonical_text(row.get(program).and_then(|cell| cell.as_ref()));
        match counts.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }
    Ok(counts)
}

fn filter_programs(demand: &Frame, program: usize, programs: &[String]) -> Frame {
    if programs.is_empty() {
        return demand.clone();
    }
    let present: HashSet<String> = demand
        .rows()
        .iter()
        .map(|row| normalize::canonical_text(row.get(program).and_then(|cell| cell.as_ref())))
        .collect();
    for wanted in programs {
        if !present.contains(wanted) {
            warn!("program {wanted:?} does not appear in the demand table");
        }
    }
    let wanted: HashSet<&str> = programs.iter().map(String::as_str).collect();
    demand.filtered(|row| {
        let name = normalize::canonical_text(row.get(program).and_then(|cell| cell.as_ref()));
        wanted.contains(name.as_str())
    })
}
