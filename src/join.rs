//! Left-outer join of demand rows against aggregated consumption norms.

use std::collections::{HashMap, HashSet};

use log::info;

use crate::{aggregate::AggregatedNorm, data::Value, frame::Frame, normalize};

/// Columns appended to the demand table for the norm side of the join.
pub const NORM_HEADERS: [&str; 4] = ["l", "GMT colour", "PROC_GRP", "CONSUMPTION"];

/// Joins every demand row against the norms sharing its (length, colour)
/// pair. A demand row matching norms under several process groups fans out
/// into one output row per norm; a row with no matching norm survives with
/// the appended columns blank. Demand rows are never dropped or reordered.
///
/// The demand frame must already carry trimmed text in `style` and
/// `colour`; a style matches only when its trimmed text equals a norm's
/// extracted length token. Comparison reads absent cells as empty text,
/// and the aggregator never emits a blank colour key, so blank demand
/// keys match nothing.
pub fn left_join_norms(
    demand: &Frame,
    style: usize,
    colour: usize,
    norms: &[AggregatedNorm],
) -> Frame {
    let mut lookup: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (idx, norm) in norms.iter().enumerate() {
        lookup
            .entry((norm.length.clone(), norm.colour.clone()))
            .or_default()
            .push(idx);
    }

    let mut joined = Frame::new(build_output_headers(demand.headers()));
    let mut matched_rows = 0usize;
    for row in demand.rows() {
        let key = (
            normalize::canonical_text(row.get(style).and_then(|cell| cell.as_ref())),
            normalize::canonical_text(row.get(colour).and_then(|cell| cell.as_ref())),
        );
        if let Some(bucket) = lookup.get(&key) {
            matched_rows += 1;
            for idx in bucket {
                let norm = &norms[*idx];
                let mut combined = row.clone();
                combined.push(Some(Value::String(norm.length.clone())));
                combined.push(Some(Value::String(norm.colour.clone())));
                combined.push(Some(Value::String(norm.proc_group.clone())));
                combined.push(norm.consumption.map(Value::Float));
                joined.push_row(combined);
            }
        } else {
            let mut combined = row.clone();
            combined.extend(NORM_HEADERS.iter().map(|_| None));
            joined.push_row(combined);
        }
    }

    info!(
        "Join complete: {} demand row(s) in, {} matched, {} output row(s)",
        demand.row_count(),
        matched_rows,
        joined.row_count()
    );
    joined
}

fn build_output_headers(demand_headers: &[String]) -> Vec<String> {
    let mut headers = demand_headers.to_vec();
    let mut seen: HashSet<String> = headers.iter().cloned().collect();
    for name in NORM_HEADERS {
        let mut candidate = name.to_string();
        if seen.contains(&candidate) {
            let mut counter = 1usize;
            while seen.contains(&candidate) {
                candidate = format!("norm_{name}_{counter}");
                counter += 1;
            }
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}
