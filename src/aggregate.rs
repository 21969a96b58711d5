//! Consumption-norm aggregation over the RM macro table.
//!
//! The macro table often carries several norm rows for the same
//! (length, colour, process group) triple; downstream the join needs
//! exactly one norm per triple, so the rows collapse to their mean
//! consumption here.

use std::collections::HashMap;

use itertools::Itertools;
use log::warn;

use crate::frame::Frame;

/// Process groups retained from the macro table. Rows under any other
/// group never reach the join.
pub const PROC_GROUPS: [&str; 2] = ["ELS", "LAC"];

/// One aggregated consumption norm, keyed by the canonical join triple.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedNorm {
    pub length: String,
    pub colour: String,
    pub proc_group: String,
    pub consumption: Option<f64>,
}

#[derive(Default)]
struct MeanState {
    sum: f64,
    count: u64,
}

impl MeanState {
    fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Collapses the macro frame to one norm per (length, colour, proc group)
/// triple, averaging `CONSUMPTION` within each triple.
///
/// The frame must already carry normalized key columns: digit tokens in
/// `length`, trimmed text in `colour`. Only rows whose process group cell
/// reads exactly `ELS` or `LAC` participate, and rows with a blank colour
/// are dropped outright. Consumption cells that do not read as numbers are
/// logged and left out of the mean; a triple with no readable member keeps
/// `consumption: None`. Results are sorted by the triple for deterministic
/// downstream order.
pub fn aggregate_norms(
    norms: &Frame,
    length: usize,
    colour: usize,
    proc_group: usize,
    consumption: usize,
) -> Vec<AggregatedNorm> {
    let mut groups: HashMap<(String, String, String), MeanState> = HashMap::new();
    for (position, row) in norms.rows().iter().enumerate() {
        let group = match row.get(proc_group).and_then(|cell| cell.as_ref()) {
            Some(value) => value.as_display(),
            None => continue,
        };
        if !PROC_GROUPS.contains(&group.as_str()) {
            continue;
        }
        let colour_text =
            crate::normalize::canonical_text(row.get(colour).and_then(|cell| cell.as_ref()));
        // A blank colour is not a key; rows without one never join.
        if colour_text.is_empty() {
            continue;
        }
        let key = (
            crate::normalize::canonical_text(row.get(length).and_then(|cell| cell.as_ref())),
            colour_text,
            group,
        );
        let state = groups.entry(key).or_default();
        match row.get(consumption).and_then(|cell| cell.as_ref()) {
            Some(value) => match value.to_f64() {
                Some(number) => state.observe(number),
                None => warn!(
                    "macro row {}: CONSUMPTION value {:?} is not numeric; leaving it out of the mean",
                    position + 1,
                    value.as_display()
                ),
            },
            None => warn!(
                "macro row {}: CONSUMPTION is blank; leaving it out of the mean",
                position + 1
            ),
        }
    }
    groups
        .into_iter()
        .map(|((length, colour, proc_group), state)| AggregatedNorm {
            consumption: state.mean(),
            length,
            colour,
            proc_group,
        })
        .sorted_by(|a, b| {
            (&a.length, &a.colour, &a.proc_group).cmp(&(&b.length, &b.colour, &b.proc_group))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn macro_frame(rows: Vec<Vec<Option<Value>>>) -> Frame {
        let mut frame = Frame::new(vec![
            "l".into(),
            "GMT colour".into(),
            "PROC_GRP".into(),
            "CONSUMPTION".into(),
        ]);
        for row in rows {
            frame.push_row(row);
        }
        frame
    }

    fn text(value: &str) -> Option<Value> {
        Some(Value::String(value.into()))
    }

    #[test]
    fn averages_duplicate_triples() {
        let frame = macro_frame(vec![
            vec![text("32"), text("Red"), text("ELS"), Some(Value::Float(2.5))],
            vec![text("32"), text("Red"), text("ELS"), Some(Value::Float(3.5))],
        ]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        assert_eq!(norms.len(), 1);
        assert_eq!(norms[0].consumption, Some(3.0));
    }

    #[test]
    fn keeps_els_and_lac_as_separate_groups() {
        let frame = macro_frame(vec![
            vec![text("32"), text("Red"), text("ELS"), Some(Value::Float(2.0))],
            vec![text("32"), text("Red"), text("LAC"), Some(Value::Float(4.0))],
            vec![text("32"), text("Red"), text("KNT"), Some(Value::Float(9.0))],
        ]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        assert_eq!(norms.len(), 2);
        assert_eq!(norms[0].proc_group, "ELS");
        assert_eq!(norms[0].consumption, Some(2.0));
        assert_eq!(norms[1].proc_group, "LAC");
        assert_eq!(norms[1].consumption, Some(4.0));
    }

    #[test]
    fn skips_unreadable_consumption_values() {
        let frame = macro_frame(vec![
            vec![text("32"), text("Red"), text("ELS"), Some(Value::Float(2.0))],
            vec![text("32"), text("Red"), text("ELS"), text("n/a")],
        ]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        assert_eq!(norms[0].consumption, Some(2.0));
    }

    #[test]
    fn group_with_no_readable_member_keeps_none() {
        let frame = macro_frame(vec![
            vec![text("32"), text("Red"), text("ELS"), text("n/a")],
            vec![text("32"), text("Red"), text("ELS"), None],
        ]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        assert_eq!(norms.len(), 1);
        assert_eq!(norms[0].consumption, None);
    }

    #[test]
    fn blank_colour_rows_are_dropped() {
        let frame = macro_frame(vec![
            vec![text("32"), None, text("ELS"), Some(Value::Float(2.0))],
            vec![text("32"), text("  "), text("ELS"), Some(Value::Float(3.0))],
            vec![text("32"), text("Red"), text("ELS"), Some(Value::Float(4.0))],
        ]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        assert_eq!(norms.len(), 1);
        assert_eq!(norms[0].colour, "Red");
        assert_eq!(norms[0].consumption, Some(4.0));
    }

    #[test]
    fn reads_numeric_text_consumption() {
        let frame = macro_frame(vec![vec![
            text("32"),
            text("Red"),
            text("ELS"),
            text(" 1.25 "),
        ]]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        assert_eq!(norms[0].consumption, Some(1.25));
    }

    #[test]
    fn output_is_sorted_by_triple() {
        let frame = macro_frame(vec![
            vec![text("34"), text("Red"), text("ELS"), Some(Value::Float(1.0))],
            vec![text("32"), text("Blue"), text("LAC"), Some(Value::Float(1.0))],
            vec![text("32"), text("Blue"), text("ELS"), Some(Value::Float(1.0))],
        ]);
        let norms = aggregate_norms(&frame, 0, 1, 2, 3);
        let keys: Vec<(&str, &str, &str)> = norms
            .iter()
            .map(|n| (n.length.as_str(), n.colour.as_str(), n.proc_group.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("32", "Blue", "ELS"),
                ("32", "Blue", "LAC"),
                ("34", "Red", "ELS"),
            ]
        );
    }
}
