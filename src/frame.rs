//! In-memory tabular snapshot passed between pipeline stages.
//!
//! A [`Frame`] owns an ordered header row and data rows of optional cells
//! (`None` is the uniform representation of a blank/absent value). Stages
//! never mutate a caller's frame; transformations return a new snapshot so a
//! retained reference to an earlier stage stays consistent.

use crate::data::Value;

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Frame {
    pub fn new(headers: Vec<String>) -> Self {
        Frame {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(|c| c.as_ref())
    }

    /// New frame containing only the rows the predicate keeps.
    pub fn filtered<F>(&self, mut keep: F) -> Frame
    where
        F: FnMut(&Row) -> bool,
    {
        Frame {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// New frame with one column rewritten cell by cell.
    pub fn map_column<F>(&self, column: usize, f: F) -> Frame
    where
        F: Fn(Option<&Value>) -> Option<Value>,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut next = row.clone();
                if let Some(cell) = next.get_mut(column) {
                    *cell = f(cell.as_ref());
                }
                next
            })
            .collect();
        Frame {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// New frame with `name` assigned column-wise: an existing column of that
    /// name is replaced, otherwise the column is appended. `values` must hold
    /// one cell per row.
    pub fn with_column(&self, name: &str, values: Vec<Option<Value>>) -> Frame {
        debug_assert_eq!(values.len(), self.rows.len());
        let mut next = self.clone();
        match next.column_index(name) {
            Some(idx) => {
                for (row, value) in next.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                next.headers.push(name.to_string());
                for (row, value) in next.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        let mut frame = Frame::new(vec!["a".into(), "b".into()]);
        frame.push_row(vec![Some(Value::Integer(1)), Some(Value::String("x".into()))]);
        frame.push_row(vec![Some(Value::Integer(2)), None]);
        frame
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut frame = Frame::new(vec!["a".into(), "b".into(), "c".into()]);
        frame.push_row(vec![Some(Value::Integer(1))]);
        assert_eq!(frame.rows()[0].len(), 3);
        assert_eq!(frame.cell(0, 2), None);
    }

    #[test]
    fn filtered_leaves_source_untouched() {
        let frame = sample();
        let kept = frame.filtered(|row| matches!(row[0], Some(Value::Integer(2))));
        assert_eq!(kept.row_count(), 1);
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn map_column_rewrites_single_column() {
        let frame = sample();
        let upper = frame.map_column(1, |cell| {
            cell.map(|v| Value::String(v.as_display().to_uppercase()))
        });
        assert_eq!(upper.cell(0, 1), Some(&Value::String("X".into())));
        assert_eq!(upper.cell(1, 1), None);
        assert_eq!(frame.cell(0, 1), Some(&Value::String("x".into())));
    }

    #[test]
    fn with_column_replaces_or_appends() {
        let frame = sample();
        let replaced = frame.with_column("b", vec![None, Some(Value::Boolean(true))]);
        assert_eq!(replaced.headers(), frame.headers());
        assert_eq!(replaced.cell(1, 1), Some(&Value::Boolean(true)));

        let appended = frame.with_column("c", vec![Some(Value::Float(1.5)), None]);
        assert_eq!(appended.headers().len(), 3);
        assert_eq!(appended.cell(0, 2), Some(&Value::Float(1.5)));
    }
}
