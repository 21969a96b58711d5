//! Excel workbook adapters for the frame model.
//!
//! Reading takes the first worksheet only, mirroring how the planning
//! workbooks are laid out; writing produces a single sheet with a bold
//! header row.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};
use log::warn;
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    data::{self, Value},
    frame::Frame,
};

/// Reads the first worksheet into a frame. The first row supplies the
/// headers; blank cells become absent values.
pub fn read_workbook(path: &Path) -> Result<Frame> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Workbook {path:?} contains no worksheets"))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Reading worksheet {sheet_name:?} from {path:?}"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first) => first.iter().map(header_text).collect(),
        None => Vec::new(),
    };
    let mut frame = Frame::new(headers);
    for row in rows {
        let cells: Vec<Option<Value>> = row.iter().map(cell_value).collect();
        // Formatted-but-blank trailing rows show up in the range as all-empty.
        if cells.iter().all(Option::is_none) {
            continue;
        }
        frame.push_row(cells);
    }
    Ok(frame)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(text) => text.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(text) if text.is_empty() => None,
        Data::String(text) => Some(Value::String(text.clone())),
        Data::Int(number) => Some(Value::Integer(*number)),
        Data::Float(number) => Some(Value::Float(*number)),
        Data::Bool(flag) => Some(Value::Boolean(*flag)),
        Data::DateTime(stamp) => stamp.as_datetime().map(Value::DateTime),
        Data::DateTimeIso(text) => data::parse_naive_datetime(text)
            .ok()
            .map(Value::DateTime)
            .or_else(|| data::parse_naive_date(text).ok().map(Value::Date))
            .or_else(|| Some(Value::String(text.clone()))),
        Data::DurationIso(text) => Some(Value::String(text.clone())),
        Data::Error(error) => {
            warn!("workbook cell error {error:?} read as blank");
            None
        }
    }
}

/// Writes the frame to a single-sheet workbook with a bold header row.
pub fn write_workbook(frame: &Frame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();
    for (col, header) in frame.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }
    for (idx, row) in frame.rows().iter().enumerate() {
        let row_number = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let Some(value) = cell else {
                continue;
            };
            let column = col as u16;
            match value {
                Value::Integer(number) => {
                    sheet.write_number(row_number, column, *number as f64)?
                }
                Value::Float(number) => sheet.write_number(row_number, column, *number)?,
                Value::Boolean(flag) => sheet.write_boolean(row_number, column, *flag)?,
                other => sheet.write_string(row_number, column, &other.as_display())?,
            };
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("Saving workbook {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_a_frame_through_a_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("norms.xlsx");

        let mut frame = Frame::new(vec!["Style".into(), "CF".into(), "Active".into()]);
        frame.push_row(vec![
            Some(Value::String("32L".into())),
            Some(Value::Float(3.0)),
            Some(Value::Boolean(true)),
        ]);
        frame.push_row(vec![Some(Value::String("34".into())), None, None]);

        write_workbook(&frame, &path).unwrap();
        let read = read_workbook(&path).unwrap();

        assert_eq!(read.headers(), frame.headers());
        assert_eq!(read.row_count(), 2);
        assert_eq!(read.cell(0, 0), Some(&Value::String("32L".into())));
        assert_eq!(read.cell(0, 1), Some(&Value::Float(3.0)));
        assert_eq!(read.cell(0, 2), Some(&Value::Boolean(true)));
        assert_eq!(read.cell(1, 1), None);
    }

    #[test]
    fn integers_come_back_as_floats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counts.xlsx");

        let mut frame = Frame::new(vec!["CF".into()]);
        frame.push_row(vec![Some(Value::Integer(3))]);

        write_workbook(&frame, &path).unwrap();
        let read = read_workbook(&path).unwrap();
        assert_eq!(read.cell(0, 0), Some(&Value::Float(3.0)));
    }

    #[test]
    fn all_blank_rows_are_dropped_on_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sparse.xlsx");

        let mut frame = Frame::new(vec!["Style".into()]);
        frame.push_row(vec![Some(Value::String("32".into()))]);
        frame.push_row(vec![None]);
        frame.push_row(vec![Some(Value::String("34".into()))]);

        write_workbook(&frame, &path).unwrap();
        let read = read_workbook(&path).unwrap();
        assert_eq!(read.row_count(), 2);
        assert_eq!(read.cell(1, 0), Some(&Value::String("34".into())));
    }

    #[test]
    fn header_only_frame_round_trips_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.xlsx");

        let frame = Frame::new(vec!["Program".into(), "Style".into()]);
        write_workbook(&frame, &path).unwrap();
        let read = read_workbook(&path).unwrap();
        assert_eq!(read.headers(), frame.headers());
        assert!(read.is_empty());
    }
}
