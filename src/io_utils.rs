//! File I/O for the tabular inputs and outputs.
//!
//! All file access flows through this module. It provides:
//!
//! - **Format dispatch**: `.xlsx`/`.xlsm` paths route through the workbook
//!   adapters, everything else is read and written as delimited text.
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` →
//!   comma, `.tsv` → tab) with manual override support.
//! - **stdin/stdout**: the `-` path convention routes delimited text
//!   through standard streams.
//! - **Quoting**: CSV output uses `QuoteStyle::Always` for round-trip
//!   safety.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;

use crate::{data::Value, frame::Frame, workbook};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn is_workbook(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm")
    )
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    if let Some(path) = path {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => return DEFAULT_TSV_DELIMITER,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => return DEFAULT_CSV_DELIMITER,
            _ => {}
        }
    }
    fallback
}

/// Reads a table from a workbook, a delimited file, or stdin (`-`).
/// Delimiter overrides only apply to delimited text.
pub fn read_table(path: &Path, delimiter: Option<u8>) -> Result<Frame> {
    if !is_dash(path) && is_workbook(path) {
        return workbook::read_workbook(path);
    }
    let resolved = resolve_input_delimiter(path, delimiter);
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    read_csv(reader, resolved).with_context(|| format!("Reading table from {path:?}"))
}

/// Writes a table to a workbook, a delimited file, or stdout when `path`
/// is absent or `-`. `fallback` supplies the delimiter when neither the
/// override nor the output extension decides it.
pub fn write_table(
    frame: &Frame,
    path: Option<&Path>,
    delimiter: Option<u8>,
    fallback: u8,
) -> Result<()> {
    if let Some(target) = path {
        if !is_dash(target) && is_workbook(target) {
            return workbook::write_workbook(frame, target);
        }
    }
    let resolved = resolve_output_delimiter(path, delimiter, fallback);
    let writer: Box<dyn Write> = match path {
        Some(target) if !is_dash(target) => Box::new(BufWriter::new(
            File::create(target).with_context(|| format!("Creating output file {target:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    write_csv(frame, writer, resolved)
}

fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<Frame> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .context("Reading header row")?
        .iter()
        .map(|field| field.to_string())
        .collect();
    let mut frame = Frame::new(headers);
    for (row_idx, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        frame.push_row(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(Value::String(field.to_string()))
                    }
                })
                .collect(),
        );
    }
    Ok(frame)
}

fn write_csv<W: Write>(frame: &Frame, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .from_writer(writer);
    csv_writer
        .write_record(frame.headers())
        .context("Writing header row")?;
    for row in frame.rows() {
        let record: Vec<String> = row
            .iter()
            .map(|cell| {
                cell.as_ref()
                    .map(|value| value.as_display())
                    .unwrap_or_default()
            })
            .collect();
        csv_writer.write_record(&record).context("Writing row")?;
    }
    csv_writer.flush().context("Flushing output")?;
    Ok(())
}
