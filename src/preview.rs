use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, display, io_utils};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let frame = io_utils::read_table(&args.input, args.delimiter)
        .with_context(|| format!("Loading table {:?}", args.input))?;
    let rows: Vec<Vec<String>> = frame
        .rows()
        .iter()
        .take(args.rows)
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.as_ref()
                        .map(|value| value.as_display())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    display::print_table(frame.headers(), &rows);
    info!("Displayed {} row(s) from {:?}", rows.len(), args.input);
    Ok(())
}
