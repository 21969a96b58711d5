use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{cli::ProgramsArgs, display, io_utils, pipeline};

#[derive(Debug, Serialize)]
struct ProgramCount {
    program: String,
    rows: usize,
    percent: f64,
}

pub fn execute(args: &ProgramsArgs) -> Result<()> {
    let demand = io_utils::read_table(&args.demand, args.delimiter)
        .with_context(|| format!("Loading demand table {:?}", args.demand))?;
    let mut counts = pipeline::program_counts(&demand)?;
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    if args.json {
        let entries: Vec<ProgramCount> = counts
            .into_iter()
            .map(|(program, rows)| ProgramCount {
                percent: percent(rows, total),
                program,
                rows,
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("Serializing program counts")?
        );
        return Ok(());
    }

    let headers = vec![
        "Program".to_string(),
        "Rows".to_string(),
        "Percent".to_string(),
    ];
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|(program, count)| {
            let name = if program.is_empty() {
                String::from("<empty>")
            } else {
                program.clone()
            };
            vec![
                name,
                count.to_string(),
                format!("{:.2}%", percent(*count, total)),
            ]
        })
        .collect();
    display::print_table(&headers, &rows);
    info!(
        "Listed {} program(s) across {} demand row(s)",
        rows.len(),
        total
    );
    Ok(())
}

fn percent(rows: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (rows as f64 / total as f64) * 100.0
    }
}
