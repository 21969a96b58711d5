use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile demand schedules against RM consumption norms",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join a demand table against aggregated consumption norms and compute requirements
    Reconcile(ReconcileArgs),
    /// List the programs present in a demand table with row counts
    Programs(ProgramsArgs),
    /// Preview the first few rows of a table in a formatted view
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Demand table (norm sensing); xlsx, csv, tsv, or - for stdin
    #[arg(short = 'd', long = "demand")]
    pub demand: PathBuf,
    /// Consumption norms table (RM macro); xlsx, csv, or tsv
    #[arg(short = 'm', long = "macro")]
    pub norms: PathBuf,
    /// Output file (stdout if omitted); the extension picks the format
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Restrict the run to this program (repeatable; all programs if omitted)
    #[arg(short = 'p', long = "program", action = clap::ArgAction::Append)]
    pub programs: Vec<String>,
    /// Delimiter for delimited-text inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter for delimited-text output (defaults to the demand delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct ProgramsArgs {
    /// Demand table to scan; xlsx, csv, tsv, or - for stdin
    #[arg(short = 'd', long = "demand")]
    pub demand: PathBuf,
    /// Emit machine-readable JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Delimiter for delimited-text input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input table to preview; xlsx, csv, tsv, or - for stdin
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Delimiter for delimited-text input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
