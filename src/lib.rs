pub mod aggregate;
pub mod cli;
pub mod data;
pub mod dates;
pub mod derive;
pub mod display;
pub mod frame;
pub mod io_utils;
pub mod join;
pub mod normalize;
pub mod pipeline;
pub mod preview;
pub mod programs;
pub mod reconcile;
pub mod workbook;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("strategic_stock", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Reconcile(args) => reconcile::execute(&args),
        Commands::Programs(args) => programs::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}
