use anyhow::{Context, Result};
use log::info;

use crate::{cli::ReconcileArgs, io_utils, pipeline};

pub fn execute(args: &ReconcileArgs) -> Result<()> {
    let demand = io_utils::read_table(&args.demand, args.delimiter)
        .with_context(|| format!("Loading demand table {:?}", args.demand))?;
    let norms = io_utils::read_table(&args.norms, args.delimiter)
        .with_context(|| format!("Loading macro table {:?}", args.norms))?;

    let merged = pipeline::reconcile(&demand, &norms, &args.programs)?;

    let fallback = io_utils::resolve_input_delimiter(&args.demand, args.delimiter);
    io_utils::write_table(
        &merged,
        args.output.as_deref(),
        args.output_delimiter,
        fallback,
    )?;
    info!(
        "Reconciliation complete: {} row(s) written",
        merged.row_count()
    );
    Ok(())
}
