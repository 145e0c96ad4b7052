//! Run deadlock analysis on a snapshot file.

use std::path::PathBuf;

use clap::Args;
use ragsim_config::load_state;
use ragsim_core::detect_deadlock;

use super::common::print_analysis;

#[derive(Args)]
pub struct DetectArgs {
    /// Snapshot file (.json)
    file: PathBuf,
}

/// Prints cycles and verdict. A deadlock is a result, not an error, so the
/// exit status is 0 either way.
pub fn run(args: DetectArgs) -> anyhow::Result<()> {
    let (graph, _) = load_state(&args.file)?;
    let analysis = detect_deadlock(&graph);
    print_analysis(&mut std::io::stdout().lock(), &analysis)?;
    Ok(())
}
