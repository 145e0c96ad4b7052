//! Print the contents of a snapshot file.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use ragsim_config::load_state;

use super::common::print_graph;

#[derive(Args)]
pub struct ShowArgs {
    /// Snapshot file (.json)
    file: PathBuf,

    /// Also print node positions
    #[arg(short, long)]
    positions: bool,
}

pub fn run(args: ShowArgs) -> anyhow::Result<()> {
    let (graph, layout) = load_state(&args.file)?;
    let mut out = std::io::stdout().lock();

    print_graph(&mut out, &graph)?;

    if args.positions {
        writeln!(out, "Positions:")?;
        for (name, pos) in layout.iter() {
            writeln!(out, "  {name:12} ({:.1}, {:.1})", pos.x, pos.y)?;
        }
    }
    Ok(())
}
