//! Built-in scenario commands.
//!
//! Lists the bundled scenarios, prints one, or exports one as a snapshot file
//! to use with `run --load` or `shell --load`.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use ragsim_config::{SCENARIO_NAMES, Settings, get_scenario, save_state, scenario_summary};
use ragsim_core::detect_deadlock;

use super::common::{print_analysis, print_graph};

#[derive(Args)]
pub struct ScenariosArgs {
    #[command(subcommand)]
    command: ScenariosCommand,
}

#[derive(Subcommand)]
enum ScenariosCommand {
    /// List built-in scenarios
    List,

    /// Show a scenario's graph and analysis
    Show {
        /// Scenario name
        name: String,
    },

    /// Write a scenario to a snapshot file
    Export {
        /// Scenario name
        name: String,

        /// Output path (.json)
        path: PathBuf,
    },
}

pub fn run(args: ScenariosArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.command {
        ScenariosCommand::List => list_scenarios(),
        ScenariosCommand::Show { name } => show_scenario(&name),
        ScenariosCommand::Export { name, path } => export_scenario(&name, &path, settings),
    }
}

fn list_scenarios() -> anyhow::Result<()> {
    println!("Built-in Scenarios:");
    println!("===================");
    for name in SCENARIO_NAMES {
        println!("  {:20} - {}", name, scenario_summary(name).unwrap_or(""));
    }
    Ok(())
}

fn show_scenario(name: &str) -> anyhow::Result<()> {
    let (graph, _) = get_scenario(name)?.to_state()?;
    let mut out = std::io::stdout().lock();
    print_graph(&mut out, &graph)?;
    print_analysis(&mut out, &detect_deadlock(&graph))?;
    Ok(())
}

fn export_scenario(name: &str, path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let (graph, mut layout) = get_scenario(name)?.to_state()?;
    layout.fill_missing(&graph, settings.canvas());
    save_state(path, &graph, &layout)?;
    println!("Exported '{}' to {}", name, path.display());
    Ok(())
}
