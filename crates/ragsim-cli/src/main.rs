//! ragsim CLI - Command-line front-end for the ragsim deadlock simulator.

mod commands;
mod interpreter;
mod script;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ragsim")]
#[command(author, version, about = "Resource-allocation graph deadlock simulator", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script of commands
    Run(commands::run::RunArgs),

    /// Read commands interactively from stdin
    Shell(commands::shell::ShellArgs),

    /// Print the graph stored in a snapshot file
    Show(commands::show::ShowArgs),

    /// Analyze a snapshot file for deadlock
    Detect(commands::detect::DetectArgs),

    /// List, show, and export built-in scenarios
    Scenarios(commands::scenarios::ScenariosArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = commands::common::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => commands::run::run(args, &settings),
        Commands::Shell(args) => commands::shell::run(args, &settings),
        Commands::Show(args) => commands::show::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Scenarios(args) => commands::scenarios::run(args, &settings),
    }
}
