//! Run a script file against a fresh session.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ragsim_config::{Settings, save_state};

use super::common::new_session;
use crate::interpreter::Interpreter;
use crate::script::parse_script;

#[derive(Args)]
pub struct RunArgs {
    /// Script file (one command per line, '#' comments)
    script: PathBuf,

    /// Snapshot file to start from
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Write the final state to this snapshot file
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Report failing commands and continue instead of stopping
    #[arg(short, long)]
    keep_going: bool,
}

pub fn run(args: RunArgs, settings: &Settings) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script '{}'", args.script.display()))?;
    let statements = parse_script(&text)?;
    tracing::debug!(
        script = %args.script.display(),
        statements = statements.len(),
        "script parsed"
    );

    let session = new_session(settings, args.load.as_deref())?;
    let stdout = std::io::stdout();
    let mut interp = Interpreter::new(session, stdout.lock());

    let mut failures = 0usize;
    for (line, statement) in &statements {
        if let Err(e) = interp.execute(statement) {
            let e = e.context(format!("line {line}"));
            if !args.keep_going {
                return Err(e);
            }
            eprintln!("error: {e:#}");
            failures += 1;
        }
    }

    let (session, mut out) = interp.into_parts();
    tracing::debug!(
        nodes = session.graph().node_count(),
        edges = session.graph().edge_count(),
        failures,
        "script finished"
    );
    if let Some(path) = &args.save {
        save_state(path, session.graph(), session.layout())?;
        writeln!(out, "Saved to {}", path.display())?;
    }

    if failures > 0 {
        anyhow::bail!("{failures} command(s) failed");
    }
    Ok(())
}
