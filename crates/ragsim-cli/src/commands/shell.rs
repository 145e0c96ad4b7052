//! Interactive shell: the script language, one line at a time from stdin.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::Args;
use ragsim_config::Settings;

use super::common::new_session;
use crate::interpreter::Interpreter;
use crate::script::parse_line;

#[derive(Args)]
pub struct ShellArgs {
    /// Snapshot file to start from
    #[arg(short, long)]
    load: Option<PathBuf>,
}

pub fn run(args: ShellArgs, settings: &Settings) -> anyhow::Result<()> {
    let session = new_session(settings, args.load.as_deref())?;
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut interp = Interpreter::new(session, std::io::stdout());

    if interactive {
        println!("ragsim shell - type 'help' for commands, 'quit' to exit");
    }

    let mut lines = stdin.lock().lines();
    let mut line_no = 0usize;
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        line_no += 1;

        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        // Errors are reported and the session carries on.
        match parse_line(line_no, &line) {
            Ok(Some(statement)) => {
                if let Err(e) = interp.execute(&statement) {
                    eprintln!("error: {e:#}");
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }
    tracing::debug!(
        lines = line_no,
        nodes = interp.session().graph().node_count(),
        "shell closed"
    );
    Ok(())
}
