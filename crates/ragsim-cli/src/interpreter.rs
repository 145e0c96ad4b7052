//! Executes parsed statements against a [`Session`].

use std::io::Write;

use anyhow::Context;
use ragsim_config::{load_state, save_state};
use ragsim_core::{Position, RequestOutcome, Session};

use crate::commands::common::{print_analysis, print_graph, print_history};
use crate::script::{Statement, USAGE};

/// Runs statements and writes their results to `out`.
pub struct Interpreter<W: Write> {
    session: Session,
    out: W,
}

impl<W: Write> Interpreter<W> {
    /// Wraps a session.
    pub fn new(session: Session, out: W) -> Self {
        Self { session, out }
    }

    /// The session being driven.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Gives back the session and the output sink.
    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.out)
    }

    /// Executes one statement. On error the session is unchanged.
    pub fn execute(&mut self, statement: &Statement) -> anyhow::Result<()> {
        let out = &mut self.out;
        let session = &mut self.session;

        match statement {
            Statement::Process(name) => {
                session.add_process(name)?;
                writeln!(out, "Added process {name}")?;
            }
            Statement::Resource(name, total) => {
                session.add_resource(name, *total)?;
                writeln!(out, "Added resource {name} with {total} instances")?;
            }
            Statement::Request(process, resource, amount) => {
                match session.request(process, resource, *amount)? {
                    RequestOutcome::Allocated => writeln!(
                        out,
                        "{process} allocated {amount} x {resource} (available: {})",
                        session.graph().available(resource).unwrap_or(0)
                    )?,
                    RequestOutcome::Queued => {
                        writeln!(out, "{process} waits for {amount} x {resource}")?;
                    }
                }
            }
            Statement::Release(process, resource, amount) => {
                let outcome = session.release(process, resource, *amount)?;
                writeln!(
                    out,
                    "{process} released {} x {resource} (available: {})",
                    outcome.released, outcome.available
                )?;
                if let Some(promoted) = outcome.promoted {
                    writeln!(
                        out,
                        "  promoted: {} gets {} x {}",
                        promoted.process, promoted.instances, promoted.resource
                    )?;
                }
            }
            Statement::Cancel(process, resource) => {
                let amount = session.cancel_request(process, resource)?;
                writeln!(
                    out,
                    "Cancelled request of {process} for {amount} x {resource}"
                )?;
            }
            Statement::Capacity(resource, total) => {
                session.set_resource_capacity(resource, *total)?;
                writeln!(
                    out,
                    "{resource} now has {total} instances (available: {})",
                    session.graph().available(resource).unwrap_or(0)
                )?;
            }
            Statement::Rename(old, new) => {
                session.rename_node(old, new)?;
                writeln!(out, "Renamed {old} to {new}")?;
            }
            Statement::Remove(name) => {
                let kind = session.remove_node(name)?;
                writeln!(out, "Removed {} {name}", kind.label())?;
            }
            Statement::Move(name, x, y) => {
                session.move_node(name, Position::new(*x, *y))?;
                writeln!(out, "Moved {name} to ({x}, {y})")?;
            }
            Statement::Layout => {
                session.auto_layout();
                writeln!(out, "Placed {} nodes", session.layout().len())?;
            }
            Statement::Clear => {
                session.clear();
                writeln!(out, "Cleared graph")?;
            }
            Statement::Undo => {
                let undone = session.undo()?;
                writeln!(out, "Undid: {undone}")?;
            }
            Statement::Redo => {
                let redone = session.redo()?;
                writeln!(out, "Redid: {redone}")?;
            }
            Statement::Detect => {
                let analysis = session.detect_deadlock();
                tracing::debug!(deadlocked = analysis.is_deadlocked(), "detect");
                print_analysis(out, &analysis)?;
            }
            Statement::Show => print_graph(out, session.graph())?,
            Statement::History => print_history(out, session.history())?,
            Statement::Save(path) => {
                save_state(path, session.graph(), session.layout())
                    .with_context(|| format!("saving {}", path.display()))?;
                writeln!(out, "Saved to {}", path.display())?;
            }
            Statement::Load(path) => {
                let (graph, layout) =
                    load_state(path).with_context(|| format!("loading {}", path.display()))?;
                session.load(graph, layout);
                writeln!(
                    out,
                    "Loaded {} ({} nodes, {} edges)",
                    path.display(),
                    session.graph().node_count(),
                    session.graph().edge_count()
                )?;
            }
            Statement::Help => {
                writeln!(out, "Commands:")?;
                for usage in USAGE {
                    writeln!(out, "  {usage}")?;
                }
            }
        }
        Ok(())
    }
}
