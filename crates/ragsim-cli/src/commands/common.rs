//! Shared CLI helpers used across multiple commands.

use std::io::Write;
use std::path::Path;

use ragsim_config::{Settings, load_state};
use ragsim_core::{DeadlockAnalysis, History, ResourceGraph, Session, Verdict};

/// Load settings from `--config`, or defaults when none is given.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Ok(Settings::load(path)?),
        None => Ok(Settings::default()),
    }
}

/// Create a session from settings, optionally seeded from a snapshot file.
pub fn new_session(settings: &Settings, load: Option<&Path>) -> anyhow::Result<Session> {
    let mut session = Session::with_settings(settings.canvas(), settings.history_limit);
    if let Some(path) = load {
        let (graph, layout) = load_state(path)?;
        session.load(graph, layout);
    }
    Ok(session)
}

/// Print resources, processes and edges.
pub fn print_graph(out: &mut impl Write, graph: &ResourceGraph) -> std::io::Result<()> {
    if graph.is_empty() {
        return writeln!(out, "(empty graph)");
    }

    writeln!(out, "Resources:")?;
    for r in graph.resources() {
        let total = graph.total(r).unwrap_or(0);
        let available = graph.available(r).unwrap_or(0);
        writeln!(out, "  {r:12} {available}/{total} available")?;
    }

    writeln!(out, "Processes:")?;
    for p in graph.processes() {
        let holds: Vec<String> = graph
            .held_by(p)
            .map(|e| format!("{} x{}", e.source, e.instances))
            .collect();
        let waits: Vec<String> = graph
            .requests_by(p)
            .map(|e| format!("{} x{}", e.target, e.instances))
            .collect();
        write!(out, "  {p:12}")?;
        if !holds.is_empty() {
            write!(out, " holds [{}]", holds.join(", "))?;
        }
        if !waits.is_empty() {
            write!(out, " waits [{}]", waits.join(", "))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Edges ({}):", graph.edge_count())?;
    for e in graph.edges() {
        writeln!(
            out,
            "  {} -> {} {} x{}",
            e.source,
            e.target,
            e.kind.label(),
            e.instances
        )?;
    }
    Ok(())
}

/// Print cycles and the verdict.
pub fn print_analysis(out: &mut impl Write, analysis: &DeadlockAnalysis) -> std::io::Result<()> {
    if analysis.cycles.is_empty() {
        writeln!(out, "Cycles: none")?;
    } else {
        writeln!(out, "Cycles:")?;
        for cycle in &analysis.cycles {
            writeln!(out, "  {} -> {}", cycle.join(" -> "), cycle[0])?;
        }
    }

    match &analysis.verdict {
        Verdict::NoDeadlock(seq) => {
            writeln!(out, "Verdict: no deadlock")?;
            if seq.order.is_empty() {
                writeln!(out, "Safe sequence: (nothing to run)")?;
            } else {
                writeln!(out, "Safe sequence: {}", seq.order.join(" -> "))?;
                for event in &seq.events {
                    writeln!(out, "  {event}")?;
                }
            }
        }
        Verdict::Deadlock(report) => {
            writeln!(out, "Verdict: DEADLOCK")?;
            writeln!(out, "  processes: {}", join(&report.processes))?;
            writeln!(out, "  resources: {}", join(&report.resources))?;
            writeln!(out, "  edges:")?;
            for edge in &report.edges {
                writeln!(
                    out,
                    "    {} -> {} ({})",
                    edge.source,
                    edge.target,
                    edge.kind.label()
                )?;
            }
        }
    }
    Ok(())
}

/// Print the undo list, marking the current entry, then pending redo entries.
pub fn print_history(out: &mut impl Write, history: &History) -> std::io::Result<()> {
    let entries = history.entries();
    for (i, entry) in entries.iter().enumerate() {
        let marker = if i + 1 == entries.len() { '*' } else { ' ' };
        writeln!(out, "{marker} {:3} {}", i, entry.description())?;
    }
    for entry in history.redo_entries().iter().rev() {
        writeln!(out, "  redo {}", entry.description())?;
    }
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
