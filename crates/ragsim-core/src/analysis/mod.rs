//! Deadlock analysis: wait-for cycles, safety check, verdict.
//!
//! Analysis is a pure function of the graph. A cycle in the wait-for graph
//! is necessary but not sufficient for deadlock when resources have several
//! instances, so the verdict comes from the safety check alone. Cycles are
//! still reported for display and are used to pick which allocation edges to
//! highlight.
//!
//! ```rust
//! use ragsim_core::{ResourceGraph, detect_deadlock};
//!
//! let mut graph = ResourceGraph::new();
//! for p in ["P1", "P2"] {
//!     graph.add_process(p)?;
//! }
//! graph.add_resource("R1", 1)?;
//! graph.add_resource("R2", 1)?;
//! graph.request("P1", "R1", 1)?;
//! graph.request("P2", "R2", 1)?;
//! graph.request("P1", "R2", 1)?;
//! graph.request("P2", "R1", 1)?;
//!
//! let analysis = detect_deadlock(&graph);
//! assert!(analysis.is_deadlocked());
//! assert_eq!(analysis.cycles, vec![vec!["P1".to_string(), "P2".to_string()]]);
//! # Ok::<(), ragsim_core::RagError>(())
//! ```

mod safety;
pub mod wait_for;

use std::collections::{BTreeSet, HashSet};

use crate::graph::{EdgeKind, ResourceGraph};

pub use safety::{ExecutionEvent, SafeSequence};
pub use wait_for::WaitForGraph;

/// An edge to draw as part of a deadlock.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightedEdge {
    /// Source node name.
    pub source: String,
    /// Target node name.
    pub target: String,
    /// Request or allocation.
    pub kind: EdgeKind,
}

/// The part of the graph that can never make progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeadlockReport {
    /// Processes the safety check could not finish.
    pub processes: BTreeSet<String>,
    /// Resources touched by a highlighted edge.
    pub resources: BTreeSet<String>,
    /// Request and allocation edges involved in the deadlock.
    pub edges: BTreeSet<HighlightedEdge>,
}

/// Outcome of the safety check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every tracked process can finish in the given order.
    NoDeadlock(SafeSequence),
    /// Some processes can never finish.
    Deadlock(DeadlockReport),
}

/// Full result of [`detect_deadlock`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeadlockAnalysis {
    /// Simple cycles of the wait-for graph, each starting at its smallest
    /// member, sorted.
    pub cycles: Vec<Vec<String>>,
    /// Deadlock or safe sequence.
    pub verdict: Verdict,
}

impl DeadlockAnalysis {
    /// Returns `true` when the verdict is [`Verdict::Deadlock`].
    pub fn is_deadlocked(&self) -> bool {
        matches!(self.verdict, Verdict::Deadlock(_))
    }

    /// The safe sequence, when there is one.
    pub fn safe_sequence(&self) -> Option<&SafeSequence> {
        match &self.verdict {
            Verdict::NoDeadlock(seq) => Some(seq),
            Verdict::Deadlock(_) => None,
        }
    }

    /// The deadlock report, when there is one.
    pub fn report(&self) -> Option<&DeadlockReport> {
        match &self.verdict {
            Verdict::Deadlock(report) => Some(report),
            Verdict::NoDeadlock(_) => None,
        }
    }
}

/// Analyzes `graph` for deadlock.
///
/// Never mutates the graph; two calls on the same graph return equal results.
pub fn detect_deadlock(graph: &ResourceGraph) -> DeadlockAnalysis {
    let wait_for = WaitForGraph::build(graph);
    let cycles = wait_for.simple_cycles();
    let run = safety::run(graph);

    let verdict = if run.unfinished.is_empty() {
        Verdict::NoDeadlock(run.sequence)
    } else {
        Verdict::Deadlock(build_report(graph, &cycles, run.unfinished))
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        cycles = cycles.len(),
        deadlocked = matches!(verdict, Verdict::Deadlock(_)),
        "deadlock_analysis"
    );

    DeadlockAnalysis { cycles, verdict }
}

fn build_report(
    graph: &ResourceGraph,
    cycles: &[Vec<String>],
    unfinished: BTreeSet<String>,
) -> DeadlockReport {
    // Unordered pairs of processes that appear together in some cycle.
    let mut cycle_mates: HashSet<(&str, &str)> = HashSet::new();
    for cycle in cycles {
        for a in cycle {
            for b in cycle {
                if a != b {
                    cycle_mates.insert((a.as_str(), b.as_str()));
                }
            }
        }
    }

    let mut edges = BTreeSet::new();
    for request in graph.edges_of_type(EdgeKind::Request) {
        let waiter = request.source;
        if !unfinished.contains(waiter) {
            continue;
        }
        edges.insert(HighlightedEdge {
            source: waiter.to_string(),
            target: request.target.to_string(),
            kind: EdgeKind::Request,
        });
        for alloc in graph.holders_of(request.target) {
            let holder = alloc.target;
            if holder != waiter
                && unfinished.contains(holder)
                && cycle_mates.contains(&(waiter, holder))
            {
                edges.insert(HighlightedEdge {
                    source: alloc.source.to_string(),
                    target: holder.to_string(),
                    kind: EdgeKind::Allocation,
                });
            }
        }
    }

    let resources = edges
        .iter()
        .map(|edge| match edge.kind {
            EdgeKind::Request => edge.target.clone(),
            EdgeKind::Allocation => edge.source.clone(),
        })
        .collect();

    DeadlockReport {
        processes: unfinished,
        resources,
        edges,
    }
}
