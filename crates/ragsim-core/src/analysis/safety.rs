//! Banker-style safety check over the current allocation state.
//!
//! The simulation starts from each resource's available count (`work`) and
//! repeatedly lets a process finish when every pending request it has fits in
//! `work`. A finished process hands back everything it holds. The state is
//! safe when every process that touches any edge eventually finishes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::graph::ResourceGraph;

/// One step of the execution implied by a safe finishing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// The process is granted the instances it was waiting for.
    Acquire {
        /// Process being granted.
        process: String,
        /// Resource granted.
        resource: String,
        /// Instances granted.
        instances: u32,
    },
    /// The process finishes and returns instances.
    Release {
        /// Process finishing.
        process: String,
        /// Resource returned.
        resource: String,
        /// Instances returned.
        instances: u32,
    },
}

impl fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionEvent::Acquire {
                process,
                resource,
                instances,
            } => write!(f, "{process} acquires {instances} x {resource}"),
            ExecutionEvent::Release {
                process,
                resource,
                instances,
            } => write!(f, "{process} releases {instances} x {resource}"),
        }
    }
}

/// A finishing order in which every tracked process completes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeSequence {
    /// Processes in the order they finish.
    pub order: Vec<String>,
    /// Acquire/release events implied by `order`.
    pub events: Vec<ExecutionEvent>,
}

/// Result of running the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SafetyRun {
    pub sequence: SafeSequence,
    /// Tracked processes that could never finish.
    pub unfinished: BTreeSet<String>,
}

/// Runs the safety simulation.
///
/// Passes scan unfinished processes in lexicographic order; a process that
/// can finish does so immediately and its holdings are usable by the rest of
/// the same pass.
pub(crate) fn run(graph: &ResourceGraph) -> SafetyRun {
    let mut work: HashMap<&str, u64> = graph
        .resources()
        .map(|r| (r, u64::from(graph.available(r).unwrap_or(0))))
        .collect();
    let mut pending: BTreeSet<&str> = graph.edges().map(|e| e.process()).collect();
    let mut sequence = SafeSequence::default();

    loop {
        let mut progressed = false;
        let candidates: Vec<&str> = pending.iter().copied().collect();

        for process in candidates {
            let requests: BTreeMap<&str, u32> = graph
                .requests_by(process)
                .map(|e| (e.target, e.instances))
                .collect();
            let satisfiable = requests
                .iter()
                .all(|(r, &n)| work.get(r).is_some_and(|&w| w >= u64::from(n)));
            if !satisfiable {
                continue;
            }

            let mut returned: BTreeMap<&str, u32> = graph
                .held_by(process)
                .map(|e| (e.source, e.instances))
                .collect();
            for (&resource, &instances) in &requests {
                sequence.events.push(ExecutionEvent::Acquire {
                    process: process.to_string(),
                    resource: resource.to_string(),
                    instances,
                });
                *returned.entry(resource).or_default() += instances;
            }
            for (&resource, &instances) in &returned {
                sequence.events.push(ExecutionEvent::Release {
                    process: process.to_string(),
                    resource: resource.to_string(),
                    instances,
                });
            }

            // Net effect of acquire-then-release is returning what was held.
            for held in graph.held_by(process) {
                *work.entry(held.source).or_default() += u64::from(held.instances);
            }

            pending.remove(process);
            sequence.order.push(process.to_string());
            progressed = true;
        }

        if !progressed {
            break;
        }
    }

    SafetyRun {
        sequence,
        unfinished: pending.into_iter().map(str::to_string).collect(),
    }
}
