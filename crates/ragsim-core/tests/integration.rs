//! Integration tests for ragsim-core.
//!
//! End-to-end scenarios across the graph, allocation engine, analyzer, and
//! session history: the textbook two-process deadlock, a cyclic wait that
//! still completes, promotion fairness, and undo/redo of whole sequences.

use std::collections::BTreeSet;

use ragsim_core::{
    EdgeKind, ExecutionEvent, RagError, ReleaseOutcome, RequestOutcome, ResourceGraph, Session,
    Verdict, detect_deadlock,
};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Every resource satisfies `available + Σ allocations == total`.
fn assert_availability(graph: &ResourceGraph) {
    for r in graph.resources() {
        let held: u32 = graph.holders_of(r).map(|e| e.instances).sum();
        assert_eq!(
            graph.available(r).unwrap() + held,
            graph.total(r).unwrap(),
            "availability invariant broken for {r}"
        );
    }
}

// ============================================================================
// 1. Classic deadlock
// ============================================================================

#[test]
fn classic_two_process_deadlock() {
    let mut graph = ResourceGraph::new();
    graph.add_process("P1").unwrap();
    graph.add_process("P2").unwrap();
    graph.add_resource("R1", 1).unwrap();
    graph.add_resource("R2", 1).unwrap();

    assert_eq!(graph.request("P1", "R1", 1), Ok(RequestOutcome::Allocated));
    assert_eq!(graph.request("P2", "R2", 1), Ok(RequestOutcome::Allocated));
    assert_eq!(graph.request("P1", "R2", 1), Ok(RequestOutcome::Queued));
    assert_eq!(graph.request("P2", "R1", 1), Ok(RequestOutcome::Queued));
    assert_availability(&graph);

    let analysis = detect_deadlock(&graph);
    assert_eq!(analysis.cycles, vec![vec!["P1".to_string(), "P2".to_string()]]);
    match analysis.verdict {
        Verdict::Deadlock(report) => {
            assert_eq!(report.processes, set(&["P1", "P2"]));
            assert_eq!(report.resources, set(&["R1", "R2"]));
            let kinds: Vec<_> = report.edges.iter().map(|e| e.kind).collect();
            assert_eq!(kinds.iter().filter(|k| **k == EdgeKind::Request).count(), 2);
            assert_eq!(kinds.iter().filter(|k| **k == EdgeKind::Allocation).count(), 2);
        }
        Verdict::NoDeadlock(seq) => panic!("expected deadlock, got {:?}", seq.order),
    }
}

#[test]
fn breaking_the_deadlock_by_release() {
    let mut graph = ResourceGraph::new();
    for p in ["P1", "P2"] {
        graph.add_process(p).unwrap();
    }
    graph.add_resource("R1", 1).unwrap();
    graph.add_resource("R2", 1).unwrap();
    graph.request("P1", "R1", 1).unwrap();
    graph.request("P2", "R2", 1).unwrap();
    graph.request("P1", "R2", 1).unwrap();
    graph.request("P2", "R1", 1).unwrap();

    let outcome = graph.release("P1", "R1", 1).unwrap();
    let promoted = outcome.promoted.expect("P2 should be promoted");
    assert_eq!(promoted.process, "P2");
    assert!(graph.has_edge("R1", "P2", EdgeKind::Allocation));
    assert!(!detect_deadlock(&graph).is_deadlocked());
    assert_availability(&graph);
}

// ============================================================================
// 2. Cycle without deadlock
// ============================================================================

#[test]
fn cycle_with_spare_capacity_is_safe() {
    let mut graph = ResourceGraph::new();
    for p in ["P1", "P2", "P3"] {
        graph.add_process(p).unwrap();
    }
    graph.add_resource("R1", 2).unwrap();
    graph.add_resource("R2", 1).unwrap();
    graph.request("P1", "R1", 1).unwrap();
    graph.request("P3", "R1", 1).unwrap();
    graph.request("P2", "R2", 1).unwrap();
    graph.request("P1", "R2", 1).unwrap();
    graph.request("P2", "R1", 1).unwrap();

    let analysis = detect_deadlock(&graph);
    assert!(!analysis.cycles.is_empty(), "wait-for graph should be cyclic");

    let seq = analysis.safe_sequence().expect("state should be safe");
    assert_eq!(seq.order, ["P3", "P2", "P1"]);
    assert!(seq.events.contains(&ExecutionEvent::Acquire {
        process: "P2".into(),
        resource: "R1".into(),
        instances: 1,
    }));
    assert_eq!(
        seq.events.last(),
        Some(&ExecutionEvent::Release {
            process: "P1".into(),
            resource: "R2".into(),
            instances: 1,
        })
    );
}

#[test]
fn no_pending_requests_means_no_deadlock() {
    let mut graph = ResourceGraph::new();
    for p in ["A", "B", "C"] {
        graph.add_process(p).unwrap();
    }
    graph.add_resource("R", 3).unwrap();
    for p in ["A", "B", "C"] {
        graph.request(p, "R", 1).unwrap();
    }
    let analysis = detect_deadlock(&graph);
    assert_eq!(analysis.safe_sequence().unwrap().order, ["A", "B", "C"]);
}

// ============================================================================
// 3. Promotion ordering
// ============================================================================

#[test]
fn release_promotes_only_the_smaller_request() {
    let mut graph = ResourceGraph::new();
    for p in ["P1", "P2", "P3"] {
        graph.add_process(p).unwrap();
    }
    graph.add_resource("R1", 3).unwrap();
    graph.request("P1", "R1", 3).unwrap();
    assert_eq!(graph.request("P2", "R1", 2), Ok(RequestOutcome::Queued));
    assert_eq!(graph.request("P3", "R1", 1), Ok(RequestOutcome::Queued));

    let ReleaseOutcome {
        released,
        available,
        promoted,
    } = graph.release("P1", "R1", 1).unwrap();
    assert_eq!(released, 1);
    assert_eq!(available, 0);
    assert_eq!(promoted.map(|p| p.process), Some("P3".to_string()));
    assert!(graph.has_edge("P2", "R1", EdgeKind::Request));
    assert!(!graph.has_edge("P3", "R1", EdgeKind::Request));
    assert_availability(&graph);
}

// ============================================================================
// 4. Session history
// ============================================================================

#[test]
fn session_undo_redo_whole_sequence() {
    let mut session = Session::new();
    session.add_process("P1").unwrap();
    session.add_process("P2").unwrap();
    session.add_resource("R1", 1).unwrap();
    session.request("P1", "R1", 1).unwrap();
    session.request("P2", "R1", 1).unwrap();
    let final_graph = session.graph().clone();

    let mut undone = 0;
    while session.undo().is_ok() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert!(session.graph().is_empty());
    assert_eq!(session.undo().unwrap_err(), RagError::NothingToUndo);

    for _ in 0..undone {
        session.redo().unwrap();
    }
    assert_eq!(*session.graph(), final_graph);
    assert_eq!(session.redo().unwrap_err(), RagError::NothingToRedo);
}

#[test]
fn session_new_edit_discards_redo() {
    let mut session = Session::new();
    session.add_process("P1").unwrap();
    session.add_process("P2").unwrap();
    session.undo().unwrap();
    assert!(session.history().can_redo());

    session.add_resource("R1", 2).unwrap();
    assert!(!session.history().can_redo());
    assert!(!session.graph().contains("P2"));
}

#[test]
fn capacity_change_keeps_invariant() {
    let mut graph = ResourceGraph::new();
    graph.add_process("P1").unwrap();
    graph.add_resource("R1", 4).unwrap();
    graph.request("P1", "R1", 3).unwrap();

    graph.set_resource_capacity("R1", 6).unwrap();
    assert_eq!(graph.available("R1"), Some(3));
    graph.set_resource_capacity("R1", 3).unwrap();
    assert_eq!(graph.available("R1"), Some(0));
    assert!(matches!(
        graph.set_resource_capacity("R1", 2),
        Err(RagError::InvalidCount { value: 2, .. })
    ));
    assert_availability(&graph);
}
