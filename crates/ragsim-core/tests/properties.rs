//! Property-based tests for ragsim-core.
//!
//! Drives random operation sequences through the graph and session and checks
//! the invariants that must survive any of them: resource accounting,
//! analysis purity, and history round trips.

use proptest::prelude::*;
use ragsim_core::{RequestOutcome, ResourceGraph, Session, Verdict, detect_deadlock};

const PROCESSES: &[&str] = &["P1", "P2", "P3", "P4"];
const RESOURCES: &[&str] = &["R1", "R2", "R3"];

#[derive(Clone, Debug)]
enum Op {
    Request(usize, usize, u32),
    Release(usize, usize, u32),
    Cancel(usize, usize),
    Capacity(usize, u32),
    RemoveProcess(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..PROCESSES.len(), 0..RESOURCES.len(), 0u32..5).prop_map(|(p, r, n)| Op::Request(p, r, n)),
        3 => (0..PROCESSES.len(), 0..RESOURCES.len(), 0u32..5).prop_map(|(p, r, n)| Op::Release(p, r, n)),
        1 => (0..PROCESSES.len(), 0..RESOURCES.len()).prop_map(|(p, r)| Op::Cancel(p, r)),
        1 => (0..RESOURCES.len(), 0u32..6).prop_map(|(r, n)| Op::Capacity(r, n)),
        1 => (0..PROCESSES.len()).prop_map(Op::RemoveProcess),
    ]
}

fn seeded_session(capacities: &[u32]) -> Session {
    let mut session = Session::with_settings(Default::default(), 0);
    for p in PROCESSES {
        session.add_process(p).unwrap();
    }
    for (r, &n) in RESOURCES.iter().zip(capacities) {
        session.add_resource(r, n).unwrap();
    }
    session
}

/// Applies `op`, ignoring rejected operations (they must leave no trace).
fn apply(session: &mut Session, op: &Op) {
    let _ = match *op {
        Op::Request(p, r, n) => session.request(PROCESSES[p], RESOURCES[r], n).map(|_| ()),
        Op::Release(p, r, n) => session.release(PROCESSES[p], RESOURCES[r], n).map(|_| ()),
        Op::Cancel(p, r) => session.cancel_request(PROCESSES[p], RESOURCES[r]).map(|_| ()),
        Op::Capacity(r, n) => session.set_resource_capacity(RESOURCES[r], n),
        Op::RemoveProcess(p) => session.remove_node(PROCESSES[p]).map(|_| ()),
    };
}

fn availability_holds(graph: &ResourceGraph) -> bool {
    graph.resources().all(|r| {
        let held: u32 = graph.holders_of(r).map(|e| e.instances).sum();
        graph.available(r).unwrap() + held == graph.total(r).unwrap()
            && graph.available(r).unwrap() <= graph.total(r).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// `available + Σ allocations == total` after every operation, accepted
    /// or rejected.
    #[test]
    fn availability_invariant(
        caps in prop::array::uniform3(1u32..5),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut session = seeded_session(&caps);
        for op in &ops {
            apply(&mut session, op);
            prop_assert!(availability_holds(session.graph()), "after {:?}", op);
            prop_assert!(session.graph().check_invariants().is_ok());
        }
    }

    /// A request reported as allocated had enough instances before the call.
    #[test]
    fn allocated_requests_fit(
        caps in prop::array::uniform3(1u32..5),
        ops in prop::collection::vec(op(), 0..40),
        p in 0..PROCESSES.len(),
        r in 0..RESOURCES.len(),
        n in 1u32..5,
    ) {
        let mut session = seeded_session(&caps);
        for op in &ops {
            apply(&mut session, op);
        }
        let before = session.graph().available(RESOURCES[r]);
        if let (Some(before), Ok(RequestOutcome::Allocated)) =
            (before, session.request(PROCESSES[p], RESOURCES[r], n))
        {
            prop_assert!(before >= n);
        }
    }

    /// Detection never mutates the graph and returns the same answer twice.
    #[test]
    fn detection_is_pure(
        caps in prop::array::uniform3(1u32..5),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut session = seeded_session(&caps);
        for op in &ops {
            apply(&mut session, op);
        }
        let before = session.graph().clone();
        let first = detect_deadlock(session.graph());
        let second = detect_deadlock(session.graph());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(session.graph(), &before);
    }

    /// Without pending requests the verdict is always safe.
    #[test]
    fn no_requests_no_deadlock(
        caps in prop::array::uniform3(1u32..5),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut session = seeded_session(&caps);
        for op in &ops {
            apply(&mut session, op);
        }
        let mut graph = session.graph().clone();
        let pending: Vec<(String, String)> = graph
            .edges_of_type(ragsim_core::EdgeKind::Request)
            .map(|e| (e.source.to_string(), e.target.to_string()))
            .collect();
        for (p, r) in pending {
            graph.cancel_request(&p, &r).unwrap();
        }
        prop_assert!(matches!(detect_deadlock(&graph).verdict, Verdict::NoDeadlock(_)));
    }

    /// Undoing an accepted mutation restores the prior graph; redo restores
    /// the mutated one.
    #[test]
    fn undo_redo_round_trip(
        caps in prop::array::uniform3(1u32..5),
        ops in prop::collection::vec(op(), 0..20),
        last in op(),
    ) {
        let mut session = seeded_session(&caps);
        for op in &ops {
            apply(&mut session, op);
        }
        let before = session.graph().clone();
        let depth = session.history().undo_len();
        apply(&mut session, &last);
        if session.history().undo_len() > depth {
            let after = session.graph().clone();
            session.undo().unwrap();
            prop_assert_eq!(session.graph(), &before);
            session.redo().unwrap();
            prop_assert_eq!(session.graph(), &after);
        } else {
            prop_assert_eq!(session.graph(), &before);
        }
    }
}
