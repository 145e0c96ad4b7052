//! Wait-for graph derived from the resource-allocation graph.
//!
//! An edge `p → q` means process `p` has a pending request on a resource of
//! which process `q` holds at least one instance. Several shared resources
//! between the same pair collapse into one edge.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::{EdgeKind, ResourceGraph};

/// Process-to-process wait relation, borrowed from a [`ResourceGraph`].
///
/// Node and successor order is lexicographic, so every traversal (and the
/// cycle list) is deterministic for a given graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitForGraph<'a> {
    adjacency: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> WaitForGraph<'a> {
    /// Derives the wait-for relation from the current request and allocation edges.
    pub fn build(graph: &'a ResourceGraph) -> Self {
        let mut adjacency: BTreeMap<&'a str, BTreeSet<&'a str>> = BTreeMap::new();
        for request in graph.edges_of_type(EdgeKind::Request) {
            let waiter = request.source;
            let holders = graph
                .holders_of(request.target)
                .map(|alloc| alloc.target)
                .filter(|&holder| holder != waiter);
            adjacency.entry(waiter).or_default().extend(holders);
        }
        Self { adjacency }
    }

    /// Processes that `process` is waiting on.
    pub fn waits_on<'s>(&'s self, process: &str) -> impl Iterator<Item = &'a str> + use<'a, 's> {
        self.adjacency
            .get(process)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// Returns `true` if `from` waits on `to`.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.adjacency
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    /// Number of wait-for edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// Enumerates every simple cycle.
    ///
    /// Each cycle starts at its lexicographically smallest process and is
    /// reported once; the list itself is sorted.
    pub fn simple_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut path = Vec::new();
        let mut on_path = BTreeSet::new();

        for &start in self.adjacency.keys() {
            path.push(start);
            on_path.insert(start);
            self.extend_cycles(start, start, &mut path, &mut on_path, &mut cycles);
            path.pop();
            on_path.remove(start);
        }

        cycles.sort();
        cycles
    }

    /// DFS restricted to processes greater than `start`, so each cycle is
    /// found only from its smallest member.
    fn extend_cycles(
        &self,
        start: &'a str,
        current: &'a str,
        path: &mut Vec<&'a str>,
        on_path: &mut BTreeSet<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        let Some(successors) = self.adjacency.get(current) else {
            return;
        };
        for &next in successors {
            if next == start {
                cycles.push(path.iter().map(|s| (*s).to_string()).collect());
            } else if next > start && !on_path.contains(next) {
                path.push(next);
                on_path.insert(next);
                self.extend_cycles(start, next, path, on_path, cycles);
                path.pop();
                on_path.remove(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(processes: &[&str], resources: &[(&str, u32)], ops: &[(&str, &str, u32)]) -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        for p in processes {
            graph.add_process(p).unwrap();
        }
        for (r, n) in resources {
            graph.add_resource(r, *n).unwrap();
        }
        for (p, r, n) in ops {
            graph.request(p, r, *n).unwrap();
        }
        graph
    }

    #[test]
    fn test_waiter_points_at_every_holder() {
        let graph = build(
            &["P1", "P2", "P3"],
            &[("R1", 2)],
            &[("P1", "R1", 1), ("P2", "R1", 1), ("P3", "R1", 1)],
        );
        let wfg = WaitForGraph::build(&graph);
        assert!(wfg.has_edge("P3", "P1"));
        assert!(wfg.has_edge("P3", "P2"));
        assert_eq!(wfg.edge_count(), 2);
        assert_eq!(wfg.waits_on("P3").collect::<Vec<_>>(), ["P1", "P2"]);
    }

    #[test]
    fn test_no_self_wait() {
        let graph = build(&["P1"], &[("R1", 2)], &[("P1", "R1", 1), ("P1", "R1", 2)]);
        let wfg = WaitForGraph::build(&graph);
        assert_eq!(wfg.edge_count(), 0);
        assert!(wfg.simple_cycles().is_empty());
    }

    #[test]
    fn test_two_process_cycle() {
        let graph = build(
            &["P1", "P2"],
            &[("R1", 1), ("R2", 1)],
            &[
                ("P1", "R1", 1),
                ("P2", "R2", 1),
                ("P1", "R2", 1),
                ("P2", "R1", 1),
            ],
        );
        let cycles = WaitForGraph::build(&graph).simple_cycles();
        assert_eq!(cycles, vec![vec!["P1".to_string(), "P2".to_string()]]);
    }

    #[test]
    fn test_overlapping_cycles_are_each_reported() {
        // A <-> B and B <-> C share B; A and C are never on one simple cycle.
        let mut graph = build(
            &["A", "B", "C"],
            &[("Ra", 1), ("Rb", 1), ("Rc", 1)],
            &[
                ("A", "Ra", 1),
                ("B", "Rb", 1),
                ("C", "Rc", 1),
                ("A", "Rb", 1),
                ("C", "Rb", 1),
            ],
        );
        graph.add_resource("Rac", 2).unwrap();
        graph.request("A", "Rac", 1).unwrap();
        graph.request("C", "Rac", 1).unwrap();
        graph.request("B", "Rac", 1).unwrap();

        let cycles = WaitForGraph::build(&graph).simple_cycles();
        assert_eq!(
            cycles,
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["B".to_string(), "C".to_string()],
            ]
        );
    }

    #[test]
    fn test_three_cycle_starts_at_smallest() {
        let graph = build(
            &["P3", "P1", "P2"],
            &[("R1", 1), ("R2", 1), ("R3", 1)],
            &[
                ("P1", "R1", 1),
                ("P2", "R2", 1),
                ("P3", "R3", 1),
                ("P1", "R2", 1),
                ("P2", "R3", 1),
                ("P3", "R1", 1),
            ],
        );
        let cycles = WaitForGraph::build(&graph).simple_cycles();
        assert_eq!(
            cycles,
            vec![vec!["P1".to_string(), "P2".to_string(), "P3".to_string()]]
        );
    }
}
