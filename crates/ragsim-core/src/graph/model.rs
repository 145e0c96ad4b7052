//! Resource-allocation graph — node/edge storage, structural mutations, and
//! read-only queries.
//!
//! [`ResourceGraph`] stores nodes and edges in slot vectors indexed by
//! [`NodeId`] and [`EdgeId`], with a name → ID index and per-node adjacency
//! lists. Nothing holds a reference to anything else, so cloning the graph
//! for a history snapshot is a plain deep copy.
//!
//! Allocation transitions (`request`, `release`, promotion) live in
//! [`crate::allocation`]; this module owns the structure and its invariants:
//!
//! - node names are unique across processes and resources,
//! - every edge joins a process and a resource in the direction its kind demands,
//! - at most one edge of each kind per (resource, process) pair,
//! - no edge carries zero instances,
//! - `available = total - Σ allocations` for every resource.

use std::collections::HashMap;

use crate::error::RagError;

use super::edge::{Edge, EdgeId, EdgeKind, EdgeRef};
use super::node::{NodeData, NodeId, NodeKind, NodeRef};
use super::record::{EdgeRecord, NodeRecord};

/// Directed bipartite graph of processes and resources.
///
/// # Usage
///
/// 1. Create a graph with [`new()`](Self::new)
/// 2. Add nodes: [`add_process()`](Self::add_process),
///    [`add_resource()`](Self::add_resource)
/// 3. Drive allocations: [`request()`](Self::request),
///    [`release()`](Self::release)
/// 4. Analyze: [`detect_deadlock()`](crate::detect_deadlock)
#[derive(Clone, Debug, Default)]
pub struct ResourceGraph {
    nodes: Vec<Option<NodeData>>,
    edges: Vec<Option<Edge>>,
    /// Empty edge slots, reused before the vector grows.
    free_edges: Vec<EdgeId>,
    index: HashMap<String, NodeId>,
}

impl ResourceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node mutations ---

    /// Adds a process node. Returns the new node's ID.
    ///
    /// Fails with [`RagError::DuplicateName`] if any node already uses `name`.
    pub fn add_process(&mut self, name: &str) -> Result<NodeId, RagError> {
        self.ensure_unused(name)?;
        let id = self.insert_node(name.to_string(), NodeKind::Process);
        #[cfg(feature = "tracing")]
        tracing::debug!(process = name, "graph_add_process");
        Ok(id)
    }

    /// Adds a resource node with `total` instances, all available.
    ///
    /// Fails with [`RagError::DuplicateName`] or, when `total` is zero,
    /// [`RagError::InvalidCount`].
    pub fn add_resource(&mut self, name: &str, total: u32) -> Result<NodeId, RagError> {
        self.ensure_unused(name)?;
        if total < 1 {
            return Err(RagError::invalid_count(
                total,
                "a resource needs at least one instance",
            ));
        }
        let id = self.insert_node(
            name.to_string(),
            NodeKind::Resource {
                total,
                available: total,
            },
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(resource = name, total, "graph_add_resource");
        Ok(id)
    }

    /// Removes a node and every edge touching it. Returns the removed kind.
    ///
    /// Allocations held by a removed resource vanish with it. Allocations held
    /// by a removed process are returned to their resources.
    pub fn remove_node(&mut self, name: &str) -> Result<NodeKind, RagError> {
        let id = self
            .lookup(name)
            .ok_or_else(|| RagError::node_not_found(name))?;
        let node = self
            .node_data(id)
            .ok_or_else(|| RagError::node_not_found(name))?;
        let kind = node.kind;

        // Collect edge IDs to remove (avoid borrow conflict).
        let edge_ids: Vec<EdgeId> = node
            .incoming
            .iter()
            .chain(node.outgoing.iter())
            .copied()
            .collect();

        for edge_id in edge_ids {
            if let Some(edge) = self.disconnect_internal(edge_id)
                && kind.is_process()
                && edge.kind == EdgeKind::Allocation
            {
                self.give_back(edge.from, edge.instances);
            }
        }

        self.nodes[id.0 as usize] = None;
        self.index.remove(name);
        #[cfg(feature = "tracing")]
        tracing::debug!(node = name, kind = kind.label(), "graph_remove");
        Ok(kind)
    }

    /// Relabels a node. Edges follow automatically since they reference IDs.
    ///
    /// Renaming a node to its current name succeeds without change.
    pub fn rename_node(&mut self, old: &str, new: &str) -> Result<(), RagError> {
        let id = self
            .lookup(old)
            .ok_or_else(|| RagError::node_not_found(old))?;
        if old == new {
            return Ok(());
        }
        self.ensure_unused(new)?;

        self.index.remove(old);
        self.index.insert(new.to_string(), id);
        if let Some(node) = self.node_data_mut(id) {
            node.name = new.to_string();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(old, new, "graph_rename");
        Ok(())
    }

    /// Changes a resource's instance count.
    ///
    /// Growing adds the new instances to `available`. Shrinking is allowed
    /// down to the number of instances currently allocated; going below that
    /// fails with [`RagError::InvalidCount`].
    pub fn set_resource_capacity(&mut self, name: &str, total: u32) -> Result<(), RagError> {
        let id = self.resource_id(name)?;
        if total < 1 {
            return Err(RagError::invalid_count(
                total,
                "a resource needs at least one instance",
            ));
        }
        let allocated = self.allocated_by_id(id);
        let Some(free) = u64::from(total)
            .checked_sub(allocated)
            .and_then(|f| u32::try_from(f).ok())
        else {
            return Err(RagError::invalid_count(
                total,
                format!("'{name}' has {allocated} instances allocated"),
            ));
        };
        if let Some(NodeData {
            kind: NodeKind::Resource {
                total: t,
                available,
            },
            ..
        }) = self.node_data_mut(id)
        {
            *t = total;
            *available = free;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(resource = name, total, "graph_set_capacity");
        Ok(())
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.free_edges.clear();
        self.index.clear();
    }

    // --- Queries ---

    /// Returns `true` if a node named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns a view of the named node.
    pub fn node(&self, name: &str) -> Option<NodeRef<'_>> {
        let id = self.lookup(name)?;
        self.node_ref(id)
    }

    /// Returns the kind of the named node.
    pub fn node_kind(&self, name: &str) -> Option<NodeKind> {
        self.node(name).map(|n| n.kind)
    }

    /// Returns the available instance count of a resource.
    pub fn available(&self, resource: &str) -> Option<u32> {
        match self.node_kind(resource)? {
            NodeKind::Resource { available, .. } => Some(available),
            NodeKind::Process => None,
        }
    }

    /// Returns the total instance count of a resource.
    pub fn total(&self, resource: &str) -> Option<u32> {
        match self.node_kind(resource)? {
            NodeKind::Resource { total, .. } => Some(total),
            NodeKind::Process => None,
        }
    }

    /// Returns the number of instances of a resource held by processes.
    pub fn allocated(&self, resource: &str) -> Option<u32> {
        let id = self.lookup(resource)?;
        self.node_data(id)?
            .kind
            .is_resource()
            .then(|| u32::try_from(self.allocated_by_id(id)).unwrap_or(u32::MAX))
    }

    /// Iterates over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (i, n)))
            .map(|(i, n)| NodeRef {
                id: NodeId(i as u32),
                name: &n.name,
                kind: n.kind,
            })
    }

    /// Iterates over process names in creation order.
    pub fn processes(&self) -> impl Iterator<Item = &str> {
        self.nodes()
            .filter(|n| n.kind.is_process())
            .map(|n| n.name)
    }

    /// Iterates over resource names in creation order.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.nodes()
            .filter(|n| n.kind.is_resource())
            .map(|n| n.name)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over all edges in slot order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> {
        (0..self.edges.len()).filter_map(|i| self.edge_ref(EdgeId(i as u32)))
    }

    /// Iterates over edges of one kind in slot order.
    pub fn edges_of_type(&self, kind: EdgeKind) -> impl Iterator<Item = EdgeRef<'_>> {
        self.edges().filter(move |e| e.kind == kind)
    }

    /// Returns the edge of `kind` from `source` to `target`, if present.
    pub fn edge(&self, source: &str, target: &str, kind: EdgeKind) -> Option<EdgeRef<'_>> {
        let from = self.lookup(source)?;
        let to = self.lookup(target)?;
        self.edge_ref(self.find_edge(from, to, kind)?)
    }

    /// Returns `true` if an edge of `kind` runs from `source` to `target`.
    pub fn has_edge(&self, source: &str, target: &str, kind: EdgeKind) -> bool {
        self.edge(source, target, kind).is_some()
    }

    /// Pending requests issued by a process.
    pub fn requests_by<'a>(&'a self, process: &str) -> impl Iterator<Item = EdgeRef<'a>> + use<'a> {
        self.incident(process, Direction::Outgoing, EdgeKind::Request)
    }

    /// Allocations held by a process.
    pub fn held_by<'a>(&'a self, process: &str) -> impl Iterator<Item = EdgeRef<'a>> + use<'a> {
        self.incident(process, Direction::Incoming, EdgeKind::Allocation)
    }

    /// Allocations granted from a resource.
    pub fn holders_of<'a>(&'a self, resource: &str) -> impl Iterator<Item = EdgeRef<'a>> + use<'a> {
        self.incident(resource, Direction::Outgoing, EdgeKind::Allocation)
    }

    /// Pending requests waiting on a resource.
    pub fn waiters_on<'a>(&'a self, resource: &str) -> impl Iterator<Item = EdgeRef<'a>> + use<'a> {
        self.incident(resource, Direction::Incoming, EdgeKind::Request)
    }

    /// Verifies every structural invariant.
    ///
    /// Mutations keep these invariants on their own; this is used when
    /// importing data and by tests.
    pub fn check_invariants(&self) -> Result<(), RagError> {
        for edge in self.edges() {
            let (process, resource) = (edge.process(), edge.resource());
            if !self.node_kind(process).is_some_and(|k| k.is_process()) {
                return Err(RagError::invalid_format(format!(
                    "{} edge {} -> {} does not end at a process",
                    edge.kind.label(),
                    edge.source,
                    edge.target
                )));
            }
            if !self.node_kind(resource).is_some_and(|k| k.is_resource()) {
                return Err(RagError::invalid_format(format!(
                    "{} edge {} -> {} does not end at a resource",
                    edge.kind.label(),
                    edge.source,
                    edge.target
                )));
            }
            if edge.instances == 0 {
                return Err(RagError::invalid_format(format!(
                    "{} edge {} -> {} carries no instances",
                    edge.kind.label(),
                    edge.source,
                    edge.target
                )));
            }
        }
        for node in self.nodes() {
            if let NodeKind::Resource { total, available } = node.kind {
                let allocated = self.allocated_by_id(node.id);
                if u64::from(available) + allocated != u64::from(total) {
                    return Err(RagError::invalid_format(format!(
                        "resource '{}' reports {available} available with {allocated} of {total} allocated",
                        node.name
                    )));
                }
            }
        }
        Ok(())
    }

    // --- Import / export ---

    /// Builds a graph from snapshot records.
    ///
    /// Every record is validated; the first violation is returned as
    /// [`RagError::InvalidFormat`] and no graph is produced.
    pub fn from_records(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Result<Self, RagError> {
        let mut graph = Self::new();
        let mut declared = Vec::new();

        for record in nodes {
            let name = record.name();
            if name.trim().is_empty() {
                return Err(RagError::invalid_format("node with an empty id"));
            }
            if graph.contains(name) {
                return Err(RagError::invalid_format(format!(
                    "duplicate node id '{name}'"
                )));
            }
            match *record {
                NodeRecord::Process { .. } => {
                    graph.insert_node(name.to_string(), NodeKind::Process);
                }
                NodeRecord::Resource {
                    total, available, ..
                } => {
                    let total = u32::try_from(total)
                        .ok()
                        .filter(|&t| t >= 1)
                        .ok_or_else(|| {
                            RagError::invalid_format(format!(
                                "resource '{name}' has invalid instance count {total}"
                            ))
                        })?;
                    let available = u32::try_from(available)
                        .ok()
                        .filter(|&a| a <= total)
                        .ok_or_else(|| {
                            RagError::invalid_format(format!(
                                "resource '{name}' has invalid available count {available}"
                            ))
                        })?;
                    let id = graph.insert_node(
                        name.to_string(),
                        NodeKind::Resource {
                            total,
                            available: total,
                        },
                    );
                    declared.push((id, available));
                }
            }
        }

        for record in edges {
            let from = graph.lookup(&record.source).ok_or_else(|| {
                RagError::invalid_format(format!(
                    "edge source '{}' is not a node",
                    record.source
                ))
            })?;
            let to = graph.lookup(&record.target).ok_or_else(|| {
                RagError::invalid_format(format!(
                    "edge target '{}' is not a node",
                    record.target
                ))
            })?;
            let (process, resource) = match record.kind {
                EdgeKind::Allocation => (to, from),
                EdgeKind::Request => (from, to),
            };
            if !matches!(graph.kind_of(process), Some(NodeKind::Process))
                || !matches!(graph.kind_of(resource), Some(NodeKind::Resource { .. }))
            {
                return Err(RagError::invalid_format(format!(
                    "{} edge {} -> {} has endpoints of the wrong kind",
                    record.kind.label(),
                    record.source,
                    record.target
                )));
            }
            let instances = u32::try_from(record.instances)
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| {
                    RagError::invalid_format(format!(
                        "{} edge {} -> {} has invalid instance count {}",
                        record.kind.label(),
                        record.source,
                        record.target,
                        record.instances
                    ))
                })?;
            if graph.find_edge(from, to, record.kind).is_some() {
                return Err(RagError::invalid_format(format!(
                    "duplicate {} edge {} -> {}",
                    record.kind.label(),
                    record.source,
                    record.target
                )));
            }
            graph.connect(record.kind, from, to, instances);
        }

        for (id, available) in declared {
            let allocated = graph.allocated_by_id(id);
            let total = graph.counts(id).map_or(0, |(t, _)| t);
            if allocated + u64::from(available) != u64::from(total) {
                return Err(RagError::invalid_format(format!(
                    "resource '{}' reports {available} available but {allocated} of {total} are allocated",
                    graph.name_of(id).unwrap_or("?")
                )));
            }
            graph.set_available(id, available);
        }

        Ok(graph)
    }

    /// Exports nodes as records in creation order, then edges in slot order.
    pub fn to_records(&self) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        let nodes = self
            .nodes()
            .map(|n| match n.kind {
                NodeKind::Process => NodeRecord::process(n.name),
                NodeKind::Resource { total, available } => {
                    NodeRecord::resource(n.name, i64::from(total), i64::from(available))
                }
            })
            .collect();
        let edges = self
            .edges()
            .map(|e| EdgeRecord::new(e.source, e.target, e.kind, i64::from(e.instances)))
            .collect();
        (nodes, edges)
    }

    // --- Crate-internal helpers ---

    pub(crate) fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub(crate) fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node_data(id).map(|n| n.name.as_str())
    }

    pub(crate) fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        self.node_data(id).map(|n| n.kind)
    }

    /// Resolves a name that must refer to a process.
    pub(crate) fn process_id(&self, name: &str) -> Result<NodeId, RagError> {
        self.lookup(name)
            .filter(|&id| matches!(self.kind_of(id), Some(NodeKind::Process)))
            .ok_or_else(|| RagError::process_not_found(name))
    }

    /// Resolves a name that must refer to a resource.
    pub(crate) fn resource_id(&self, name: &str) -> Result<NodeId, RagError> {
        self.lookup(name)
            .filter(|&id| matches!(self.kind_of(id), Some(NodeKind::Resource { .. })))
            .ok_or_else(|| RagError::resource_not_found(name))
    }

    /// Returns `(total, available)` for a resource.
    pub(crate) fn counts(&self, id: NodeId) -> Option<(u32, u32)> {
        match self.kind_of(id)? {
            NodeKind::Resource { total, available } => Some((total, available)),
            NodeKind::Process => None,
        }
    }

    pub(crate) fn set_available(&mut self, id: NodeId, value: u32) {
        if let Some(NodeData {
            kind: NodeKind::Resource { available, .. },
            ..
        }) = self.node_data_mut(id)
        {
            *available = value;
        }
    }

    /// Adds released instances back to a resource's available pool.
    pub(crate) fn give_back(&mut self, resource: NodeId, amount: u32) {
        if let Some((total, available)) = self.counts(resource) {
            self.set_available(resource, available.saturating_add(amount).min(total));
        }
    }

    /// Sum of allocation instances granted from a resource.
    ///
    /// Summed as `u64`: imported edges are each bounded by `u32`, but their
    /// sum is not until the resource's total has been checked against it.
    pub(crate) fn allocated_by_id(&self, resource: NodeId) -> u64 {
        self.node_data(resource).map_or(0, |node| {
            node.outgoing
                .iter()
                .filter_map(|&e| self.edge_data(e))
                .filter(|e| e.kind == EdgeKind::Allocation)
                .map(|e| u64::from(e.instances))
                .sum()
        })
    }

    pub(crate) fn edge_data(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0 as usize).and_then(|e| e.as_ref())
    }

    pub(crate) fn edge_ref(&self, id: EdgeId) -> Option<EdgeRef<'_>> {
        let edge = self.edge_data(id)?;
        Some(EdgeRef {
            id,
            kind: edge.kind,
            source: self.name_of(edge.from)?,
            target: self.name_of(edge.to)?,
            instances: edge.instances,
        })
    }

    /// Finds the edge of `kind` connecting `from` to `to`, if one exists.
    pub(crate) fn find_edge(&self, from: NodeId, to: NodeId, kind: EdgeKind) -> Option<EdgeId> {
        let node = self.node_data(from)?;
        node.outgoing.iter().copied().find(|&edge_id| {
            self.edge_data(edge_id)
                .is_some_and(|e| e.to == to && e.kind == kind)
        })
    }

    /// Inserts a new edge. The caller guarantees no edge of the same kind
    /// exists between the pair.
    pub(crate) fn connect(&mut self, kind: EdgeKind, from: NodeId, to: NodeId, instances: u32) -> EdgeId {
        let edge = Edge {
            kind,
            from,
            to,
            instances,
        };
        let edge_id = match self.free_edges.pop() {
            Some(id) => {
                self.edges[id.0 as usize] = Some(edge);
                id
            }
            None => {
                self.edges.push(Some(edge));
                EdgeId(self.edges.len() as u32 - 1)
            }
        };
        if let Some(node) = self.node_data_mut(from) {
            node.outgoing.push(edge_id);
        }
        if let Some(node) = self.node_data_mut(to) {
            node.incoming.push(edge_id);
        }
        edge_id
    }

    /// Adds `amount` instances to the edge of `kind` between the pair,
    /// creating the edge when absent.
    pub(crate) fn grow_edge(&mut self, kind: EdgeKind, from: NodeId, to: NodeId, amount: u32) -> EdgeId {
        match self.find_edge(from, to, kind) {
            Some(id) => {
                if let Some(Some(edge)) = self.edges.get_mut(id.0 as usize) {
                    edge.instances += amount;
                }
                id
            }
            None => self.connect(kind, from, to, amount),
        }
    }

    /// Removes `amount` instances from an edge, dropping the edge at zero.
    pub(crate) fn shrink_edge(&mut self, id: EdgeId, amount: u32) {
        let remaining = match self.edges.get_mut(id.0 as usize) {
            Some(Some(edge)) => {
                edge.instances = edge.instances.saturating_sub(amount);
                edge.instances
            }
            _ => return,
        };
        if remaining == 0 {
            self.disconnect_internal(id);
        }
    }

    /// Disconnects an edge without error checking. Returns the removed edge.
    pub(crate) fn disconnect_internal(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.0 as usize)?.take()?;
        self.free_edges.push(id);
        if let Some(node) = self.node_data_mut(edge.from) {
            node.outgoing.retain(|e| *e != id);
        }
        if let Some(node) = self.node_data_mut(edge.to) {
            node.incoming.retain(|e| *e != id);
        }
        Some(edge)
    }

    // --- Private helpers ---

    fn ensure_unused(&self, name: &str) -> Result<(), RagError> {
        if self.contains(name) {
            return Err(RagError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn insert_node(&mut self, name: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.index.insert(name.clone(), id);
        self.nodes.push(Some(NodeData::new(name, kind)));
        id
    }

    pub(crate) fn node_data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize).and_then(|n| n.as_ref())
    }

    fn node_data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize).and_then(|n| n.as_mut())
    }

    fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let node = self.node_data(id)?;
        Some(NodeRef {
            id,
            name: &node.name,
            kind: node.kind,
        })
    }

    fn incident<'a>(
        &'a self,
        name: &str,
        direction: Direction,
        kind: EdgeKind,
    ) -> impl Iterator<Item = EdgeRef<'a>> + use<'a> {
        let edge_ids: &[EdgeId] = match self.lookup(name).and_then(|id| self.node_data(id)) {
            Some(node) => match direction {
                Direction::Incoming => &node.incoming,
                Direction::Outgoing => &node.outgoing,
            },
            None => &[],
        };
        edge_ids
            .iter()
            .filter_map(|&id| self.edge_ref(id))
            .filter(move |e| e.kind == kind)
    }

    /// Edges as sorted `(source, target, kind, instances)` tuples.
    fn edge_set(&self) -> Vec<(&str, &str, EdgeKind, u32)> {
        let mut set: Vec<_> = self
            .edges()
            .map(|e| (e.source, e.target, e.kind, e.instances))
            .collect();
        set.sort_unstable();
        set
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Incoming,
    Outgoing,
}

/// Structural equality: same nodes (name and kind) in the same creation
/// order, and the same edge set. Slot numbering is ignored.
impl PartialEq for ResourceGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes()
            .map(|n| (n.name, n.kind))
            .eq(other.nodes().map(|n| (n.name, n.kind)))
            && self.edge_set() == other.edge_set()
    }
}

impl Eq for ResourceGraph {}
