//! Graph node types for the resource-allocation graph.
//!
//! Each node has a stable [`NodeId`] and a [`NodeKind`] that determines its
//! role: a process that requests and holds instances, or a resource that
//! owns a fixed pool of instances. The crate-internal `NodeData` bundles the
//! kind with the node's name and adjacency lists.

use super::edge::EdgeId;

/// Unique identifier for a node in the resource graph.
///
/// Node IDs are assigned sequentially and never reused within a graph
/// instance. They survive renames, so ID order is node creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// The role of a node in the resource-allocation graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A process. Holds allocations and issues requests.
    Process,
    /// A multiple-instance resource.
    Resource {
        /// Number of instances the resource owns.
        total: u32,
        /// Instances not currently allocated to any process.
        available: u32,
    },
}

impl NodeKind {
    /// Returns `true` for process nodes.
    #[inline]
    pub fn is_process(&self) -> bool {
        matches!(self, NodeKind::Process)
    }

    /// Returns `true` for resource nodes.
    #[inline]
    pub fn is_resource(&self) -> bool {
        matches!(self, NodeKind::Resource { .. })
    }

    /// Lowercase label used in error messages and the snapshot format.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Process => "process",
            NodeKind::Resource { .. } => "resource",
        }
    }
}

/// Read-only view of a node, borrowed from the graph.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    /// Node identifier.
    pub id: NodeId,
    /// Unique node name.
    pub name: &'a str,
    /// Node kind with its kind-specific data.
    pub kind: NodeKind,
}

/// Internal bookkeeping for a node in the graph.
#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub name: String,
    pub kind: NodeKind,
    /// Edges arriving at this node.
    pub incoming: Vec<EdgeId>,
    /// Edges leaving this node.
    pub outgoing: Vec<EdgeId>,
}

impl NodeData {
    /// Creates a node with no edges.
    pub fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}
