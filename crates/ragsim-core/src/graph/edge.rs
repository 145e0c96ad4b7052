//! Graph edge types for the resource-allocation graph.
//!
//! An edge always joins a process and a resource. Its direction encodes its
//! meaning: [`EdgeKind::Allocation`] points resource → process (the process
//! holds instances), [`EdgeKind::Request`] points process → resource (the
//! process waits for instances).

use super::node::NodeId;

/// Unique identifier for an edge in the resource graph.
///
/// The slot of a removed edge is handed to the next edge that is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// The meaning of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Resource → process: the process holds `instances` units.
    Allocation,
    /// Process → resource: the process waits for `instances` units.
    Request,
}

impl EdgeKind {
    /// Lowercase label used in the snapshot format.
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Allocation => "allocation",
            EdgeKind::Request => "request",
        }
    }
}

/// Read-only view of an edge with endpoint names resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRef<'a> {
    /// Edge identifier.
    pub id: EdgeId,
    /// Allocation or request.
    pub kind: EdgeKind,
    /// Source node name (resource for allocations, process for requests).
    pub source: &'a str,
    /// Target node name (process for allocations, resource for requests).
    pub target: &'a str,
    /// Number of instances held or requested. Always at least 1.
    pub instances: u32,
}

impl<'a> EdgeRef<'a> {
    /// The process end of the edge.
    pub fn process(&self) -> &'a str {
        match self.kind {
            EdgeKind::Allocation => self.target,
            EdgeKind::Request => self.source,
        }
    }

    /// The resource end of the edge.
    pub fn resource(&self) -> &'a str {
        match self.kind {
            EdgeKind::Allocation => self.source,
            EdgeKind::Request => self.target,
        }
    }
}

/// A directed, typed connection between a process and a resource.
#[derive(Clone, Debug)]
pub(crate) struct Edge {
    pub kind: EdgeKind,
    pub from: NodeId,
    pub to: NodeId,
    pub instances: u32,
}
