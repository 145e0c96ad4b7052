//! Plain node and edge records used to import and export a graph.
//!
//! Records carry the raw values found in a snapshot file. Counts are signed so
//! that negative values reach validation and are reported as
//! [`RagError::InvalidFormat`](crate::RagError::InvalidFormat) instead of
//! failing somewhere inside a deserializer.

use super::edge::EdgeKind;

/// One node as stored in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeRecord {
    /// A process node.
    Process {
        /// Node name.
        name: String,
    },
    /// A resource node.
    Resource {
        /// Node name.
        name: String,
        /// Total instances.
        total: i64,
        /// Available instances.
        available: i64,
    },
}

impl NodeRecord {
    /// Convenience constructor for a process record.
    pub fn process(name: impl Into<String>) -> Self {
        NodeRecord::Process { name: name.into() }
    }

    /// Convenience constructor for a resource record.
    pub fn resource(name: impl Into<String>, total: i64, available: i64) -> Self {
        NodeRecord::Resource {
            name: name.into(),
            total,
            available,
        }
    }

    /// The node name.
    pub fn name(&self) -> &str {
        match self {
            NodeRecord::Process { name } | NodeRecord::Resource { name, .. } => name,
        }
    }
}

/// One edge as stored in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Source node name.
    pub source: String,
    /// Target node name.
    pub target: String,
    /// Allocation or request.
    pub kind: EdgeKind,
    /// Instance count.
    pub instances: i64,
}

impl EdgeRecord {
    /// Creates an edge record.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: EdgeKind,
        instances: i64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            instances,
        }
    }
}
