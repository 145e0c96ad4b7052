//! JSON snapshot file format.
//!
//! A snapshot file stores the graph in node-link form plus optional node
//! positions:
//!
//! ```json
//! {
//!   "graph": {
//!     "nodes": [
//!       { "id": "P1", "type": "process" },
//!       { "id": "R1", "type": "resource", "instances": 2, "available": 1 }
//!     ],
//!     "edges": [
//!       { "source": "R1", "target": "P1", "type": "allocation", "instances": 1 }
//!     ]
//!   },
//!   "positions": { "P1": [100.0, 200.0] }
//! }
//! ```
//!
//! `links` is accepted in place of `edges`, unknown keys are ignored, and
//! counts are read as signed integers so that negative values are reported by
//! graph validation. A resource without `available` gets
//! `instances - Σ allocations`; an edge or resource without `instances` gets 1.

use std::collections::BTreeMap;
use std::path::Path;

use ragsim_core::{EdgeKind, EdgeRecord, Layout, NodeRecord, Position, ResourceGraph};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotFile {
    /// Nodes and edges.
    pub graph: GraphData,
    /// Node positions keyed by name.
    #[serde(default)]
    pub positions: BTreeMap<String, [f64; 2]>,
}

/// Node-link graph body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphData {
    /// Nodes in insertion order.
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    /// Allocation and request edges.
    #[serde(default, alias = "links")]
    pub edges: Vec<EdgeEntry>,
}

/// One node, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeEntry {
    /// A process.
    Process {
        /// Node name.
        id: String,
    },
    /// A resource.
    Resource {
        /// Node name.
        id: String,
        /// Total instances.
        #[serde(default = "default_instances")]
        instances: i64,
        /// Available instances; derived from allocations when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        available: Option<i64>,
    },
}

impl NodeEntry {
    /// The node name.
    pub fn id(&self) -> &str {
        match self {
            NodeEntry::Process { id } | NodeEntry::Resource { id, .. } => id,
        }
    }
}

/// Edge type as written in files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Resource → process.
    Allocation,
    /// Process → resource.
    Request,
}

impl From<EdgeType> for EdgeKind {
    fn from(t: EdgeType) -> Self {
        match t {
            EdgeType::Allocation => EdgeKind::Allocation,
            EdgeType::Request => EdgeKind::Request,
        }
    }
}

impl From<EdgeKind> for EdgeType {
    fn from(k: EdgeKind) -> Self {
        match k {
            EdgeKind::Allocation => EdgeType::Allocation,
            EdgeKind::Request => EdgeType::Request,
        }
    }
}

/// One edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeEntry {
    /// Source node name.
    pub source: String,
    /// Target node name.
    pub target: String,
    /// Allocation or request.
    #[serde(rename = "type")]
    pub kind: EdgeType,
    /// Instance count.
    #[serde(default = "default_instances")]
    pub instances: i64,
}

fn default_instances() -> i64 {
    1
}

impl SnapshotFile {
    /// Captures a graph and its layout.
    pub fn from_state(graph: &ResourceGraph, layout: &Layout) -> Self {
        let (nodes, edges) = graph.to_records();
        let nodes = nodes
            .into_iter()
            .map(|record| match record {
                NodeRecord::Process { name } => NodeEntry::Process { id: name },
                NodeRecord::Resource {
                    name,
                    total,
                    available,
                } => NodeEntry::Resource {
                    id: name,
                    instances: total,
                    available: Some(available),
                },
            })
            .collect();
        let edges = edges
            .into_iter()
            .map(|record| EdgeEntry {
                source: record.source,
                target: record.target,
                kind: record.kind.into(),
                instances: record.instances,
            })
            .collect();
        let positions = layout
            .iter()
            .map(|(name, pos)| (name.to_string(), [pos.x, pos.y]))
            .collect();
        Self {
            graph: GraphData { nodes, edges },
            positions,
        }
    }

    /// Validates the document and builds the graph and layout.
    ///
    /// Positions naming nodes that do not exist are dropped with a warning.
    pub fn to_state(&self) -> Result<(ResourceGraph, Layout), ConfigError> {
        let nodes: Vec<NodeRecord> = self
            .graph
            .nodes
            .iter()
            .map(|entry| match entry {
                NodeEntry::Process { id } => NodeRecord::process(id),
                NodeEntry::Resource {
                    id,
                    instances,
                    available,
                } => {
                    let available = available
                        .unwrap_or_else(|| instances.saturating_sub(self.allocated(id)));
                    NodeRecord::resource(id, *instances, available)
                }
            })
            .collect();
        let edges: Vec<EdgeRecord> = self
            .graph
            .edges
            .iter()
            .map(|e| EdgeRecord::new(&e.source, &e.target, e.kind.into(), e.instances))
            .collect();

        let graph = ResourceGraph::from_records(&nodes, &edges)?;

        let mut layout = Layout::new();
        for (name, [x, y]) in &self.positions {
            if graph.contains(name) {
                layout.set(name, Position::new(*x, *y));
            } else {
                tracing::warn!(node = %name, "dropping position for unknown node");
            }
        }
        Ok((graph, layout))
    }

    /// Parses a snapshot from JSON text.
    ///
    /// Syntax and shape errors are reported as
    /// [`RagError::InvalidFormat`](ragsim_core::RagError::InvalidFormat).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::invalid_format(e.to_string()))
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::JsonSerialize)
    }

    /// Loads a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let snapshot = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            nodes = snapshot.graph.nodes.len(),
            edges = snapshot.graph.edges.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Writes the snapshot to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn allocated(&self, resource: &str) -> i64 {
        self.graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeType::Allocation && e.source == resource)
            .fold(0i64, |acc, e| acc.saturating_add(e.instances))
    }
}

/// Reads a snapshot file straight into a graph and layout.
pub fn load_state(path: impl AsRef<Path>) -> Result<(ResourceGraph, Layout), ConfigError> {
    SnapshotFile::load(path)?.to_state()
}

/// Writes a graph and layout to a snapshot file.
pub fn save_state(
    path: impl AsRef<Path>,
    graph: &ResourceGraph,
    layout: &Layout,
) -> Result<(), ConfigError> {
    SnapshotFile::from_state(graph, layout).save(path)
}
