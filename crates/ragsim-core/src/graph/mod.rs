//! Resource-allocation graph for the ragsim deadlock simulator.
//!
//! The graph is bipartite: [`NodeKind::Process`] nodes request and hold
//! instances of [`NodeKind::Resource`] nodes. Edges are typed by
//! [`EdgeKind`] and always join one process and one resource.
//!
//! # Storage
//!
//! Nodes and edges live in slot vectors indexed by [`NodeId`] / [`EdgeId`].
//! Node slots are never reused, so `NodeId` order is node creation order,
//! which is what fairness tie-breaks rely on. Freed edge slots are reused.
//!
//! # Example
//!
//! ```rust
//! use ragsim_core::graph::{EdgeKind, ResourceGraph};
//!
//! let mut graph = ResourceGraph::new();
//! graph.add_process("P1")?;
//! graph.add_resource("R1", 2)?;
//! graph.request("P1", "R1", 1)?;
//!
//! assert!(graph.has_edge("R1", "P1", EdgeKind::Allocation));
//! assert_eq!(graph.available("R1"), Some(1));
//! # Ok::<(), ragsim_core::RagError>(())
//! ```

pub mod edge;
mod model;
pub mod node;
pub mod record;

pub use edge::{EdgeId, EdgeKind, EdgeRef};
pub use model::ResourceGraph;
pub use node::{NodeId, NodeKind, NodeRef};
pub use record::{EdgeRecord, NodeRecord};
