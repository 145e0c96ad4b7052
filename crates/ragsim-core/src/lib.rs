//! ragsim Core - resource-allocation graph simulation
//!
//! This crate models processes that hold and request multi-instance
//! resources, and answers the question "is this state deadlocked?".
//!
//! # Core Abstractions
//!
//! ## Graph
//!
//! - [`ResourceGraph`] - Bipartite process/resource graph with typed edges
//! - [`NodeKind`] / [`EdgeKind`] - Closed node and edge variants
//!
//! ## Allocation
//!
//! - [`ResourceGraph::request`] - Allocate now or queue a request edge
//! - [`ResourceGraph::release`] - Return instances, promoting one waiter
//! - [`ResourceGraph::cancel_request`] - Withdraw a pending request
//!
//! ## Analysis
//!
//! - [`detect_deadlock`] - Wait-for cycles plus a Banker-style safety check
//! - [`Verdict`] - [`SafeSequence`] or [`DeadlockReport`]
//!
//! ## Editing
//!
//! - [`Session`] - Graph, [`Layout`] and [`History`] kept in step for a front-end
//! - [`History`] - Undo/redo over immutable [`Snapshot`]s
//!
//! # Example
//!
//! ```rust
//! use ragsim_core::{Session, Verdict};
//!
//! let mut session = Session::new();
//! session.add_process("P1")?;
//! session.add_process("P2")?;
//! session.add_resource("R1", 1)?;
//! session.request("P1", "R1", 1)?;
//! session.request("P2", "R1", 1)?;
//!
//! match session.detect_deadlock().verdict {
//!     Verdict::NoDeadlock(seq) => assert_eq!(seq.order, ["P1", "P2"]),
//!     Verdict::Deadlock(_) => unreachable!(),
//! }
//! # Ok::<(), ragsim_core::RagError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `tracing` - emit `tracing::debug!` events for every mutation and analysis

pub mod allocation;
pub mod analysis;
pub mod error;
pub mod graph;
pub mod history;
pub mod layout;
pub mod session;

pub use allocation::{Promotion, ReleaseOutcome, RequestOutcome};
pub use analysis::{
    DeadlockAnalysis, DeadlockReport, ExecutionEvent, HighlightedEdge, SafeSequence, Verdict,
    WaitForGraph, detect_deadlock,
};
pub use error::RagError;
pub use graph::{
    EdgeId, EdgeKind, EdgeRecord, EdgeRef, NodeId, NodeKind, NodeRecord, NodeRef, ResourceGraph,
};
pub use history::{History, Snapshot};
pub use layout::{Canvas, LAYOUT_MARGIN, Layout, Position};
pub use session::{DEFAULT_HISTORY_LIMIT, Session};
