//! Error type shared by every core operation.
//!
//! All variants are recoverable. An operation that returns an error has made
//! no change to the graph or the history.

use thiserror::Error;

/// Errors returned by graph mutations, allocation transitions, snapshot
/// import, and undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RagError {
    /// A process or resource with this name already exists.
    #[error("a node named '{0}' already exists")]
    DuplicateName(String),

    /// The named node (or request) does not exist, or has the wrong kind.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What was looked up (`"node"`, `"process"`, `"resource"`, `"request"`).
        kind: &'static str,
        /// The name that was looked up.
        name: String,
    },

    /// An instance count is outside its permitted range.
    #[error("invalid count {value}: {reason}")]
    InvalidCount {
        /// The rejected count.
        value: u32,
        /// Why the count was rejected.
        reason: String,
    },

    /// The process already has a pending request on this resource.
    #[error("process '{process}' already has a pending request for '{resource}'")]
    DuplicateRequest {
        /// Requesting process.
        process: String,
        /// Requested resource.
        resource: String,
    },

    /// The process holds no instances of this resource.
    #[error("process '{process}' holds no allocation of '{resource}'")]
    NoAllocation {
        /// Releasing process.
        process: String,
        /// Resource being released.
        resource: String,
    },

    /// A node position has a NaN or infinite coordinate.
    #[error("invalid position for '{name}': {reason}")]
    InvalidPosition {
        /// Node being placed.
        name: String,
        /// Why the position was rejected.
        reason: String,
    },

    /// Imported graph data violates a structural invariant.
    #[error("invalid snapshot format: {0}")]
    InvalidFormat(String),

    /// The undo stack holds only the initial state.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,
}

impl RagError {
    /// Create a not-found error for any node.
    pub fn node_not_found(name: impl Into<String>) -> Self {
        RagError::NotFound {
            kind: "node",
            name: name.into(),
        }
    }

    /// Create a not-found error for a missing (or non-) process.
    pub fn process_not_found(name: impl Into<String>) -> Self {
        RagError::NotFound {
            kind: "process",
            name: name.into(),
        }
    }

    /// Create a not-found error for a missing (or non-) resource.
    pub fn resource_not_found(name: impl Into<String>) -> Self {
        RagError::NotFound {
            kind: "resource",
            name: name.into(),
        }
    }

    /// Create an invalid-count error.
    pub fn invalid_count(value: u32, reason: impl Into<String>) -> Self {
        RagError::InvalidCount {
            value,
            reason: reason.into(),
        }
    }

    /// Create an invalid-position error.
    pub fn invalid_position(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RagError::InvalidPosition {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-format error.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        RagError::InvalidFormat(reason.into())
    }
}
