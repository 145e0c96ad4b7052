//! Undo/redo history of immutable snapshots.
//!
//! The undo stack always holds at least one entry: the initial state. Its
//! top is the state the caller currently shows. `undo` moves the top onto
//! the redo stack and exposes the entry beneath; `redo` moves it back.

use crate::error::RagError;
use crate::graph::ResourceGraph;
use crate::layout::Layout;

/// Deep copy of the graph and layout at one point in time.
#[derive(Clone, Debug)]
pub struct Snapshot {
    graph: ResourceGraph,
    layout: Layout,
    description: String,
}

impl Snapshot {
    /// Captures `graph` and `layout`.
    pub fn new(graph: &ResourceGraph, layout: &Layout, description: impl Into<String>) -> Self {
        Self {
            graph: graph.clone(),
            layout: layout.clone(),
            description: description.into(),
        }
    }

    /// The captured graph.
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// The captured layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// What produced this state, e.g. `"Added process P1"`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if graph and layout match; descriptions are ignored.
    pub fn same_state(&self, graph: &ResourceGraph, layout: &Layout) -> bool {
        self.graph == *graph && self.layout == *layout
    }
}

/// Undo and redo stacks.
#[derive(Clone, Debug)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl History {
    /// Starts a history at `initial`. A `limit` of 0 keeps every entry;
    /// otherwise the oldest entries after `initial` are evicted beyond
    /// `limit`. The initial entry and the current top always survive, so a
    /// limit below 2 behaves like 2.
    pub fn new(initial: Snapshot, limit: usize) -> Self {
        Self {
            undo: vec![initial],
            redo: Vec::new(),
            limit,
        }
    }

    /// Records the state unless it equals the current top.
    ///
    /// Recording clears the redo stack. Returns `true` if an entry was added.
    pub fn snapshot(
        &mut self,
        graph: &ResourceGraph,
        layout: &Layout,
        description: impl Into<String>,
    ) -> bool {
        if self.current().same_state(graph, layout) {
            return false;
        }
        self.undo.push(Snapshot::new(graph, layout, description));
        self.redo.clear();
        let keep = self.limit.max(2);
        if self.limit > 0 && self.undo.len() > keep {
            let excess = self.undo.len() - keep;
            self.undo.drain(1..=excess);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            description = self.current().description(),
            depth = self.undo.len(),
            "history_snapshot"
        );
        true
    }

    /// Steps back one entry and returns the state to restore.
    ///
    /// Fails with [`RagError::NothingToUndo`] when only the initial entry is left.
    pub fn undo(&mut self) -> Result<&Snapshot, RagError> {
        if self.undo.len() <= 1 {
            return Err(RagError::NothingToUndo);
        }
        if let Some(top) = self.undo.pop() {
            self.redo.push(top);
        }
        Ok(self.current())
    }

    /// Re-applies the most recently undone entry and returns it.
    ///
    /// Fails with [`RagError::NothingToRedo`] when the redo stack is empty.
    pub fn redo(&mut self) -> Result<&Snapshot, RagError> {
        let entry = self.redo.pop().ok_or(RagError::NothingToRedo)?;
        self.undo.push(entry);
        Ok(self.current())
    }

    /// The entry on top of the undo stack.
    pub fn current(&self) -> &Snapshot {
        self.undo
            .last()
            .expect("undo stack always holds the initial entry")
    }

    /// Returns `true` if [`undo`](Self::undo) would succeed.
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    /// Returns `true` if [`redo`](Self::redo) would succeed.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Entries on the undo stack, including the initial one.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Entries on the redo stack.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo entries, oldest first.
    pub fn entries(&self) -> &[Snapshot] {
        &self.undo
    }

    /// Redo entries, next-to-redo last.
    pub fn redo_entries(&self) -> &[Snapshot] {
        &self.redo
    }

    /// Configured depth limit (0 = unlimited).
    pub fn limit(&self) -> usize {
        self.limit
    }
}
