//! Editing session: graph, layout and history kept in step.
//!
//! [`Session`] is what a front-end drives. Each mutating method validates and
//! applies the change through [`ResourceGraph`], keeps the [`Layout`] in sync,
//! and then records a snapshot, so the top of the undo stack always mirrors
//! the current state. A failed operation changes nothing.

use crate::allocation::{ReleaseOutcome, RequestOutcome};
use crate::analysis::{DeadlockAnalysis, detect_deadlock};
use crate::error::RagError;
use crate::graph::{NodeKind, ResourceGraph};
use crate::history::{History, Snapshot};
use crate::layout::{Canvas, Layout, Position};

/// Default undo depth.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// One user's editing session.
#[derive(Clone, Debug)]
pub struct Session {
    graph: ResourceGraph,
    layout: Layout,
    history: History,
    canvas: Canvas,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session with the default canvas and history limit.
    pub fn new() -> Self {
        Self::with_settings(Canvas::default(), DEFAULT_HISTORY_LIMIT)
    }

    /// Empty session with an explicit canvas and history limit (0 = unlimited).
    pub fn with_settings(canvas: Canvas, history_limit: usize) -> Self {
        let graph = ResourceGraph::new();
        let layout = Layout::new();
        let history = History::new(Snapshot::new(&graph, &layout, "Initial state"), history_limit);
        Self {
            graph,
            layout,
            history,
            canvas,
        }
    }

    // --- Accessors ---

    /// Current graph.
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Undo/redo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Canvas used for automatic placement.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    // --- Graph edits ---

    /// Adds a process and places it.
    pub fn add_process(&mut self, name: &str) -> Result<(), RagError> {
        self.graph.add_process(name)?;
        self.place_new(name);
        self.commit(format!("Added process {name}"));
        Ok(())
    }

    /// Adds a resource with `total` instances and places it.
    pub fn add_resource(&mut self, name: &str, total: u32) -> Result<(), RagError> {
        self.graph.add_resource(name, total)?;
        self.place_new(name);
        self.commit(format!("Added resource {name} ({total} instances)"));
        Ok(())
    }

    /// Removes a node, its edges and its position.
    pub fn remove_node(&mut self, name: &str) -> Result<NodeKind, RagError> {
        let kind = self.graph.remove_node(name)?;
        self.layout.remove(name);
        self.commit(format!("Removed {} {name}", kind.label()));
        Ok(kind)
    }

    /// Renames a node; its position follows.
    pub fn rename_node(&mut self, old: &str, new: &str) -> Result<(), RagError> {
        self.graph.rename_node(old, new)?;
        self.layout.rename(old, new);
        self.commit(format!("Renamed {old} to {new}"));
        Ok(())
    }

    /// Changes a resource's total instance count.
    pub fn set_resource_capacity(&mut self, name: &str, total: u32) -> Result<(), RagError> {
        self.graph.set_resource_capacity(name, total)?;
        self.commit(format!("Set {name} capacity to {total}"));
        Ok(())
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.layout = Layout::new();
        self.commit("Cleared graph");
    }

    // --- Allocation ---

    /// Requests `amount` instances of `resource` for `process`.
    pub fn request(
        &mut self,
        process: &str,
        resource: &str,
        amount: u32,
    ) -> Result<RequestOutcome, RagError> {
        let outcome = self.graph.request(process, resource, amount)?;
        self.commit(format!("Request {amount} {resource} by {process}"));
        Ok(outcome)
    }

    /// Releases `amount` held instances, possibly promoting a waiter.
    pub fn release(
        &mut self,
        process: &str,
        resource: &str,
        amount: u32,
    ) -> Result<ReleaseOutcome, RagError> {
        let outcome = self.graph.release(process, resource, amount)?;
        self.commit(format!("Release {amount} {resource} by {process}"));
        Ok(outcome)
    }

    /// Withdraws a pending request. Returns the amount that was requested.
    pub fn cancel_request(&mut self, process: &str, resource: &str) -> Result<u32, RagError> {
        let amount = self.graph.cancel_request(process, resource)?;
        self.commit(format!("Cancel request {resource} by {process}"));
        Ok(amount)
    }

    // --- Layout ---

    /// Moves a node on the canvas. Both coordinates must be finite.
    pub fn move_node(&mut self, name: &str, pos: Position) -> Result<(), RagError> {
        if !self.graph.contains(name) {
            return Err(RagError::node_not_found(name));
        }
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return Err(RagError::invalid_position(
                name,
                format!("coordinates must be finite, got ({}, {})", pos.x, pos.y),
            ));
        }
        self.layout.set(name, pos);
        self.commit(format!("Moved {name}"));
        Ok(())
    }

    /// Re-places every node on the automatic ellipse.
    pub fn auto_layout(&mut self) {
        self.layout = Layout::auto(&self.graph, self.canvas);
        self.commit("Auto layout");
    }

    // --- Whole-state operations ---

    /// Replaces the session state with a loaded graph and layout.
    ///
    /// Positions for unknown nodes are dropped; nodes without one are placed
    /// automatically.
    pub fn load(&mut self, graph: ResourceGraph, mut layout: Layout) {
        layout.prune(&graph);
        layout.fill_missing(&graph, self.canvas);
        self.graph = graph;
        self.layout = layout;
        self.commit("Loaded graph");
    }

    /// Returns to a snapshot's state, for example one picked from the
    /// history list. This is recorded as a new entry, so it can be undone.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.apply(snapshot);
        self.commit(format!("Restored: {}", snapshot.description()));
    }

    /// Steps back one history entry. Returns the description of the entry
    /// that was undone.
    pub fn undo(&mut self) -> Result<&str, RagError> {
        let snapshot = self.history.undo()?.clone();
        self.apply(&snapshot);
        let undone = self
            .history
            .redo_entries()
            .last()
            .map_or("", Snapshot::description);
        #[cfg(feature = "tracing")]
        tracing::debug!(undone, "session_undo");
        Ok(undone)
    }

    /// Re-applies the last undone entry and returns its description.
    pub fn redo(&mut self) -> Result<&str, RagError> {
        let snapshot = self.history.redo()?.clone();
        self.apply(&snapshot);
        Ok(self.history.current().description())
    }

    /// Runs deadlock analysis on the current graph.
    pub fn detect_deadlock(&self) -> DeadlockAnalysis {
        detect_deadlock(&self.graph)
    }

    /// Copies a snapshot's state in without recording it.
    fn apply(&mut self, snapshot: &Snapshot) {
        self.graph = snapshot.graph().clone();
        self.layout = snapshot.layout().clone();
    }

    fn place_new(&mut self, name: &str) {
        let auto = Layout::auto(&self.graph, self.canvas);
        if let Some(pos) = auto.get(name) {
            self.layout.set(name, pos);
        }
    }

    fn commit(&mut self, description: impl Into<String>) {
        self.history.snapshot(&self.graph, &self.layout, description);
    }
}
