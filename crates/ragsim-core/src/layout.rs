//! Node positions for display.
//!
//! Positions never affect analysis. They ride along in snapshots so that
//! undo restores the drawing as well as the graph.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::graph::ResourceGraph;

/// Distance kept between the automatic layout and the canvas border.
pub const LAYOUT_MARGIN: f64 = 50.0;

/// A point on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drawing area used by the automatic layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    /// Width in canvas units.
    pub width: f64,
    /// Height in canvas units.
    pub height: f64,
}

impl Canvas {
    /// Creates a canvas of the given size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center point.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Map from node name to position.
///
/// Equality is exact on coordinates; two layouts produced by the same
/// sequence of operations compare equal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<String, Position>,
}

impl Layout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places every node of `graph` on an ellipse inside `canvas`, in node
    /// creation order, starting at the top and going clockwise.
    pub fn auto(graph: &ResourceGraph, canvas: Canvas) -> Self {
        let names: Vec<&str> = graph.nodes().map(|n| n.name).collect();
        let center = canvas.center();
        let rx = (canvas.width / 2.0 - LAYOUT_MARGIN).max(0.0);
        let ry = (canvas.height / 2.0 - LAYOUT_MARGIN).max(0.0);

        let count = names.len();
        let positions = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                #[allow(clippy::cast_precision_loss)]
                let angle = TAU * i as f64 / count as f64 - TAU / 4.0;
                let pos = if count == 1 {
                    center
                } else {
                    Position::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
                };
                (name.to_string(), pos)
            })
            .collect();
        Self { positions }
    }

    /// Position of `name`, if placed.
    pub fn get(&self, name: &str) -> Option<Position> {
        self.positions.get(name).copied()
    }

    /// Places (or moves) `name`.
    pub fn set(&mut self, name: &str, pos: Position) {
        self.positions.insert(name.to_string(), pos);
    }

    /// Forgets `name`. Returns its old position.
    pub fn remove(&mut self, name: &str) -> Option<Position> {
        self.positions.remove(name)
    }

    /// Moves the position stored under `old` to `new`.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(pos) = self.positions.remove(old) {
            self.positions.insert(new.to_string(), pos);
        }
    }

    /// Iterates positions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` when nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Keeps only the positions for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.positions.retain(|name, _| keep(name));
    }

    /// Gives every node of `graph` without a position the spot the
    /// automatic layout would choose for it.
    pub fn fill_missing(&mut self, graph: &ResourceGraph, canvas: Canvas) {
        if graph.nodes().all(|n| self.positions.contains_key(n.name)) {
            return;
        }
        let auto = Self::auto(graph, canvas);
        for (name, pos) in auto.positions {
            self.positions.entry(name).or_insert(pos);
        }
    }

    /// Drops positions of nodes that no longer exist.
    pub fn prune(&mut self, graph: &ResourceGraph) {
        self.retain(|name| graph.contains(name));
    }
}
