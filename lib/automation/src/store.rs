//! The graph store: authoritative in-session node and edge lists.
//!
//! The store owns the [`CanvasGraph`] for one editing session and applies
//! every mutation the UI requests. It also owns the session's dirty flag:
//! `clean -> dirty` on any accepted mutation, `dirty -> clean` only when a
//! save succeeds. Rendering, selection, and notices live a layer up in
//! [`crate::session`].

use crate::config::LayoutConfig;
use crate::edge::{Edge, EdgeId, SourceHandle};
use crate::error::ConnectionError;
use crate::graph::CanvasGraph;
use crate::node::{Node, NodeConfig, NodeId, Position, TriggerEvent};
use crate::preset::{self, NodePreset};
use crate::validate::validate_connection;

/// Result of a node deletion request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The node and every edge touching it were removed.
    Deleted(Node),
    /// The node is the trigger; deletion is forbidden and nothing changed.
    TriggerProtected,
    /// No node with the given ID exists; nothing changed.
    NotFound,
}

/// The authoritative graph state for one editing session.
#[derive(Debug, Clone)]
pub struct CanvasStore {
    graph: CanvasGraph,
    layout: LayoutConfig,
    dirty: bool,
}

impl CanvasStore {
    /// Wraps an existing graph (loaded from persisted canvas data).
    #[must_use]
    pub fn new(graph: CanvasGraph, layout: LayoutConfig) -> Self {
        Self {
            graph,
            layout,
            dirty: false,
        }
    }

    /// Creates a store seeded with the default single-trigger graph.
    #[must_use]
    pub fn seeded(event: TriggerEvent, layout: LayoutConfig) -> Self {
        let graph = preset::seed_graph(event, &layout);
        Self::new(graph, layout)
    }

    /// The current graph.
    #[must_use]
    pub fn graph(&self) -> &CanvasGraph {
        &self.graph
    }

    /// Whether unsaved changes exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Sets the dirty flag for a mutation applied outside the store (for
    /// example renaming the automation in the editor header).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Adds a node from a palette preset and returns its ID.
    ///
    /// The node is placed below the current lowest node, horizontally
    /// jittered around the center line so stacked nodes stay visible. Always
    /// succeeds. A trigger preset never produces a second trigger: the
    /// existing trigger's ID is returned unchanged.
    pub fn add_node(&mut self, preset: &NodePreset) -> NodeId {
        if preset.config.is_trigger() {
            if let Some(trigger) = self.graph.trigger() {
                return trigger.id;
            }
        }

        let y = self
            .graph
            .max_y()
            .map_or(self.layout.top_margin, |max| max + self.layout.vertical_gap);
        let node_id = NodeId::new();
        let x = self.layout.center_x + jitter(node_id, self.layout.horizontal_jitter);
        let node = Node::with_id(node_id, preset.config.clone(), Position::new(x, y));

        tracing::debug!(node_id = %node_id, kind = ?node.kind(), "node added");
        self.graph.nodes.push(node);
        self.dirty = true;
        node_id
    }

    /// Replaces a node's configuration.
    ///
    /// Returns true when applied; unknown IDs are a no-op.
    pub fn update_node_config(&mut self, node_id: NodeId, config: NodeConfig) -> bool {
        let Some(node) = self.graph.node_mut(node_id) else {
            return false;
        };
        node.config = config;
        self.dirty = true;
        true
    }

    /// Deletes a node, cascading removal of every edge touching it.
    ///
    /// The trigger node is protected: the request is refused and the graph
    /// is left unchanged.
    pub fn delete_node(&mut self, node_id: NodeId) -> DeleteOutcome {
        let is_trigger = match self.graph.node(node_id) {
            None => return DeleteOutcome::NotFound,
            Some(node) => node.is_trigger(),
        };
        if is_trigger {
            tracing::debug!(node_id = %node_id, "trigger deletion refused");
            return DeleteOutcome::TriggerProtected;
        }

        match self.graph.remove_node(node_id) {
            Some(node) => {
                tracing::debug!(node_id = %node_id, "node deleted");
                self.dirty = true;
                DeleteOutcome::Deleted(node)
            }
            None => DeleteOutcome::NotFound,
        }
    }

    /// Moves a node during a drag gesture.
    ///
    /// Called on intermediate frames; does not mark the graph dirty so a
    /// drag in progress does not flood the dirty flag.
    pub fn drag_node(&mut self, node_id: NodeId, position: Position) {
        if let Some(node) = self.graph.node_mut(node_id) {
            node.position = position;
        }
    }

    /// Commits a node's final position when the drag gesture completes.
    pub fn finish_drag(&mut self, node_id: NodeId, position: Position) {
        if let Some(node) = self.graph.node_mut(node_id) {
            node.position = position;
            self.dirty = true;
        }
    }

    /// Connects two nodes, gated by the connection validator.
    ///
    /// On acceptance, appends exactly one edge styled from the handle and
    /// marks the graph dirty.
    ///
    /// # Errors
    ///
    /// Returns the validator's rejection; the edge set is unchanged.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        handle: SourceHandle,
    ) -> Result<EdgeId, ConnectionError> {
        if let Err(err) = validate_connection(source, target, &self.graph) {
            tracing::debug!(source = %source, target = %target, error = %err, "connection rejected");
            return Err(err);
        }

        let edge = Edge::new(source, target, handle);
        let edge_id = edge.id;
        self.graph.edges.push(edge);
        self.dirty = true;
        Ok(edge_id)
    }
}

/// Deterministic horizontal offset in `[-max, max]`, derived from the node
/// ID's random bits so placement is reproducible for a given node.
fn jitter(node_id: NodeId, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let span = (max as u128) * 2 + 1;
    (node_id.as_ulid().random() % span) as f64 - max
}
