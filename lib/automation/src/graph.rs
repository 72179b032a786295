//! The canvas graph: the `{nodes, edges}` document an automation is made of.
//!
//! This is the exact structure persisted as an automation's `canvas_data`
//! blob. The store keeps nodes in creation order, which is what gives new
//! nodes their stacked vertical placement. UI-transient state (selection,
//! dirty flag) never lives here and is never serialized.

use crate::edge::Edge;
use crate::node::{Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// An automation graph: nodes plus the directed edges connecting them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasGraph {
    /// Nodes in creation order.
    pub nodes: Vec<Node>,
    /// Directed edges.
    pub edges: Vec<Edge>,
}

impl CanvasGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns a reference to a node by its ID.
    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// Returns a mutable reference to a node by its ID.
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    /// Returns true when a node with the given ID exists.
    #[must_use]
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// Returns the trigger node.
    ///
    /// A well-formed canvas has exactly one; `None` only occurs for an
    /// unseeded (empty) graph.
    #[must_use]
    pub fn trigger(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind() == NodeKind::Trigger)
    }

    /// Returns the edges leaving a node.
    pub fn outgoing(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Returns the edges entering a node.
    pub fn incoming(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Removes a node and every edge touching it.
    ///
    /// Returns the removed node, or `None` if the ID is unknown.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == node_id)?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| !e.touches(node_id));
        Some(node)
    }

    /// Returns the lowest (largest `y`) node position, if any nodes exist.
    #[must_use]
    pub fn max_y(&self) -> Option<f64> {
        self.nodes
            .iter()
            .map(|n| n.position.y)
            .fold(None, |acc, y| Some(acc.map_or(y, |m: f64| m.max(y))))
    }

    /// Serializes the graph into the `{nodes, edges}` JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Reconstructs a graph from a persisted `{nodes, edges}` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match the canvas schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::SourceHandle;
    use crate::node::{
        ActionNodeConfig, DelayNodeConfig, DelayUnit, NodeConfig, Position, TriggerEvent,
        TriggerNodeConfig,
    };

    fn trigger_node() -> Node {
        Node::new(
            NodeConfig::Trigger(TriggerNodeConfig::new(TriggerEvent::PurchaseCompleted)),
            Position::new(400.0, 80.0),
        )
    }

    fn tag_node(y: f64) -> Node {
        Node::new(
            NodeConfig::Action(ActionNodeConfig::AddTag {
                tag: "customer".to_string(),
            }),
            Position::new(400.0, y),
        )
    }

    #[test]
    fn node_lookup() {
        let mut graph = CanvasGraph::new();
        let node = trigger_node();
        let id = node.id;
        graph.nodes.push(node);

        assert!(graph.contains_node(id));
        assert_eq!(graph.trigger().map(|n| n.id), Some(id));
        assert!(!graph.contains_node(NodeId::new()));
    }

    #[test]
    fn remove_node_cascades_edges() {
        let mut graph = CanvasGraph::new();
        let trigger = trigger_node();
        let action = tag_node(230.0);
        let delay = Node::new(
            NodeConfig::Delay(DelayNodeConfig::new(1, DelayUnit::Days)),
            Position::new(400.0, 380.0),
        );
        let (t, a, d) = (trigger.id, action.id, delay.id);
        graph.nodes.extend([trigger, action, delay]);
        graph.edges.push(Edge::new(t, a, SourceHandle::Output));
        graph.edges.push(Edge::new(a, d, SourceHandle::Output));

        let removed = graph.remove_node(a);
        assert!(removed.is_some());
        assert_eq!(graph.node_count(), 2);
        // Both edges referenced the action node; nothing else is touched.
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_unknown_node_is_none() {
        let mut graph = CanvasGraph::new();
        graph.nodes.push(trigger_node());
        assert!(graph.remove_node(NodeId::new()).is_none());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn max_y_tracks_lowest_node() {
        let mut graph = CanvasGraph::new();
        assert_eq!(graph.max_y(), None);
        graph.nodes.push(trigger_node());
        graph.nodes.push(tag_node(230.0));
        assert_eq!(graph.max_y(), Some(230.0));
    }

    #[test]
    fn canvas_document_roundtrip() {
        let mut graph = CanvasGraph::new();
        let trigger = trigger_node();
        let action = tag_node(230.0);
        let (t, a) = (trigger.id, action.id);
        graph.nodes.extend([trigger, action]);
        graph.edges.push(Edge::new(t, a, SourceHandle::Yes));

        let value = graph.to_value().expect("serialize");
        assert!(value.get("nodes").is_some());
        assert!(value.get("edges").is_some());

        let parsed = CanvasGraph::from_value(value).expect("deserialize");
        assert_eq!(parsed, graph);
    }

    #[test]
    fn from_value_rejects_foreign_document() {
        let result = CanvasGraph::from_value(serde_json::json!({"nodes": 3}));
        assert!(result.is_err());
    }
}
