//! Structural validation for the automation canvas.
//!
//! Two checks exist, and deliberately no more:
//!
//! - [`validate_connection`] gates every edge before it is added.
//! - [`check_saveable`] is the single cross-node precondition applied at
//!   save time.
//!
//! The validator does not detect cycles among non-trigger nodes and does not
//! limit fan-in or fan-out. Graphs are interpreted by a server-side engine
//! that tolerates both; [`crate::analysis`] reports them as diagnostics
//! without rejecting anything.

use crate::error::{ConnectionError, SaveError};
use crate::graph::CanvasGraph;
use crate::node::{NodeId, NodeKind};

/// Validates a candidate edge against the current node set.
///
/// Rules, in order:
/// 1. Both `source` and `target` must resolve to existing nodes.
/// 2. The target must not be a trigger node (triggers are graph roots).
/// 3. No self-loop.
///
/// # Errors
///
/// Returns the first rule the candidate violates.
pub fn validate_connection(
    source: NodeId,
    target: NodeId,
    graph: &CanvasGraph,
) -> Result<(), ConnectionError> {
    if !graph.contains_node(source) {
        return Err(ConnectionError::UnknownSource { node_id: source });
    }

    let target_node = graph
        .node(target)
        .ok_or(ConnectionError::UnknownTarget { node_id: target })?;

    if target_node.kind() == NodeKind::Trigger {
        return Err(ConnectionError::TriggerTarget { node_id: target });
    }

    if source == target {
        return Err(ConnectionError::SelfLoop { node_id: source });
    }

    Ok(())
}

/// Checks the save precondition: with more than one node on the canvas, the
/// trigger must be connected to at least one downstream step.
///
/// # Errors
///
/// Returns `SaveError::TriggerUnconnected` when the precondition fails; the
/// caller refuses the save without issuing a persistence call.
pub fn check_saveable(graph: &CanvasGraph) -> Result<(), SaveError> {
    if graph.node_count() <= 1 {
        return Ok(());
    }

    match graph.trigger() {
        Some(trigger) if graph.outgoing(trigger.id).next().is_some() => Ok(()),
        _ => Err(SaveError::TriggerUnconnected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Edge, SourceHandle};
    use crate::node::{
        ActionNodeConfig, ConditionNodeConfig, ConditionOperator, Node, NodeConfig, Position,
        TriggerEvent, TriggerNodeConfig,
    };

    fn graph_with_trigger_and_action() -> (CanvasGraph, NodeId, NodeId) {
        let mut graph = CanvasGraph::new();
        let trigger = Node::new(
            NodeConfig::Trigger(TriggerNodeConfig::new(TriggerEvent::OptInSubmitted)),
            Position::new(400.0, 80.0),
        );
        let action = Node::new(
            NodeConfig::Action(ActionNodeConfig::SendWhatsapp {
                message: "Hi {{contact.first_name}}!".to_string(),
            }),
            Position::new(400.0, 230.0),
        );
        let (t, a) = (trigger.id, action.id);
        graph.nodes.extend([trigger, action]);
        (graph, t, a)
    }

    #[test]
    fn accepts_trigger_to_action() {
        let (graph, t, a) = graph_with_trigger_and_action();
        assert!(validate_connection(t, a, &graph).is_ok());
    }

    #[test]
    fn rejects_unknown_source() {
        let (graph, _, a) = graph_with_trigger_and_action();
        let ghost = NodeId::new();
        assert_eq!(
            validate_connection(ghost, a, &graph),
            Err(ConnectionError::UnknownSource { node_id: ghost })
        );
    }

    #[test]
    fn rejects_unknown_target() {
        let (graph, t, _) = graph_with_trigger_and_action();
        let ghost = NodeId::new();
        assert_eq!(
            validate_connection(t, ghost, &graph),
            Err(ConnectionError::UnknownTarget { node_id: ghost })
        );
    }

    #[test]
    fn rejects_edge_into_trigger() {
        let (graph, t, a) = graph_with_trigger_and_action();
        assert_eq!(
            validate_connection(a, t, &graph),
            Err(ConnectionError::TriggerTarget { node_id: t })
        );
    }

    #[test]
    fn rejects_self_loop() {
        let (graph, _, a) = graph_with_trigger_and_action();
        assert_eq!(
            validate_connection(a, a, &graph),
            Err(ConnectionError::SelfLoop { node_id: a })
        );
    }

    #[test]
    fn cycles_between_non_trigger_nodes_are_not_rejected() {
        let (mut graph, _, a) = graph_with_trigger_and_action();
        let condition = Node::new(
            NodeConfig::Condition(ConditionNodeConfig {
                field: "order.total".to_string(),
                operator: ConditionOperator::GreaterThan,
                value: "100".to_string(),
            }),
            Position::new(400.0, 380.0),
        );
        let c = condition.id;
        graph.nodes.push(condition);
        graph.edges.push(Edge::new(a, c, SourceHandle::Output));

        // The closing edge of the cycle is still structurally valid.
        assert!(validate_connection(c, a, &graph).is_ok());
    }

    #[test]
    fn single_node_graph_is_saveable() {
        let mut graph = CanvasGraph::new();
        graph.nodes.push(Node::new(
            NodeConfig::Trigger(TriggerNodeConfig::new(TriggerEvent::PageView)),
            Position::new(400.0, 80.0),
        ));
        assert!(check_saveable(&graph).is_ok());
    }

    #[test]
    fn unconnected_trigger_blocks_save() {
        let (graph, _, _) = graph_with_trigger_and_action();
        assert_eq!(check_saveable(&graph), Err(SaveError::TriggerUnconnected));
    }

    #[test]
    fn connected_trigger_allows_save() {
        let (mut graph, t, a) = graph_with_trigger_and_action();
        graph.edges.push(Edge::new(t, a, SourceHandle::Output));
        assert!(check_saveable(&graph).is_ok());
    }
}
