//! Advisory structural analysis of a canvas graph.
//!
//! The canvas projects into a petgraph directed graph to answer questions a
//! host UI can hint about: which nodes can never run because nothing
//! connects them to the trigger, whether the graph loops, and which node
//! pairs carry parallel edges.
//!
//! Everything here is diagnostic. The connection validator deliberately
//! permits cycles and parallel edges between non-trigger nodes, and this
//! module never rejects an edit or a save.

use crate::graph::CanvasGraph;
use crate::node::NodeId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::HashMap;

/// Diagnostics for one canvas graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasDiagnostics {
    /// Nodes with no path from the trigger (they can never run).
    pub unreachable: Vec<NodeId>,
    /// Whether any directed cycle exists.
    pub cyclic: bool,
    /// Node pairs connected by more than one edge, each pair reported once.
    pub parallel_pairs: Vec<(NodeId, NodeId)>,
}

/// Analyzes a canvas graph.
#[must_use]
pub fn analyze(graph: &CanvasGraph) -> CanvasDiagnostics {
    let (digraph, index_of) = project(graph);

    let mut reached: Vec<bool> = vec![false; digraph.node_count()];
    if let Some(trigger) = graph.trigger() {
        if let Some(&start) = index_of.get(&trigger.id) {
            let mut bfs = Bfs::new(&digraph, start);
            while let Some(index) = bfs.next(&digraph) {
                reached[index.index()] = true;
            }
        }
    }

    let unreachable = digraph
        .node_indices()
        .filter(|index| !reached[index.index()])
        .map(|index| digraph[index])
        .collect();

    let mut edge_counts: HashMap<(NodeId, NodeId), usize> = HashMap::new();
    for edge in &graph.edges {
        *edge_counts.entry((edge.source, edge.target)).or_default() += 1;
    }
    let mut parallel_pairs: Vec<(NodeId, NodeId)> = edge_counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(pair, _)| pair)
        .collect();
    parallel_pairs.sort_by_key(|(source, target)| (source.as_ulid(), target.as_ulid()));

    CanvasDiagnostics {
        unreachable,
        cyclic: petgraph::algo::is_cyclic_directed(&digraph),
        parallel_pairs,
    }
}

/// Returns nodes that have no incoming edges (the trigger, plus any orphaned
/// subgraph roots).
#[must_use]
pub fn entry_nodes(graph: &CanvasGraph) -> Vec<NodeId> {
    let (digraph, _) = project(graph);
    digraph
        .node_indices()
        .filter(|&index| {
            digraph
                .edges_directed(index, Direction::Incoming)
                .next()
                .is_none()
        })
        .map(|index| digraph[index])
        .collect()
}

/// Returns nodes that have no outgoing edges (the ends of each path).
#[must_use]
pub fn terminal_nodes(graph: &CanvasGraph) -> Vec<NodeId> {
    let (digraph, _) = project(graph);
    digraph
        .node_indices()
        .filter(|&index| {
            digraph
                .edges_directed(index, Direction::Outgoing)
                .next()
                .is_none()
        })
        .map(|index| digraph[index])
        .collect()
}

/// Projects the canvas into a petgraph directed graph.
fn project(graph: &CanvasGraph) -> (DiGraph<NodeId, ()>, HashMap<NodeId, NodeIndex>) {
    let mut digraph = DiGraph::new();
    let mut index_of = HashMap::new();

    for node in &graph.nodes {
        let index = digraph.add_node(node.id);
        index_of.insert(node.id, index);
    }
    for edge in &graph.edges {
        if let (Some(&source), Some(&target)) =
            (index_of.get(&edge.source), index_of.get(&edge.target))
        {
            digraph.add_edge(source, target, ());
        }
    }

    (digraph, index_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::edge::SourceHandle;
    use crate::node::TriggerEvent;
    use crate::preset::palette;
    use crate::store::CanvasStore;

    /// trigger -> a -> b, plus an orphaned node c.
    fn chain_with_orphan() -> (CanvasStore, NodeId, NodeId, NodeId) {
        let mut store = CanvasStore::seeded(TriggerEvent::PurchaseCompleted, LayoutConfig::default());
        let preset = palette().into_iter().next().expect("preset");
        let trigger = store.graph().trigger().expect("trigger").id;
        let a = store.add_node(&preset);
        let b = store.add_node(&preset);
        let c = store.add_node(&preset);
        store.connect(trigger, a, SourceHandle::Output).expect("edge");
        store.connect(a, b, SourceHandle::Output).expect("edge");
        (store, a, b, c)
    }

    #[test]
    fn connected_chain_has_no_findings() {
        let (store, _, _, c) = chain_with_orphan();
        let mut store = store;
        store.delete_node(c);

        let diagnostics = analyze(store.graph());
        assert_eq!(diagnostics, CanvasDiagnostics::default());
    }

    #[test]
    fn orphan_node_is_unreachable() {
        let (store, _, _, c) = chain_with_orphan();
        let diagnostics = analyze(store.graph());
        assert_eq!(diagnostics.unreachable, vec![c]);
        assert!(!diagnostics.cyclic);
    }

    #[test]
    fn cycle_between_actions_is_reported_not_rejected() {
        let (mut store, a, b, _) = chain_with_orphan();
        store.connect(b, a, SourceHandle::Output).expect("cycle edge accepted");

        let diagnostics = analyze(store.graph());
        assert!(diagnostics.cyclic);
    }

    #[test]
    fn parallel_edges_are_reported_once_per_pair() {
        let (mut store, a, b, _) = chain_with_orphan();
        store.connect(a, b, SourceHandle::Output).expect("second edge");
        store.connect(a, b, SourceHandle::Output).expect("third edge");

        let diagnostics = analyze(store.graph());
        assert_eq!(diagnostics.parallel_pairs, vec![(a, b)]);
    }

    #[test]
    fn entry_and_terminal_nodes() {
        let (store, _, b, c) = chain_with_orphan();
        let trigger = store.graph().trigger().expect("trigger").id;

        let entries = entry_nodes(store.graph());
        assert!(entries.contains(&trigger));
        assert!(entries.contains(&c));
        assert_eq!(entries.len(), 2);

        let terminals = terminal_nodes(store.graph());
        assert!(terminals.contains(&b));
        assert!(terminals.contains(&c));
        assert_eq!(terminals.len(), 2);
    }
}
