//! Edge types for the automation canvas.
//!
//! Edges are directed connections between nodes. A condition node exposes
//! two source handles (`yes`/`no`); every other node exposes a single
//! default handle. The handle decides which branch an edge represents and
//! the stroke color a renderer should draw it with.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A unique identifier for an edge within an automation canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(Ulid);

impl EdgeId {
    /// Creates a new random edge ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Creates an edge ID from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edge_{}", self.0)
    }
}

/// The source handle an edge leaves a node from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceHandle {
    /// The generic output handle.
    #[default]
    Output,
    /// The `yes` branch of a condition node.
    Yes,
    /// The `no` branch of a condition node.
    No,
}

impl SourceHandle {
    /// Returns the stroke color a renderer should use for this handle.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Output => "#6b7280",
            Self::Yes => "#22c55e",
            Self::No => "#ef4444",
        }
    }
}

/// A directed connection between two canvas nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// The node the edge leaves.
    pub source: NodeId,
    /// The node the edge enters. Never a trigger node.
    pub target: NodeId,
    /// The handle the edge leaves from.
    #[serde(default)]
    pub handle: SourceHandle,
}

impl Edge {
    /// Creates a new edge with a fresh ID.
    #[must_use]
    pub fn new(source: NodeId, target: NodeId, handle: SourceHandle) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            target,
            handle,
        }
    }

    /// Returns true when the edge references the node as source or target.
    #[must_use]
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }
}
