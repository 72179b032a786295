//! Error types for the automation crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ConnectionError`: a candidate edge was rejected by the validator
//! - `SaveError`: a save was refused client-side or failed at the backend
//! - `PersistError`: failures reported by the persistence collaborator
//!
//! None of these are fatal to an editing session: the session maps them to
//! transient notices and keeps the in-memory graph intact.

use crate::node::NodeId;
use funnelforge_core::AutomationId;
use std::fmt;

/// Reasons a candidate edge is rejected.
///
/// These carry only information available at the graph layer. Session-level
/// context (like automation_id) should be added by the caller using
/// `.context()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    /// The source node ID does not resolve to a node.
    UnknownSource { node_id: NodeId },
    /// The target node ID does not resolve to a node.
    UnknownTarget { node_id: NodeId },
    /// The target is a trigger node; triggers never receive input.
    TriggerTarget { node_id: NodeId },
    /// Source and target are the same node.
    SelfLoop { node_id: NodeId },
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSource { node_id } => {
                write!(f, "source node not found: {node_id}")
            }
            Self::UnknownTarget { node_id } => {
                write!(f, "target node not found: {node_id}")
            }
            Self::TriggerTarget { node_id } => {
                write!(f, "trigger node {node_id} cannot be a connection target")
            }
            Self::SelfLoop { node_id } => {
                write!(f, "node {node_id} cannot connect to itself")
            }
        }
    }
}

impl std::error::Error for ConnectionError {}

/// Failures reported by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// No automation with the given ID exists.
    NotFound { automation_id: AutomationId },
    /// The backend rejected or failed the request.
    Backend { details: String },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { automation_id } => {
                write!(f, "automation not found: {automation_id}")
            }
            Self::Backend { details } => {
                write!(f, "persistence backend error: {details}")
            }
        }
    }
}

impl std::error::Error for PersistError {}

/// Reasons a save did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// More than one node exists but the trigger has no outgoing edge.
    /// Refused client-side; no persistence call is made.
    TriggerUnconnected,
    /// The canvas could not be serialized.
    Serialize { details: String },
    /// The persistence collaborator reported a failure. The in-memory graph
    /// is untouched so the save can be retried.
    Store(PersistError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriggerUnconnected => {
                write!(f, "trigger node has no outgoing connection")
            }
            Self::Serialize { details } => {
                write!(f, "failed to serialize canvas: {details}")
            }
            Self::Store(err) => {
                write!(f, "failed to persist canvas: {err}")
            }
        }
    }
}

impl std::error::Error for SaveError {}

impl From<PersistError> for SaveError {
    fn from(err: PersistError) -> Self {
        Self::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_display() {
        let node_id = NodeId::new();
        let err = ConnectionError::TriggerTarget { node_id };
        assert!(err.to_string().contains("cannot be a connection target"));
        assert!(err.to_string().contains("node_"));
    }

    #[test]
    fn self_loop_display() {
        let node_id = NodeId::new();
        let err = ConnectionError::SelfLoop { node_id };
        assert!(err.to_string().contains("cannot connect to itself"));
    }

    #[test]
    fn persist_error_display() {
        let automation_id = AutomationId::new();
        let err = PersistError::NotFound { automation_id };
        assert!(err.to_string().contains("automation not found"));
    }

    #[test]
    fn save_error_wraps_persist_error() {
        let err: SaveError = PersistError::Backend {
            details: "connection refused".to_string(),
        }
        .into();
        assert!(err.to_string().contains("connection refused"));
    }
}
