//! Editor session state.
//!
//! One `EditorSession` exists per open automation. It owns the graph store
//! and the session-scoped UI state that never belongs in the graph itself:
//! the selected node, palette visibility, transient notices, and the
//! close-with-confirmation flow. Sessions are single-user and synchronous;
//! the only async path is saving through the persistence seam.
//!
//! Nothing here panics the session: rejected connections, forbidden deletes
//! and failed saves all degrade to transient notices while the in-memory
//! graph keeps the user's edits.

use crate::config::EditorConfig;
use crate::definition::Automation;
use crate::edge::{EdgeId, SourceHandle};
use crate::error::{ConnectionError, SaveError};
use crate::graph::CanvasGraph;
use crate::node::{Node, NodeConfig, NodeId, Position};
use crate::persist::AutomationStore;
use crate::preset::NodePreset;
use crate::store::{CanvasStore, DeleteOutcome};
use crate::validate::check_saveable;
use chrono::{DateTime, Duration, Utc};
use funnelforge_core::AutomationId;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, auto-dismissing message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// User-facing message.
    pub message: String,
    /// When the notice was raised; used for auto-dismissal.
    pub created_at: DateTime<Utc>,
}

/// Result of asking to close the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// No unsaved changes; the session can be torn down.
    Closed,
    /// Unsaved changes exist; the host must confirm discarding them.
    ConfirmDiscard,
}

/// The state of one automation editing session.
#[derive(Debug)]
pub struct EditorSession {
    automation_id: AutomationId,
    name: String,
    store: CanvasStore,
    selected: Option<NodeId>,
    palette_open: bool,
    notices: Vec<Notice>,
    notice_ttl: Duration,
}

impl EditorSession {
    /// Opens a session for an automation.
    ///
    /// The canvas is restored from the persisted `canvas_data` document when
    /// one exists and is readable; otherwise a default single-trigger graph
    /// is seeded from the automation's trigger event.
    #[must_use]
    pub fn open(automation: &Automation, config: &EditorConfig) -> Self {
        let mut session = Self {
            automation_id: automation.id,
            name: automation.name.clone(),
            store: CanvasStore::seeded(automation.trigger_event, config.layout.clone()),
            selected: None,
            palette_open: false,
            notices: Vec::new(),
            notice_ttl: config.notice_ttl(),
        };

        if let Some(doc) = &automation.canvas_data {
            match CanvasGraph::from_value(doc.clone()) {
                Ok(graph) if graph.trigger().is_some() => {
                    session.store = CanvasStore::new(graph, config.layout.clone());
                }
                Ok(_) => {
                    session.push_notice(
                        NoticeLevel::Warning,
                        "Saved canvas had no trigger; starting from a fresh one",
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        automation_id = %automation.id,
                        error = %err,
                        "persisted canvas data unreadable"
                    );
                    session.push_notice(
                        NoticeLevel::Warning,
                        "Saved canvas could not be read; starting from a fresh one",
                    );
                }
            }
        }

        tracing::info!(
            automation_id = %automation.id,
            nodes = session.store.graph().node_count(),
            "editor session opened"
        );
        session
    }

    /// The automation being edited.
    #[must_use]
    pub fn automation_id(&self) -> AutomationId {
        self.automation_id
    }

    /// The automation name as currently edited.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the automation. Persisted on the next save.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.store.mark_dirty();
    }

    /// The underlying graph store.
    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    /// The current graph.
    #[must_use]
    pub fn graph(&self) -> &CanvasGraph {
        self.store.graph()
    }

    /// Whether unsaved changes exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Adds a node from a palette preset and selects it, so the host can
    /// open its configuration panel straight away.
    pub fn add_node(&mut self, preset: &NodePreset) -> NodeId {
        let node_id = self.store.add_node(preset);
        self.selected = Some(node_id);
        node_id
    }

    /// Selects a node. Unknown IDs clear the selection.
    pub fn select(&mut self, node_id: NodeId) {
        self.selected = self.graph().contains_node(node_id).then_some(node_id);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The currently selected node.
    #[must_use]
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.and_then(|id| self.graph().node(id))
    }

    /// Replaces the selected node's configuration.
    ///
    /// A no-op returning false when nothing is selected.
    pub fn update_selected_config(&mut self, config: NodeConfig) -> bool {
        match self.selected {
            Some(node_id) => self.store.update_node_config(node_id, config),
            None => false,
        }
    }

    /// Moves a node during a drag gesture (intermediate frames).
    pub fn drag_node(&mut self, node_id: NodeId, position: Position) {
        self.store.drag_node(node_id, position);
    }

    /// Commits a node's position when the drag gesture completes.
    pub fn finish_drag(&mut self, node_id: NodeId, position: Position) {
        self.store.finish_drag(node_id, position);
    }

    /// Connects two nodes.
    ///
    /// # Errors
    ///
    /// On rejection, raises an "Invalid connection" notice and returns the
    /// validator's error; the graph is unchanged.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        handle: SourceHandle,
    ) -> Result<EdgeId, ConnectionError> {
        match self.store.connect(source, target, handle) {
            Ok(edge_id) => Ok(edge_id),
            Err(err) => {
                self.push_notice(NoticeLevel::Warning, "Invalid connection");
                Err(err)
            }
        }
    }

    /// Deletes a node, with the trigger protected.
    pub fn delete_node(&mut self, node_id: NodeId) -> DeleteOutcome {
        let outcome = self.store.delete_node(node_id);
        match &outcome {
            DeleteOutcome::Deleted(_) => {
                if self.selected == Some(node_id) {
                    self.selected = None;
                }
            }
            DeleteOutcome::TriggerProtected => {
                self.push_notice(NoticeLevel::Warning, "The trigger step cannot be deleted");
            }
            DeleteOutcome::NotFound => {}
        }
        outcome
    }

    /// Handles the Delete/Backspace key.
    ///
    /// Deletes the selected node only when focus is outside a text input, so
    /// the shortcut never fights normal text editing.
    pub fn press_delete(&mut self, focus_in_text_input: bool) {
        if focus_in_text_input {
            return;
        }
        if let Some(node_id) = self.selected {
            self.delete_node(node_id);
        }
    }

    /// Whether the node palette is open.
    #[must_use]
    pub fn is_palette_open(&self) -> bool {
        self.palette_open
    }

    /// Shows or hides the node palette.
    pub fn set_palette_open(&mut self, open: bool) {
        self.palette_open = open;
    }

    /// Current notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drops notices older than the configured time-to-live.
    pub fn prune_notices(&mut self, now: DateTime<Utc>) {
        let ttl = self.notice_ttl;
        self.notices.retain(|n| now - n.created_at < ttl);
    }

    /// Asks to close the editor.
    ///
    /// With unsaved changes, the host must show a discard-changes prompt and
    /// call [`Self::confirm_discard`] before tearing the session down.
    #[must_use]
    pub fn request_close(&self) -> CloseOutcome {
        if self.is_dirty() {
            CloseOutcome::ConfirmDiscard
        } else {
            CloseOutcome::Closed
        }
    }

    /// Discards unsaved changes and consumes the session.
    pub fn confirm_discard(self) {
        tracing::info!(
            automation_id = %self.automation_id,
            "editor session closed, unsaved changes discarded"
        );
    }

    /// Saves the canvas through the persistence seam.
    ///
    /// With more than one node, the trigger must be connected to at least
    /// one step or the save is refused without a persistence call. On
    /// success the session becomes clean; on failure the in-memory graph is
    /// untouched so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns why the save was refused or failed.
    pub async fn save(&mut self, store: &dyn AutomationStore) -> Result<(), SaveError> {
        if let Err(err) = check_saveable(self.graph()) {
            self.push_notice(
                NoticeLevel::Warning,
                "Connect the trigger to at least one step before saving",
            );
            return Err(err);
        }

        let doc = match self.graph().to_value() {
            Ok(doc) => doc,
            Err(err) => {
                self.push_notice(NoticeLevel::Error, "Could not prepare the canvas for saving");
                return Err(SaveError::Serialize {
                    details: err.to_string(),
                });
            }
        };

        match store.update(self.automation_id, &self.name, doc).await {
            Ok(()) => {
                self.store.mark_saved();
                self.push_notice(NoticeLevel::Info, "Automation saved");
                tracing::info!(
                    automation_id = %self.automation_id,
                    nodes = self.graph().node_count(),
                    edges = self.graph().edge_count(),
                    "canvas saved"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    automation_id = %self.automation_id,
                    error = %err,
                    "canvas save failed"
                );
                self.push_notice(
                    NoticeLevel::Error,
                    "Saving failed. Your changes are kept; try again",
                );
                Err(SaveError::Store(err))
            }
        }
    }

    fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
            created_at: Utc::now(),
        });
    }
}
