//! Automation definition types.
//!
//! An automation is a named trigger + action graph attached to a funnel.
//! The canvas itself is stored as an opaque `{nodes, edges}` JSON blob; the
//! backend never interprets it beyond storage, and every save replaces the
//! stored copy wholesale.

use crate::node::TriggerEvent;
use chrono::{DateTime, Utc};
use funnelforge_core::{AutomationId, FunnelId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A complete automation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    /// Unique identifier for this automation.
    pub id: AutomationId,
    /// The funnel this automation belongs to.
    pub funnel_id: FunnelId,
    /// Human-readable name.
    pub name: String,
    /// The funnel lifecycle event the automation starts from. Also used to
    /// seed the default canvas when none has been saved yet.
    pub trigger_event: TriggerEvent,
    /// Whether the automation runs when its trigger fires.
    pub enabled: bool,
    /// The persisted `{nodes, edges}` canvas document, if any.
    pub canvas_data: Option<JsonValue>,
    /// When this automation was created.
    pub created_at: DateTime<Utc>,
    /// When this automation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Automation {
    /// Creates a new, enabled automation with no canvas yet.
    #[must_use]
    pub fn new(funnel_id: FunnelId, name: impl Into<String>, trigger_event: TriggerEvent) -> Self {
        let now = Utc::now();
        Self {
            id: AutomationId::new(),
            funnel_id,
            name: name.into(),
            trigger_event,
            enabled: true,
            canvas_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored canvas document.
    pub fn set_canvas(&mut self, canvas_data: JsonValue) {
        self.canvas_data = Some(canvas_data);
        self.touch();
    }

    /// Flips the enabled flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.touch();
        self.enabled
    }

    /// Marks the automation as updated (bumps updated_at timestamp).
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Creates a disabled copy with a fresh ID and a "(copy)" name suffix.
    ///
    /// Duplicates start disabled so a half-reviewed copy never fires.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: AutomationId::new(),
            funnel_id: self.funnel_id,
            name: format!("{} (copy)", self.name),
            trigger_event: self.trigger_event,
            enabled: false,
            canvas_data: self.canvas_data.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The number of nodes in the stored canvas, 0 when none is saved.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.canvas_data
            .as_ref()
            .and_then(|v| v.get("nodes"))
            .and_then(JsonValue::as_array)
            .map_or(0, Vec::len)
    }
}

/// Summary information about an automation (for listings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSummary {
    /// Automation ID.
    pub id: AutomationId,
    /// Automation name.
    pub name: String,
    /// The triggering event.
    pub trigger_event: TriggerEvent,
    /// Whether enabled.
    pub enabled: bool,
    /// Number of nodes in the stored canvas.
    pub node_count: usize,
    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Automation> for AutomationSummary {
    fn from(automation: &Automation) -> Self {
        Self {
            id: automation.id,
            name: automation.name.clone(),
            trigger_event: automation.trigger_event,
            enabled: automation.enabled,
            node_count: automation.node_count(),
            updated_at: automation.updated_at,
        }
    }
}
