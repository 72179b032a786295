//! Automation canvas node types and configurations.
//!
//! Nodes are the steps of an automation graph. Each node has:
//! - A unique ID within the canvas
//! - A kind (Trigger, Action, Delay, Condition)
//! - A strongly-typed configuration for that kind
//! - A position on the canvas
//!
//! Node configuration is a tagged union keyed by kind, so a delay node can
//! never carry a webhook URL and a "missing field" is a compile error rather
//! than a runtime surprise.

use funnelforge_core::FunnelStepId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use ulid::Ulid;

/// A unique identifier for a node within an automation canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Ulid);

impl NodeId {
    /// Creates a new random node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Creates a node ID from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// Returns the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// A position on the canvas, in floating-point canvas coordinates.
///
/// Positions are mutated by drag operations; the only invariant is that both
/// coordinates stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position, replacing non-finite coordinates with zero.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: if x.is_finite() { x } else { 0.0 },
            y: if y.is_finite() { y } else { 0.0 },
        }
    }
}

/// The kind of a canvas node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point: the funnel lifecycle event that starts the automation.
    Trigger,
    /// A single effect (send message, tag contact, call webhook).
    Action,
    /// A wait period before the next step.
    Delay,
    /// A yes/no branch over contact or order data.
    Condition,
}

/// Funnel lifecycle events that can start an automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    /// A purchase was completed successfully.
    PurchaseCompleted,
    /// A purchase attempt failed.
    PurchaseFailed,
    /// A checkout was started but never completed.
    CartAbandoned,
    /// An opt-in form was submitted.
    OptInSubmitted,
    /// An upsell offer was accepted.
    UpsellAccepted,
    /// An upsell offer was declined.
    UpsellDeclined,
    /// A downsell offer was accepted.
    DownsellAccepted,
    /// A downsell offer was declined.
    DownsellDeclined,
    /// A visitor started a funnel session.
    SessionStarted,
    /// A funnel page was viewed.
    PageView,
    /// An order bump was accepted at checkout.
    OrderBumpAccepted,
    /// An order bump was declined at checkout.
    OrderBumpDeclined,
}

impl TriggerEvent {
    /// All trigger events, in palette order.
    pub const ALL: [Self; 12] = [
        Self::PurchaseCompleted,
        Self::PurchaseFailed,
        Self::CartAbandoned,
        Self::OptInSubmitted,
        Self::UpsellAccepted,
        Self::UpsellDeclined,
        Self::DownsellAccepted,
        Self::DownsellDeclined,
        Self::SessionStarted,
        Self::PageView,
        Self::OrderBumpAccepted,
        Self::OrderBumpDeclined,
    ];
}

/// Trigger-specific filters.
///
/// Page-view and session triggers can be narrowed to a single funnel step;
/// the other events fire funnel-wide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerFilter {
    /// Restrict the trigger to one funnel step, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<FunnelStepId>,
}

/// Configuration for trigger nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerNodeConfig {
    /// The funnel lifecycle event that starts the automation.
    pub event: TriggerEvent,
    /// Event-specific filters.
    #[serde(default)]
    pub filter: TriggerFilter,
}

impl TriggerNodeConfig {
    /// Creates an unfiltered trigger configuration for an event.
    #[must_use]
    pub fn new(event: TriggerEvent) -> Self {
        Self {
            event,
            filter: TriggerFilter::default(),
        }
    }
}

/// HTTP method for webhook actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebhookMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

/// Configuration for action nodes.
///
/// Message fields may embed merge-tag placeholders of the form
/// `{{category.key}}` or `{{category.key|default:"fallback"}}`; see
/// [`crate::merge_tag`]. The canvas never evaluates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionNodeConfig {
    /// Send an email to the contact.
    SendEmail {
        /// Subject line template.
        subject: String,
        /// Body template.
        body: String,
    },
    /// Send a WhatsApp message to the contact.
    SendWhatsapp {
        /// Message template.
        message: String,
    },
    /// Add a tag to the contact.
    AddTag {
        /// The tag to add.
        tag: String,
    },
    /// Remove a tag from the contact.
    RemoveTag {
        /// The tag to remove.
        tag: String,
    },
    /// Add points to the contact's lead score.
    AddScore {
        /// Points to add (may be negative).
        points: i32,
    },
    /// Update a contact field.
    UpdateField {
        /// The field name.
        field: String,
        /// The new value template.
        value: String,
    },
    /// Call an external webhook.
    CallWebhook {
        /// The webhook URL.
        url: String,
        /// HTTP method.
        #[serde(default)]
        method: WebhookMethod,
        /// Optional JSON payload template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<JsonValue>,
    },
}

/// Time unit for delay nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnit {
    #[default]
    Minutes,
    Hours,
    Days,
}

/// Configuration for delay nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayNodeConfig {
    /// How many units to wait. Always at least 1.
    pub amount: u32,
    /// The time unit.
    pub unit: DelayUnit,
}

impl DelayNodeConfig {
    /// Creates a delay configuration, clamping the amount to at least 1.
    #[must_use]
    pub fn new(amount: u32, unit: DelayUnit) -> Self {
        Self {
            amount: amount.max(1),
            unit,
        }
    }
}

impl Default for DelayNodeConfig {
    fn default() -> Self {
        Self::new(1, DelayUnit::Hours)
    }
}

/// Comparison operator for condition nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    IsSet,
    IsNotSet,
}

impl ConditionOperator {
    /// Returns true when the operator compares against a value.
    ///
    /// `IsSet`/`IsNotSet` only test field presence.
    #[must_use]
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::IsSet | Self::IsNotSet)
    }
}

/// Configuration for condition nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionNodeConfig {
    /// The contact/order field to test.
    pub field: String,
    /// The comparison operator.
    pub operator: ConditionOperator,
    /// The value to compare against (ignored for presence operators).
    #[serde(default)]
    pub value: String,
}

/// Configuration for a node, varying by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeConfig {
    /// Trigger node configuration.
    Trigger(TriggerNodeConfig),
    /// Action node configuration.
    Action(ActionNodeConfig),
    /// Delay node configuration.
    Delay(DelayNodeConfig),
    /// Condition node configuration.
    Condition(ConditionNodeConfig),
}

impl NodeConfig {
    /// Returns the kind of this node configuration.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Trigger(_) => NodeKind::Trigger,
            Self::Action(_) => NodeKind::Action,
            Self::Delay(_) => NodeKind::Delay,
            Self::Condition(_) => NodeKind::Condition,
        }
    }

    /// Returns true for trigger configurations.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Trigger(_))
    }
}

/// A canvas node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node within the canvas.
    pub id: NodeId,
    /// Canvas position.
    pub position: Position,
    /// Node configuration (determines kind and behavior).
    pub config: NodeConfig,
}

impl Node {
    /// Creates a new node with a fresh ID.
    #[must_use]
    pub fn new(config: NodeConfig, position: Position) -> Self {
        Self {
            id: NodeId::new(),
            position,
            config,
        }
    }

    /// Creates a node with a specific ID.
    #[must_use]
    pub fn with_id(id: NodeId, config: NodeConfig, position: Position) -> Self {
        Self {
            id,
            position,
            config,
        }
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    /// Returns true for trigger nodes.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.config.is_trigger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display() {
        let id = NodeId::new();
        assert!(id.to_string().starts_with("node_"));
    }

    #[test]
    fn position_rejects_non_finite() {
        let pos = Position::new(f64::NAN, f64::INFINITY);
        assert_eq!(pos, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn delay_amount_clamped_to_one() {
        let delay = DelayNodeConfig::new(0, DelayUnit::Days);
        assert_eq!(delay.amount, 1);
    }

    #[test]
    fn presence_operators_take_no_value() {
        assert!(!ConditionOperator::IsSet.takes_value());
        assert!(!ConditionOperator::IsNotSet.takes_value());
        assert!(ConditionOperator::Contains.takes_value());
    }

    #[test]
    fn node_kind_from_config() {
        let node = Node::new(
            NodeConfig::Delay(DelayNodeConfig::new(2, DelayUnit::Hours)),
            Position::default(),
        );
        assert_eq!(node.kind(), NodeKind::Delay);
        assert!(!node.is_trigger());
    }

    #[test]
    fn trigger_config_serde_tags() {
        let node = Node::new(
            NodeConfig::Trigger(TriggerNodeConfig::new(TriggerEvent::CartAbandoned)),
            Position::default(),
        );
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["config"]["kind"], "trigger");
        assert_eq!(json["config"]["event"], "cart_abandoned");
    }

    #[test]
    fn webhook_method_serializes_uppercase() {
        let config = ActionNodeConfig::CallWebhook {
            url: "https://example.com/hook".to_string(),
            method: WebhookMethod::Put,
            payload: None,
        };
        let json = serde_json::to_value(&config).expect("serialize");
        assert_eq!(json["method"], "PUT");
    }

    #[test]
    fn node_serde_roundtrip() {
        let node = Node::new(
            NodeConfig::Action(ActionNodeConfig::SendEmail {
                subject: "Welcome {{contact.first_name}}".to_string(),
                body: "Thanks for joining.".to_string(),
            }),
            Position::new(400.0, 230.0),
        );
        let json = serde_json::to_string(&node).expect("serialize");
        let parsed: Node = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(node, parsed);
    }
}
