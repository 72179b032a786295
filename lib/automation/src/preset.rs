//! The node palette: preset configurations for every node the builder can add.
//!
//! Presets carry the label, description, and icon the palette shows, plus
//! the default configuration copied into a freshly added node. The palette
//! never offers trigger presets; the trigger is seeded automatically when a
//! canvas is opened (see [`seed_graph`]).

use crate::config::LayoutConfig;
use crate::graph::CanvasGraph;
use crate::node::{
    ActionNodeConfig, ConditionNodeConfig, ConditionOperator, DelayNodeConfig, DelayUnit, Node,
    NodeConfig, Position, TriggerEvent, TriggerNodeConfig, WebhookMethod,
};

/// A palette entry: display metadata plus the default node configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePreset {
    /// Short name shown on the palette card.
    pub label: &'static str,
    /// One-line explanation shown under the label.
    pub description: &'static str,
    /// Emoji icon shown on the palette card and the node.
    pub icon: &'static str,
    /// Configuration copied into a new node.
    pub config: NodeConfig,
}

impl NodePreset {
    fn new(
        label: &'static str,
        description: &'static str,
        icon: &'static str,
        config: NodeConfig,
    ) -> Self {
        Self {
            label,
            description,
            icon,
            config,
        }
    }
}

impl TriggerEvent {
    /// Short name shown on the trigger node.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PurchaseCompleted => "Purchase Completed",
            Self::PurchaseFailed => "Purchase Failed",
            Self::CartAbandoned => "Cart Abandoned",
            Self::OptInSubmitted => "Opt-in Submitted",
            Self::UpsellAccepted => "Upsell Accepted",
            Self::UpsellDeclined => "Upsell Declined",
            Self::DownsellAccepted => "Downsell Accepted",
            Self::DownsellDeclined => "Downsell Declined",
            Self::SessionStarted => "Session Started",
            Self::PageView => "Page View",
            Self::OrderBumpAccepted => "Order Bump Accepted",
            Self::OrderBumpDeclined => "Order Bump Declined",
        }
    }

    /// One-line explanation of when the event fires.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::PurchaseCompleted => "When a customer completes a purchase",
            Self::PurchaseFailed => "When a payment attempt fails",
            Self::CartAbandoned => "When a checkout is started but not completed",
            Self::OptInSubmitted => "When a visitor submits an opt-in form",
            Self::UpsellAccepted => "When an upsell offer is accepted",
            Self::UpsellDeclined => "When an upsell offer is declined",
            Self::DownsellAccepted => "When a downsell offer is accepted",
            Self::DownsellDeclined => "When a downsell offer is declined",
            Self::SessionStarted => "When a visitor starts a funnel session",
            Self::PageView => "When a funnel page is viewed",
            Self::OrderBumpAccepted => "When an order bump is added at checkout",
            Self::OrderBumpDeclined => "When an order bump is declined at checkout",
        }
    }

    /// Emoji icon for the trigger node.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::PurchaseCompleted => "💰",
            Self::PurchaseFailed => "⚠️",
            Self::CartAbandoned => "🛒",
            Self::OptInSubmitted => "📝",
            Self::UpsellAccepted => "⬆️",
            Self::UpsellDeclined => "↩️",
            Self::DownsellAccepted => "⬇️",
            Self::DownsellDeclined => "🚫",
            Self::SessionStarted => "👋",
            Self::PageView => "👀",
            Self::OrderBumpAccepted => "➕",
            Self::OrderBumpDeclined => "➖",
        }
    }
}

/// The trigger preset for a funnel lifecycle event.
#[must_use]
pub fn trigger_preset(event: TriggerEvent) -> NodePreset {
    NodePreset::new(
        event.label(),
        event.description(),
        event.icon(),
        NodeConfig::Trigger(TriggerNodeConfig::new(event)),
    )
}

/// The palette of nodes a user can add: actions, a delay, and a condition.
#[must_use]
pub fn palette() -> Vec<NodePreset> {
    vec![
        NodePreset::new(
            "Send Email",
            "Send an email to the contact",
            "✉️",
            NodeConfig::Action(ActionNodeConfig::SendEmail {
                subject: String::new(),
                body: String::new(),
            }),
        ),
        NodePreset::new(
            "Send WhatsApp",
            "Send a WhatsApp message to the contact",
            "💬",
            NodeConfig::Action(ActionNodeConfig::SendWhatsapp {
                message: String::new(),
            }),
        ),
        NodePreset::new(
            "Add Tag",
            "Tag the contact",
            "🏷️",
            NodeConfig::Action(ActionNodeConfig::AddTag { tag: String::new() }),
        ),
        NodePreset::new(
            "Remove Tag",
            "Remove a tag from the contact",
            "✂️",
            NodeConfig::Action(ActionNodeConfig::RemoveTag { tag: String::new() }),
        ),
        NodePreset::new(
            "Add Score",
            "Add points to the contact's lead score",
            "⭐",
            NodeConfig::Action(ActionNodeConfig::AddScore { points: 10 }),
        ),
        NodePreset::new(
            "Update Field",
            "Update a contact field",
            "✏️",
            NodeConfig::Action(ActionNodeConfig::UpdateField {
                field: String::new(),
                value: String::new(),
            }),
        ),
        NodePreset::new(
            "Call Webhook",
            "Send the event to an external URL",
            "🔗",
            NodeConfig::Action(ActionNodeConfig::CallWebhook {
                url: String::new(),
                method: WebhookMethod::Post,
                payload: None,
            }),
        ),
        NodePreset::new(
            "Wait",
            "Pause before the next step",
            "⏱️",
            NodeConfig::Delay(DelayNodeConfig::new(1, DelayUnit::Hours)),
        ),
        NodePreset::new(
            "Condition",
            "Branch on contact or order data",
            "🔀",
            NodeConfig::Condition(ConditionNodeConfig {
                field: String::new(),
                operator: ConditionOperator::Equals,
                value: String::new(),
            }),
        ),
    ]
}

/// Synthesizes the default canvas for an automation that has no persisted
/// canvas yet: a single trigger node on the center line.
#[must_use]
pub fn seed_graph(event: TriggerEvent, layout: &LayoutConfig) -> CanvasGraph {
    let mut graph = CanvasGraph::new();
    graph.nodes.push(Node::new(
        NodeConfig::Trigger(TriggerNodeConfig::new(event)),
        Position::new(layout.center_x, layout.top_margin),
    ));
    graph
}
