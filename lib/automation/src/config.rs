//! Editor configuration.
//!
//! Strongly-typed settings for the canvas editor, loaded via the `config`
//! crate from environment variables (prefix `FUNNELFORGE`, `__` separator),
//! with defaults matching the hosted builder.

use serde::Deserialize;

/// Placement constants for new nodes on the canvas.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Vertical distance between a new node and the current lowest node.
    #[serde(default = "default_vertical_gap")]
    pub vertical_gap: f64,

    /// Maximum horizontal offset applied around the center line, so stacked
    /// nodes do not hide each other's edges.
    #[serde(default = "default_horizontal_jitter")]
    pub horizontal_jitter: f64,

    /// The x coordinate of the canvas center line.
    #[serde(default = "default_center_x")]
    pub center_x: f64,

    /// The y coordinate of the seeded trigger node.
    #[serde(default = "default_top_margin")]
    pub top_margin: f64,
}

fn default_vertical_gap() -> f64 {
    150.0
}

fn default_horizontal_jitter() -> f64 {
    50.0
}

fn default_center_x() -> f64 {
    400.0
}

fn default_top_margin() -> f64 {
    80.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_gap: default_vertical_gap(),
            horizontal_jitter: default_horizontal_jitter(),
            center_x: default_center_x(),
            top_margin: default_top_margin(),
        }
    }
}

/// Configuration for the canvas editor.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Node placement constants.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Quiet period before a buffered content edit is auto-saved, in seconds.
    #[serde(default = "default_autosave_quiet_seconds")]
    pub autosave_quiet_seconds: i64,

    /// How long a transient notice stays visible, in seconds.
    #[serde(default = "default_notice_ttl_seconds")]
    pub notice_ttl_seconds: i64,
}

fn default_autosave_quiet_seconds() -> i64 {
    2
}

fn default_notice_ttl_seconds() -> i64 {
    4
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            autosave_quiet_seconds: default_autosave_quiet_seconds(),
            notice_ttl_seconds: default_notice_ttl_seconds(),
        }
    }
}

impl EditorConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if present configuration values are invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("FUNNELFORGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// The autosave quiet period as a duration.
    #[must_use]
    pub fn autosave_quiet(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.autosave_quiet_seconds)
    }

    /// The notice time-to-live as a duration.
    #[must_use]
    pub fn notice_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.notice_ttl_seconds)
    }
}
