//! Automation canvas model for the funnelforge platform.
//!
//! This crate implements the funnel automation builder's state and logic,
//! independent of any rendering library:
//!
//! - **Graph Model**: typed nodes (trigger, action, delay, condition) and
//!   handle-styled edges, serialized as the `{nodes, edges}` canvas document
//! - **Graph Store**: in-session mutations with unsaved-change tracking
//! - **Connection Validator**: the structural gate applied before every edge
//! - **Editor Session**: selection, transient notices, close confirmation,
//!   and save orchestration against the persistence seam
//! - **Palette & Seeding**: node presets and the default single-trigger graph
//! - **Merge Tags**: the `{{category.key}}` template mini-language
//! - **Analysis**: advisory reachability/cycle diagnostics
//!
//! A renderer drives this crate through [`session::EditorSession`]; the
//! hosted backend sits behind [`persist::AutomationStore`].

pub mod analysis;
pub mod autosave;
pub mod config;
pub mod definition;
pub mod edge;
pub mod error;
pub mod graph;
pub mod merge_tag;
pub mod node;
pub mod persist;
pub mod preset;
pub mod session;
pub mod store;
pub mod validate;

pub use autosave::AutosavePolicy;
pub use config::{EditorConfig, LayoutConfig};
pub use definition::{Automation, AutomationSummary};
pub use edge::{Edge, EdgeId, SourceHandle};
pub use error::{ConnectionError, PersistError, SaveError};
pub use graph::CanvasGraph;
pub use node::{Node, NodeConfig, NodeId, NodeKind, Position, TriggerEvent};
pub use persist::{AutomationStore, InMemoryAutomationStore};
pub use preset::NodePreset;
pub use session::{CloseOutcome, EditorSession, Notice, NoticeLevel};
pub use store::{CanvasStore, DeleteOutcome};
