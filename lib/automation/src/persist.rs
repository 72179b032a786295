//! The persistence seam for automations.
//!
//! The editor never talks to a backend directly: it saves through
//! [`AutomationStore`], the trait mirror of the hosted automations API
//! (list, create, update, toggle, duplicate, delete, logs). The hosted
//! builder binds this to its HTTP backend; tests and embedded hosts use
//! [`InMemoryAutomationStore`]. Canvas documents pass through opaquely and
//! each update replaces the stored copy wholesale (last write wins).

use crate::definition::{Automation, AutomationSummary};
use crate::error::PersistError;
use crate::node::TriggerEvent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use funnelforge_core::{AutomationId, AutomationLogId, FunnelId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Outcome of one execution of an automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationLogStatus {
    /// The run is still in progress.
    Running,
    /// The run finished successfully.
    Completed,
    /// The run failed.
    Failed,
}

/// One execution-history record, consumed read-only by the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationLogRecord {
    /// Log record ID.
    pub id: AutomationLogId,
    /// The automation that ran.
    pub automation_id: AutomationId,
    /// The event that started the run.
    pub trigger_event: TriggerEvent,
    /// Run outcome.
    pub status: AutomationLogStatus,
    /// Backend-provided detail message, if any.
    pub message: Option<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished, if it has.
    pub finished_at: Option<DateTime<Utc>>,
}

/// The persistence collaborator the editor saves through.
#[async_trait]
pub trait AutomationStore: Send + Sync {
    /// Lists automations for a funnel, most recently updated first.
    async fn list(&self, funnel_id: FunnelId) -> Result<Vec<AutomationSummary>, PersistError>;

    /// Creates a new automation with no canvas yet.
    async fn create(
        &self,
        funnel_id: FunnelId,
        name: &str,
        trigger_event: TriggerEvent,
    ) -> Result<Automation, PersistError>;

    /// Fetches a full automation record.
    async fn fetch(&self, id: AutomationId) -> Result<Automation, PersistError>;

    /// Persists an automation's name and canvas, replacing the stored canvas
    /// wholesale.
    async fn update(
        &self,
        id: AutomationId,
        name: &str,
        canvas_data: JsonValue,
    ) -> Result<(), PersistError>;

    /// Flips the enabled flag, returning the new value.
    async fn toggle(&self, id: AutomationId) -> Result<bool, PersistError>;

    /// Duplicates an automation, returning the disabled copy.
    async fn duplicate(&self, id: AutomationId) -> Result<Automation, PersistError>;

    /// Deletes an automation.
    async fn delete(&self, id: AutomationId) -> Result<(), PersistError>;

    /// Returns the execution history, most recent first.
    async fn logs(&self, id: AutomationId) -> Result<Vec<AutomationLogRecord>, PersistError>;
}

/// In-memory implementation of [`AutomationStore`] for tests and embedded
/// hosts.
#[derive(Debug, Default)]
pub struct InMemoryAutomationStore {
    automations: RwLock<HashMap<AutomationId, Automation>>,
    logs: RwLock<HashMap<AutomationId, Vec<AutomationLogRecord>>>,
}

impl InMemoryAutomationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a history record (a backend would write these while running
    /// the automation).
    pub async fn push_log(&self, record: AutomationLogRecord) {
        self.logs
            .write()
            .await
            .entry(record.automation_id)
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl AutomationStore for InMemoryAutomationStore {
    async fn list(&self, funnel_id: FunnelId) -> Result<Vec<AutomationSummary>, PersistError> {
        let automations = self.automations.read().await;
        let mut summaries: Vec<AutomationSummary> = automations
            .values()
            .filter(|a| a.funnel_id == funnel_id)
            .map(AutomationSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn create(
        &self,
        funnel_id: FunnelId,
        name: &str,
        trigger_event: TriggerEvent,
    ) -> Result<Automation, PersistError> {
        let automation = Automation::new(funnel_id, name, trigger_event);
        self.automations
            .write()
            .await
            .insert(automation.id, automation.clone());
        tracing::info!(automation_id = %automation.id, "automation created");
        Ok(automation)
    }

    async fn fetch(&self, id: AutomationId) -> Result<Automation, PersistError> {
        self.automations
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(PersistError::NotFound { automation_id: id })
    }

    async fn update(
        &self,
        id: AutomationId,
        name: &str,
        canvas_data: JsonValue,
    ) -> Result<(), PersistError> {
        let mut automations = self.automations.write().await;
        let automation = automations
            .get_mut(&id)
            .ok_or(PersistError::NotFound { automation_id: id })?;
        automation.name = name.to_string();
        automation.set_canvas(canvas_data);
        Ok(())
    }

    async fn toggle(&self, id: AutomationId) -> Result<bool, PersistError> {
        let mut automations = self.automations.write().await;
        let automation = automations
            .get_mut(&id)
            .ok_or(PersistError::NotFound { automation_id: id })?;
        Ok(automation.toggle())
    }

    async fn duplicate(&self, id: AutomationId) -> Result<Automation, PersistError> {
        let mut automations = self.automations.write().await;
        let copy = automations
            .get(&id)
            .ok_or(PersistError::NotFound { automation_id: id })?
            .duplicate();
        automations.insert(copy.id, copy.clone());
        tracing::info!(automation_id = %id, copy_id = %copy.id, "automation duplicated");
        Ok(copy)
    }

    async fn delete(&self, id: AutomationId) -> Result<(), PersistError> {
        let removed = self.automations.write().await.remove(&id);
        self.logs.write().await.remove(&id);
        match removed {
            Some(_) => Ok(()),
            None => Err(PersistError::NotFound { automation_id: id }),
        }
    }

    async fn logs(&self, id: AutomationId) -> Result<Vec<AutomationLogRecord>, PersistError> {
        if !self.automations.read().await.contains_key(&id) {
            return Err(PersistError::NotFound { automation_id: id });
        }
        let mut records = self.logs.read().await.get(&id).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_record(automation_id: AutomationId, started_at: DateTime<Utc>) -> AutomationLogRecord {
        AutomationLogRecord {
            id: AutomationLogId::new(),
            automation_id,
            trigger_event: TriggerEvent::PurchaseCompleted,
            status: AutomationLogStatus::Completed,
            message: None,
            started_at,
            finished_at: Some(started_at + chrono::Duration::seconds(3)),
        }
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let store = InMemoryAutomationStore::new();
        let funnel = FunnelId::new();
        let created = store
            .create(funnel, "Abandoned cart rescue", TriggerEvent::CartAbandoned)
            .await
            .expect("create");

        let fetched = store.fetch(created.id).await.expect("fetch");
        assert_eq!(fetched.name, "Abandoned cart rescue");
        assert_eq!(fetched.trigger_event, TriggerEvent::CartAbandoned);
    }

    #[tokio::test]
    async fn fetch_unknown_is_not_found() {
        let store = InMemoryAutomationStore::new();
        let id = AutomationId::new();
        assert_eq!(
            store.fetch(id).await,
            Err(PersistError::NotFound { automation_id: id })
        );
    }

    #[tokio::test]
    async fn list_filters_by_funnel() {
        let store = InMemoryAutomationStore::new();
        let funnel_a = FunnelId::new();
        let funnel_b = FunnelId::new();
        store
            .create(funnel_a, "A", TriggerEvent::PageView)
            .await
            .expect("create");
        store
            .create(funnel_b, "B", TriggerEvent::PageView)
            .await
            .expect("create");

        let listed = store.list(funnel_a).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "A");
    }

    #[tokio::test]
    async fn update_replaces_canvas_wholesale() {
        let store = InMemoryAutomationStore::new();
        let created = store
            .create(FunnelId::new(), "A", TriggerEvent::PageView)
            .await
            .expect("create");

        let doc = serde_json::json!({"nodes": [{"id": "x"}], "edges": []});
        store
            .update(created.id, "A renamed", doc.clone())
            .await
            .expect("update");

        let fetched = store.fetch(created.id).await.expect("fetch");
        assert_eq!(fetched.name, "A renamed");
        assert_eq!(fetched.canvas_data, Some(doc));
    }

    #[tokio::test]
    async fn toggle_and_duplicate() {
        let store = InMemoryAutomationStore::new();
        let created = store
            .create(FunnelId::new(), "A", TriggerEvent::PageView)
            .await
            .expect("create");

        assert!(!store.toggle(created.id).await.expect("toggle"));

        let copy = store.duplicate(created.id).await.expect("duplicate");
        assert_eq!(copy.name, "A (copy)");
        assert!(!copy.enabled);
        assert!(store.fetch(copy.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_automation_and_logs() {
        let store = InMemoryAutomationStore::new();
        let created = store
            .create(FunnelId::new(), "A", TriggerEvent::PageView)
            .await
            .expect("create");
        store.push_log(log_record(created.id, Utc::now())).await;

        store.delete(created.id).await.expect("delete");
        assert!(store.fetch(created.id).await.is_err());
        assert!(store.logs(created.id).await.is_err());
    }

    #[tokio::test]
    async fn logs_are_most_recent_first() {
        let store = InMemoryAutomationStore::new();
        let created = store
            .create(FunnelId::new(), "A", TriggerEvent::PageView)
            .await
            .expect("create");

        let early = Utc::now() - chrono::Duration::minutes(10);
        let late = Utc::now();
        store.push_log(log_record(created.id, early)).await;
        store.push_log(log_record(created.id, late)).await;

        let records = store.logs(created.id).await.expect("logs");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].started_at, late);
    }
}
