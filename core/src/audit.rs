//! Audit trail for assignment mutations.
//!
//! RULE: Audit is best-effort. A failing sink is logged and ignored; it never
//! blocks or rolls back the mutation that produced the entry.

use crate::{
    assignment::AssignmentStatus,
    store::RotaStore,
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Every action the core records.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuditEvent {
    VolunteerAssigned {
        service_id: EntityId,
        volunteer_id: EntityId,
        forced: bool,
    },
    VolunteerUnassigned {
        service_id: EntityId,
        volunteer_id: EntityId,
    },
    AssignmentStatusChanged {
        service_id: EntityId,
        volunteer_id: EntityId,
        status: AssignmentStatus,
        note: Option<String>,
    },
    SuggestionsApplied {
        service_id: EntityId,
        volunteer_ids: Vec<EntityId>,
    },
    PreacherAssigned {
        service_id: EntityId,
        preacher_id: EntityId,
    },
    PreacherRemoved {
        service_id: EntityId,
        preacher_id: EntityId,
    },
    ServiceDeleted {
        service_id: EntityId,
        deleted_by: EntityId,
    },
    SeriesCreated {
        organization_id: EntityId,
        service_ids: Vec<EntityId>,
    },
}

impl AuditEvent {
    /// Stable action name, used for the `action` column of `audit_log`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::VolunteerAssigned { .. } => "volunteer_assigned",
            Self::VolunteerUnassigned { .. } => "volunteer_unassigned",
            Self::AssignmentStatusChanged { .. } => "assignment_status_changed",
            Self::SuggestionsApplied { .. } => "suggestions_applied",
            Self::PreacherAssigned { .. } => "preacher_assigned",
            Self::PreacherRemoved { .. } => "preacher_removed",
            Self::ServiceDeleted { .. } => "service_deleted",
            Self::SeriesCreated { .. } => "series_created",
        }
    }

    /// The entity the action was applied to.
    pub fn entity_id(&self) -> &str {
        match self {
            Self::VolunteerAssigned { service_id, .. }
            | Self::VolunteerUnassigned { service_id, .. }
            | Self::AssignmentStatusChanged { service_id, .. }
            | Self::SuggestionsApplied { service_id, .. }
            | Self::PreacherAssigned { service_id, .. }
            | Self::PreacherRemoved { service_id, .. }
            | Self::ServiceDeleted { service_id, .. } => service_id,
            Self::SeriesCreated { organization_id, .. } => organization_id,
        }
    }
}

/// The audit entry as handed to a sink and persisted to SQLite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Option<i64>,
    pub action: String,
    pub entity_id: EntityId,
    pub metadata: String, // JSON-serialized AuditEvent
}

impl AuditEntry {
    pub fn from_event(event: &AuditEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            action: event.action().to_string(),
            entity_id: event.entity_id().to_string(),
            metadata: serde_json::to_string(event)?,
        })
    }
}

/// Where audit entries go. Implementations must not panic on failure.
pub trait AuditSink: Send {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()>;
}

/// Writes one structured log line per entry.
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        log::info!(
            target: "rota::audit",
            "action={} entity={} metadata={}",
            entry.action,
            entry.entity_id,
            entry.metadata
        );
        Ok(())
    }
}

/// Appends to the `audit_log` table over its own connection.
pub struct SqliteAuditSink {
    store: RotaStore,
}

impl SqliteAuditSink {
    pub fn new(store: RotaStore) -> Self {
        Self { store }
    }
}

impl AuditSink for SqliteAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        self.store.append_audit(entry)?;
        Ok(())
    }
}

/// Keeps entries in memory. Used by tooling and tests.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("audit buffer poisoned"))?
            .push(entry.clone());
        Ok(())
    }
}

impl<T: AuditSink + Sync> AuditSink for std::sync::Arc<T> {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        (**self).record(entry)
    }
}
