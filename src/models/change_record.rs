use serde::{Deserialize, Serialize};

use super::Entity;

/// Kind of a row-level change.
///
/// Deserialization is strict: payloads carrying any other kind fail to parse
/// at the feed adapter boundary and never reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

/// One row-level change notification from the change feed.
///
/// Transient: records are only inspected to decide whether to schedule a
/// refetch, never stored.  `new` carries the row after the change (insert /
/// update), `old` the row before it (update / delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// What happened.
    #[serde(rename = "eventType")]
    pub kind: ChangeKind,
    /// Row after the change, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Entity>,
    /// Row before the change, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Entity>,
}

impl ChangeRecord {
    /// Insert notification carrying the new row.
    pub fn insert(new: Entity) -> Self {
        Self {
            kind: ChangeKind::Insert,
            new: Some(new),
            old: None,
        }
    }

    /// Update notification carrying new and old rows.
    pub fn update(new: Entity, old: Entity) -> Self {
        Self {
            kind: ChangeKind::Update,
            new: Some(new),
            old: Some(old),
        }
    }

    /// Delete notification carrying the removed row.
    pub fn delete(old: Entity) -> Self {
        Self {
            kind: ChangeKind::Delete,
            new: None,
            old: Some(old),
        }
    }

    /// Tenant owning the affected row, preferring the new representation.
    pub fn tenant_id(&self) -> Option<&str> {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .map(|e| e.agency_id.as_str())
    }
}
