//! Boundary traits for the injected backend collaborators.
//!
//! The sync engine never talks to a concrete database, auth, or transport
//! layer.  Hosts implement these traits over whatever client they use and
//! hand them to [`SyncClientBuilder`](crate::SyncClientBuilder).  All reads
//! must be idempotent: the engine may call [`TableBackend::fetch`] repeatedly
//! with identical parameters.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::{ChangeRecord, Entity, FilterParams};

/// JSON object payload for create/update operations.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Failure reported by a backend collaborator.
///
/// Carries the raw signals the error classifier inspects: an optional
/// backend-specific code (e.g. `42501`, `PGRST301`) and the raw message.
/// Raw messages are logged but never shown to users; see
/// [`ErrorCategory::classify`](crate::ErrorCategory::classify).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct BackendError {
    /// Backend-specific error code, when one was provided.
    pub code: Option<String>,
    /// Raw error message from the backend client.
    pub message: String,
}

impl BackendError {
    /// Create an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Create an error with a backend-specific code.
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Read and mutate tenant-scoped collections.
///
/// `fetch` corresponds to one filtered `SELECT` over a table; row-level
/// security on the backend is assumed, but the engine still enforces tenant
/// scoping on the change-feed side.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Fetch the full collection for `table` under `params`.
    async fn fetch(
        &self,
        table: &str,
        params: &FilterParams,
    ) -> Result<Vec<Entity>, BackendError>;

    /// Insert a row and return the stored entity.
    async fn create(&self, table: &str, data: JsonMap) -> Result<Entity, BackendError>;

    /// Update a row by id and return the stored entity.
    async fn update(&self, table: &str, id: &str, data: JsonMap)
        -> Result<Entity, BackendError>;

    /// Delete a row by id. Returns `true` when a row was removed.
    async fn delete(&self, table: &str, id: &str) -> Result<bool, BackendError>;
}

/// Row-level change notifications scoped to one `(table, tenant)` pair.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Open a subscription delivering [`ChangeRecord`]s for `table` rows
    /// owned by `tenant_id`.
    ///
    /// The returned future resolving is the backend acknowledgement; until
    /// then the subscription counts as opening.  Dropping the receiver does
    /// not close the backend handle; callers must `close()` the handle.
    async fn subscribe(
        &self,
        table: &str,
        tenant_id: &str,
    ) -> Result<(Box<dyn FeedHandle>, mpsc::Receiver<ChangeRecord>), BackendError>;
}

/// One live change-feed connection.
///
/// At most one handle exists per `(table, tenant)` scope at any time; the
/// engine closes the previous handle before opening the next.
#[async_trait]
pub trait FeedHandle: Send {
    /// Release the backend subscription. Must be safe to call once.
    async fn close(&mut self);
}
