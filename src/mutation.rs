//! Mutation coordination: create / update / delete with uniform signaling.
//!
//! Each [`Mutator`] wraps one table's write operations.  Every call invokes
//! the backend exactly once, drives the loading/error/success flags over a
//! watch channel, surfaces failures through the notification callbacks, and
//! then returns the error to the caller. A form needs its own submission
//! state to react, so mutation failures are never swallowed.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::watch;

use crate::backend::{BackendError, JsonMap, TableBackend};
use crate::callbacks::SyncCallbacks;
use crate::error::{Result, SyncError, SyncFault};
use crate::models::{Entity, MutationState};

/// Write coordinator for one table.
///
/// Obtained from [`SyncClient::mutator`](crate::SyncClient::mutator).
pub struct Mutator {
    backend: Arc<dyn TableBackend>,
    table: String,
    callbacks: SyncCallbacks,
    state_tx: watch::Sender<MutationState>,
    state_rx: watch::Receiver<MutationState>,
}

impl Mutator {
    pub(crate) fn new(
        backend: Arc<dyn TableBackend>,
        table: String,
        callbacks: SyncCallbacks,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(MutationState::default());
        Self {
            backend,
            table,
            callbacks,
            state_tx,
            state_rx,
        }
    }

    /// Current loading/error/success flags.
    pub fn state(&self) -> MutationState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to flag updates.
    pub fn watch(&self) -> watch::Receiver<MutationState> {
        self.state_rx.clone()
    }

    /// Insert a row.
    ///
    /// On success fires `on_data` with the stored entity and a success
    /// notice; on failure classifies, surfaces, and returns the error.
    pub async fn create(&self, data: JsonMap) -> Result<Entity> {
        self.begin("create");
        match self.backend.create(&self.table, data).await {
            Ok(entity) => {
                self.finish_ok("Record created.");
                self.callbacks.emit_data(&entity);
                Ok(entity)
            },
            Err(e) => Err(self.finish_err("create", e)),
        }
    }

    /// Update a row by id.
    pub async fn update(&self, id: &str, data: JsonMap) -> Result<Entity> {
        self.begin("update");
        match self.backend.update(&self.table, id, data).await {
            Ok(entity) => {
                self.finish_ok("Record updated.");
                self.callbacks.emit_data(&entity);
                Ok(entity)
            },
            Err(e) => Err(self.finish_err("update", e)),
        }
    }

    /// Delete a row by id. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.begin("delete");
        match self.backend.delete(&self.table, id).await {
            Ok(removed) => {
                self.finish_ok("Record deleted.");
                Ok(removed)
            },
            Err(e) => Err(self.finish_err("delete", e)),
        }
    }

    fn begin(&self, op: &str) {
        debug!("[realty-sync] {} on '{}' started", op, self.table);
        let _ = self.state_tx.send(MutationState::started());
    }

    fn finish_ok(&self, notice: &str) {
        let _ = self.state_tx.send(MutationState::success());
        self.callbacks.emit_notice(notice);
    }

    fn finish_err(&self, op: &str, err: BackendError) -> SyncError {
        let fault = SyncFault::from_backend(&err);
        warn!(
            "[realty-sync] {} on '{}' failed ({}): {}",
            op, self.table, fault.category, err
        );
        let _ = self.state_tx.send(MutationState::failed(fault.clone()));
        self.callbacks.emit_error(&fault);
        self.callbacks.emit_notice(&fault.message);
        SyncError::Backend(fault)
    }
}
