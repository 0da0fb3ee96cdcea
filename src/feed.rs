//! Change-feed subscription management.
//!
//! One subscription per `(table, tenant)` pair, with a strict
//! `Closed → Opening → Open → Closed` lifecycle.  The manager is owned by a
//! single orchestrator task and all transitions are awaited inline, so the
//! close of a superseded handle always completes before the next open
//! starts, so duplicate or crossed event delivery cannot occur.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::backend::{BackendError, ChangeFeed, FeedHandle};
use crate::models::{ChangeRecord, Scope};
use crate::timings::SyncTimings;

/// Lifecycle of the current subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedState {
    Closed,
    Opening,
    Open,
}

struct OpenFeed {
    scope: Scope,
    handle: Box<dyn FeedHandle>,
}

pub(crate) struct FeedManager {
    feed: Arc<dyn ChangeFeed>,
    open_timeout: std::time::Duration,
    current: Option<OpenFeed>,
    state: FeedState,
}

impl FeedManager {
    pub fn new(feed: Arc<dyn ChangeFeed>, timings: &SyncTimings) -> Self {
        Self {
            feed,
            open_timeout: timings.feed_open_timeout,
            current: None,
            state: FeedState::Closed,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> FeedState {
        self.state
    }

    /// True when the current handle serves `scope`'s `(table, tenant)` key.
    pub fn is_open_for(&self, scope: &Scope) -> bool {
        matches!(self.state, FeedState::Open | FeedState::Opening)
            && self
                .current
                .as_ref()
                .is_some_and(|f| f.scope.same_feed(scope))
    }

    /// Ensure exactly one open subscription for `scope`.
    ///
    /// No-op (`Ok(None)`) when the current handle already serves the same
    /// `(table, tenant)` key; a params-only scope change re-fetches without
    /// re-subscribing.  Otherwise the previous handle is closed first, then
    /// a new one opened; `Ok(Some(rx))` carries the new event receiver.
    pub async fn ensure_open(
        &mut self,
        scope: &Scope,
    ) -> Result<Option<mpsc::Receiver<ChangeRecord>>, BackendError> {
        if self.is_open_for(scope) {
            debug!("[realty-sync] Subscription for {} already open", scope);
            return Ok(None);
        }

        self.close_current().await;
        self.state = FeedState::Opening;

        let subscribe = self.feed.subscribe(&scope.table, &scope.tenant_id);
        let result = if SyncTimings::is_no_timeout(self.open_timeout) {
            subscribe.await
        } else {
            match tokio::time::timeout(self.open_timeout, subscribe).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::new(format!(
                    "subscribe timed out after {:?}",
                    self.open_timeout
                ))),
            }
        };

        match result {
            Ok((handle, rx)) => {
                self.current = Some(OpenFeed {
                    scope: scope.clone(),
                    handle,
                });
                self.state = FeedState::Open;
                debug!("[realty-sync] Subscription open for {}", scope);
                Ok(Some(rx))
            },
            Err(e) => {
                self.state = FeedState::Closed;
                warn!("[realty-sync] Failed to open subscription for {}: {}", scope, e);
                Err(e)
            },
        }
    }

    /// Close the current handle, if any, and wait for the release.
    pub async fn close_current(&mut self) {
        if let Some(mut open) = self.current.take() {
            debug!("[realty-sync] Closing subscription for {}", open.scope);
            open.handle.close().await;
        }
        self.state = FeedState::Closed;
    }

    /// Event admission: the record's tenant must match the active scope's.
    ///
    /// Kind admission is total over [`ChangeKind`](crate::ChangeKind); the
    /// feed adapter's strict deserialization already rejects other kinds.
    pub fn accepts(record: &ChangeRecord, tenant_id: &str) -> bool {
        match record.tenant_id() {
            Some(owner) if owner == tenant_id => true,
            Some(other) => {
                debug!(
                    "[realty-sync] Dropping {:?} event for foreign tenant {}",
                    record.kind, other
                );
                false
            },
            None => {
                debug!("[realty-sync] Dropping {:?} event with no row payload", record.kind);
                false
            },
        }
    }
}
