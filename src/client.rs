//! Sync client with builder pattern.
//!
//! The client wires the injected collaborators (table backend, change feed,
//! tenant resolution source) to live collections and mutators.

use std::sync::Arc;

use tokio::sync::watch;

use crate::backend::{ChangeFeed, TableBackend};
use crate::callbacks::SyncCallbacks;
use crate::error::{Result, SyncError};
use crate::live::LiveCollection;
use crate::models::{FilterParams, TenantState};
use crate::mutation::Mutator;
use crate::timings::SyncTimings;

/// Entry point for the sync engine.
///
/// Use [`SyncClient::builder`] to construct instances.  The client is cheap
/// to clone; every [`live`](Self::live) call spawns an independent
/// orchestrator.
#[derive(Clone)]
pub struct SyncClient {
    backend: Arc<dyn TableBackend>,
    feed: Arc<dyn ChangeFeed>,
    tenant_rx: watch::Receiver<TenantState>,
    timings: SyncTimings,
    callbacks: SyncCallbacks,
}

impl SyncClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> SyncClientBuilder {
        SyncClientBuilder::new()
    }

    /// Open a live collection for `table` under `params`.
    ///
    /// The collection fetches immediately (once the tenant resolves),
    /// subscribes to the change feed, and keeps itself updated until the
    /// handle is closed or dropped.
    pub fn live(&self, table: impl Into<String>, params: FilterParams) -> LiveCollection {
        LiveCollection::spawn(
            self.backend.clone(),
            self.feed.clone(),
            self.tenant_rx.clone(),
            table.into(),
            params,
            self.timings.clone(),
            self.callbacks.clone(),
        )
    }

    /// Create a write coordinator for `table`.
    pub fn mutator(&self, table: impl Into<String>) -> Mutator {
        Mutator::new(self.backend.clone(), table.into(), self.callbacks.clone())
    }

    /// The configured timings.
    pub fn timings(&self) -> &SyncTimings {
        &self.timings
    }

    /// Current tenant resolution snapshot.
    pub fn tenant(&self) -> TenantState {
        self.tenant_rx.borrow().clone()
    }
}

/// Builder for [`SyncClient`] instances.
#[derive(Default)]
pub struct SyncClientBuilder {
    backend: Option<Arc<dyn TableBackend>>,
    feed: Option<Arc<dyn ChangeFeed>>,
    tenant_rx: Option<watch::Receiver<TenantState>>,
    timings: SyncTimings,
    callbacks: SyncCallbacks,
}

impl SyncClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the table backend (required).
    pub fn backend(mut self, backend: Arc<dyn TableBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the change feed (required).
    pub fn feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Set the tenant resolution source (required).
    pub fn tenant_source(mut self, rx: watch::Receiver<TenantState>) -> Self {
        self.tenant_rx = Some(rx);
        self
    }

    /// Set custom timings.
    pub fn timings(mut self, timings: SyncTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Set notification callbacks.
    pub fn callbacks(mut self, callbacks: SyncCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SyncClient> {
        let backend = self
            .backend
            .ok_or_else(|| SyncError::ConfigurationError("backend is required".into()))?;
        let feed = self
            .feed
            .ok_or_else(|| SyncError::ConfigurationError("feed is required".into()))?;
        let tenant_rx = self
            .tenant_rx
            .ok_or_else(|| SyncError::ConfigurationError("tenant_source is required".into()))?;

        Ok(SyncClient {
            backend,
            feed,
            tenant_rx,
            timings: self.timings,
            callbacks: self.callbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_collaborators() {
        let result = SyncClient::builder().build();
        assert!(matches!(result, Err(SyncError::ConfigurationError(_))));
    }
}
