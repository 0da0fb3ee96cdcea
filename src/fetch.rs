//! Fetch coordination: one in-flight request per scope, generation-guarded
//! results.
//!
//! Each fetch runs in its own spawned task and reports back over a bounded
//! channel with the generation it was started under.  The coordinator owns a
//! monotonically increasing generation counter: committing a new scope
//! supersedes the old generation, and any outcome carrying a stale
//! generation is discarded at [`FetchCoordinator::accept`] before it can
//! touch state.
//!
//! Same-scope overlap is drop-if-busy: a request while one is already in
//! flight for the current generation is ignored.  The debounce layer re-arms
//! on subsequent change events, so a snapshot left stale by a dropped
//! request heals on the next quiescence window.

use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc;

use crate::backend::{BackendError, TableBackend};
use crate::models::{Entity, Scope};

/// Completed fetch, tagged with the generation it was started under.
#[derive(Debug)]
pub(crate) struct FetchOutcome {
    pub generation: u64,
    pub result: Result<Vec<Entity>, BackendError>,
}

pub(crate) struct FetchCoordinator {
    backend: Arc<dyn TableBackend>,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    generation: u64,
    in_flight: bool,
}

impl FetchCoordinator {
    pub fn new(backend: Arc<dyn TableBackend>, outcome_tx: mpsc::Sender<FetchOutcome>) -> Self {
        Self {
            backend,
            outcome_tx,
            generation: 0,
            in_flight: false,
        }
    }

    /// Invalidate the current generation.
    ///
    /// Outcomes of any fetch started before this call will be discarded on
    /// arrival.  Called whenever the committed scope changes or is cleared.
    pub fn supersede(&mut self) {
        self.generation += 1;
        self.in_flight = false;
    }

    /// Start a fetch for `scope` unless one is already in flight for the
    /// current generation.  Returns whether a fetch was started.
    pub fn request(&mut self, scope: &Scope) -> bool {
        if self.in_flight {
            debug!(
                "[realty-sync] Dropping overlapping fetch for {} (gen={})",
                scope, self.generation
            );
            return false;
        }
        self.in_flight = true;

        let generation = self.generation;
        let backend = self.backend.clone();
        let outcome_tx = self.outcome_tx.clone();
        let table = scope.table.clone();
        let params = scope.params.clone();

        tokio::spawn(async move {
            let result = backend.fetch(&table, &params).await;
            // Receiver gone means the orchestrator shut down; nothing to do.
            let _ = outcome_tx
                .send(FetchOutcome { generation, result })
                .await;
        });
        true
    }

    /// Validate an outcome against the current generation.
    ///
    /// Returns `None` for stale outcomes; the caller must not apply them.
    pub fn accept(
        &mut self,
        outcome: FetchOutcome,
    ) -> Option<Result<Vec<Entity>, BackendError>> {
        if outcome.generation != self.generation {
            debug!(
                "[realty-sync] Discarding stale fetch result (gen={} current={})",
                outcome.generation, self.generation
            );
            return None;
        }
        self.in_flight = false;
        Some(outcome.result)
    }
}
