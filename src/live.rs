//! Live collection orchestration.
//!
//! [`LiveCollection`] is the consumer-facing handle for one tenant-scoped,
//! live-updated collection.  All coordination happens in a background
//! orchestrator task that owns the fetch coordinator, the feed manager, and
//! the debounce timer, and reacts to:
//!
//! - commands from the handle (`set_params`, `refetch`, shutdown)
//! - tenant resolution changes from the injected watch channel
//! - change-feed events (tenant-filtered, debounced into refetches)
//! - fetch outcomes (generation-checked before any state write)
//!
//! State is published over a `tokio::sync::watch` channel; the watch value is
//! only replaced when it actually changed, so consumers are never notified
//! redundantly.  Dropping the handle (or calling [`LiveCollection::close`])
//! shuts the task down; pending fetch outcomes and armed debounce deadlines
//! die with it and can no longer mutate state.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::backend::{ChangeFeed, TableBackend};
use crate::callbacks::SyncCallbacks;
use crate::debounce::DebounceTimer;
use crate::equality::snapshots_equal;
use crate::error::{Result, SyncError, SyncFault};
use crate::fetch::{FetchCoordinator, FetchOutcome};
use crate::feed::FeedManager;
use crate::models::{
    ChangeRecord, CollectionState, Entity, FilterParams, Scope, TenantState,
};
use crate::timings::SyncTimings;

/// Capacity for the handle→orchestrator command channel.
const CMD_CHANNEL_CAPACITY: usize = 32;

/// Capacity for the fetch outcome channel.  At most one outcome per
/// generation is ever outstanding, so a small buffer suffices.
const OUTCOME_CHANNEL_CAPACITY: usize = 4;

// ── Commands ────────────────────────────────────────────────────────────────

enum LiveCmd {
    SetParams(FilterParams),
    Refetch,
    Shutdown,
}

// ── LiveCollection (public handle) ──────────────────────────────────────────

/// Handle to one live, tenant-scoped collection.
///
/// Obtained from [`SyncClient::live`](crate::SyncClient::live).  Consumers
/// read the current [`CollectionState`] with [`state`](Self::state) or
/// subscribe to updates with [`watch`](Self::watch).
pub struct LiveCollection {
    cmd_tx: mpsc::Sender<LiveCmd>,
    state_rx: watch::Receiver<CollectionState>,
    _task: JoinHandle<()>,
    closed: bool,
}

impl LiveCollection {
    pub(crate) fn spawn(
        backend: Arc<dyn TableBackend>,
        feed: Arc<dyn ChangeFeed>,
        tenant_rx: watch::Receiver<TenantState>,
        table: String,
        params: FilterParams,
        timings: SyncTimings,
        callbacks: SyncCallbacks,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(CollectionState::initial());

        let task = tokio::spawn(orchestrator_task(
            backend, feed, tenant_rx, table, params, timings, callbacks, cmd_rx, state_tx,
        ));

        Self {
            cmd_tx,
            state_rx,
            _task: task,
            closed: false,
        }
    }

    /// Current state snapshot (rows, loading flag, last fault).
    pub fn state(&self) -> CollectionState {
        self.state_rx.borrow().clone()
    }

    /// Convenience accessor for the current rows.
    pub fn rows(&self) -> Arc<Vec<Entity>> {
        self.state_rx.borrow().rows.clone()
    }

    /// Subscribe to state updates.
    ///
    /// The receiver is only notified when the state actually changed; a
    /// refetch returning identical data does not wake watchers.
    pub fn watch(&self) -> watch::Receiver<CollectionState> {
        self.state_rx.clone()
    }

    /// Replace the filter parameters.
    ///
    /// A no-op when the new params are deeply equal to the committed ones;
    /// otherwise the scope is recomputed, a fresh fetch starts, and the
    /// subscription follows the new scope.
    pub async fn set_params(&self, params: FilterParams) -> Result<()> {
        self.send(LiveCmd::SetParams(params)).await
    }

    /// Request a manual refresh.
    ///
    /// Follows the same drop-if-busy path as event-triggered refetches: at
    /// most one fetch per scope is in flight.
    pub async fn refetch(&self) -> Result<()> {
        self.send(LiveCmd::Refetch).await
    }

    /// Shut the orchestrator down, closing the subscription.
    ///
    /// Safe to call multiple times; subsequent calls are no-ops.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.cmd_tx.send(LiveCmd::Shutdown).await;
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    async fn send(&self, cmd: LiveCmd) -> Result<()> {
        self.cmd_tx.send(cmd).await.map_err(|_| {
            SyncError::InternalError("live collection is closed".to_string())
        })
    }
}

impl Drop for LiveCollection {
    fn drop(&mut self) {
        // Best-effort shutdown signal; if the channel is full or closed the
        // orchestrator exits anyway once all senders are gone.
        if !self.closed {
            let _ = self.cmd_tx.try_send(LiveCmd::Shutdown);
        }
    }
}

// ── Background orchestrator task ────────────────────────────────────────────

/// Receive the next feed record, or park forever when no feed is open.
async fn next_record(rx: &mut Option<mpsc::Receiver<ChangeRecord>>) -> Option<ChangeRecord> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn orchestrator_task(
    backend: Arc<dyn TableBackend>,
    feed: Arc<dyn ChangeFeed>,
    mut tenant_rx: watch::Receiver<TenantState>,
    table: String,
    mut params: FilterParams,
    timings: SyncTimings,
    callbacks: SyncCallbacks,
    mut cmd_rx: mpsc::Receiver<LiveCmd>,
    state_tx: watch::Sender<CollectionState>,
) {
    let (outcome_tx, mut outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
    let mut fetcher = FetchCoordinator::new(backend, outcome_tx);
    let mut feeds = FeedManager::new(feed, &timings);
    let mut debounce = DebounceTimer::new(timings.debounce_window);

    let mut committed: Option<Scope> = None;
    let mut feed_rx: Option<mpsc::Receiver<ChangeRecord>> = None;
    let mut snapshot: Arc<Vec<Entity>> = Arc::new(Vec::new());
    let mut tenant_alive = true;

    // Initial pass against whatever the tenant source currently holds.
    sync_scope(
        &table, &params, &tenant_rx, &mut committed, &mut fetcher, &mut feeds, &mut feed_rx,
        &mut debounce, &mut snapshot, &state_tx, &callbacks,
    )
    .await;

    loop {
        let deadline = debounce.deadline();
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(LiveCmd::SetParams(new_params)) => {
                        params = new_params;
                        sync_scope(
                            &table, &params, &tenant_rx, &mut committed, &mut fetcher,
                            &mut feeds, &mut feed_rx, &mut debounce, &mut snapshot,
                            &state_tx, &callbacks,
                        )
                        .await;
                    },
                    Some(LiveCmd::Refetch) => {
                        if let Some(scope) = &committed {
                            if fetcher.request(scope) {
                                publish(&state_tx, snapshot.clone(), true, None);
                            }
                        }
                    },
                    Some(LiveCmd::Shutdown) | None => break,
                }
            }

            changed = tenant_rx.changed(), if tenant_alive => {
                if changed.is_err() {
                    // Tenant source dropped; keep serving the last resolution.
                    warn!("[realty-sync] Tenant resolution source dropped");
                    tenant_alive = false;
                } else {
                    sync_scope(
                        &table, &params, &tenant_rx, &mut committed, &mut fetcher,
                        &mut feeds, &mut feed_rx, &mut debounce, &mut snapshot,
                        &state_tx, &callbacks,
                    )
                    .await;
                }
            }

            outcome = outcome_rx.recv() => {
                match outcome {
                    Some(outcome) => apply_outcome(
                        outcome, &mut fetcher, &mut snapshot, &state_tx, &callbacks,
                    ),
                    // All senders live in the coordinator; unreachable while
                    // `fetcher` exists, but exit cleanly rather than spin.
                    None => break,
                }
            }

            record = next_record(&mut feed_rx) => {
                match record {
                    Some(record) => {
                        let accepted = committed
                            .as_ref()
                            .is_some_and(|s| FeedManager::accepts(&record, &s.tenant_id));
                        if accepted {
                            debug!(
                                "[realty-sync] {:?} event accepted, arming refetch window",
                                record.kind
                            );
                            debounce.arm();
                        }
                    },
                    None => {
                        warn!("[realty-sync] Change feed stream ended; live updates degraded");
                        feed_rx = None;
                        feeds.close_current().await;
                    },
                }
            }

            _ = tokio::time::sleep_until(deadline), if debounce.is_armed() => {
                debounce.cancel();
                if let Some(scope) = &committed {
                    if fetcher.request(scope) {
                        publish(&state_tx, snapshot.clone(), true, None);
                    }
                }
            }
        }
    }

    feeds.close_current().await;
    debug!("[realty-sync] Orchestrator for table '{}' shut down", table);
}

/// Recompute the candidate scope and reconcile fetch + subscription.
///
/// Implements the lifecycle algorithm: deep-compare against the committed
/// scope, no-op when unchanged; otherwise wait (tenant resolving), fault
/// (no tenant), or commit + fetch + re-subscribe with close-before-open.
#[allow(clippy::too_many_arguments)]
async fn sync_scope(
    table: &str,
    params: &FilterParams,
    tenant_rx: &watch::Receiver<TenantState>,
    committed: &mut Option<Scope>,
    fetcher: &mut FetchCoordinator,
    feeds: &mut FeedManager,
    feed_rx: &mut Option<mpsc::Receiver<ChangeRecord>>,
    debounce: &mut DebounceTimer,
    snapshot: &mut Arc<Vec<Entity>>,
    state_tx: &watch::Sender<CollectionState>,
    callbacks: &SyncCallbacks,
) {
    let tenant = tenant_rx.borrow().clone();

    if tenant.resolving {
        // Waiting state: nothing in flight, nothing subscribed. The last
        // snapshot stays visible under the loading flag.
        fetcher.supersede();
        debounce.cancel();
        feeds.close_current().await;
        *feed_rx = None;
        *committed = None;
        publish(state_tx, snapshot.clone(), true, None);
        return;
    }

    let Some(tenant_id) = tenant.tenant_id else {
        fetcher.supersede();
        debounce.cancel();
        feeds.close_current().await;
        *feed_rx = None;
        *committed = None;

        let fault = SyncFault::no_tenant();
        warn!("[realty-sync] {} for table '{}'", fault, table);
        *snapshot = Arc::new(Vec::new());
        publish(state_tx, snapshot.clone(), false, Some(fault.clone()));
        callbacks.emit_error(&fault);
        callbacks.emit_notice(&fault.message);
        return;
    };

    let candidate = Scope::new(tenant_id, table, params.clone());
    if committed.as_ref() == Some(&candidate) {
        debug!("[realty-sync] Scope {} unchanged, nothing to do", candidate);
        return;
    }

    debug!("[realty-sync] Committing scope {}", candidate);
    fetcher.supersede();
    debounce.cancel();
    fetcher.request(&candidate);
    publish(state_tx, snapshot.clone(), true, None);

    match feeds.ensure_open(&candidate).await {
        Ok(Some(rx)) => *feed_rx = Some(rx),
        Ok(None) => {},
        Err(_) => {
            // Degraded but functional: initial fetch stands, no live updates.
            *feed_rx = None;
        },
    }

    *committed = Some(candidate);
}

/// Apply a completed fetch, discarding stale generations first.
fn apply_outcome(
    outcome: FetchOutcome,
    fetcher: &mut FetchCoordinator,
    snapshot: &mut Arc<Vec<Entity>>,
    state_tx: &watch::Sender<CollectionState>,
    callbacks: &SyncCallbacks,
) {
    let Some(result) = fetcher.accept(outcome) else {
        return;
    };

    match result {
        Ok(rows) => {
            if snapshots_equal(&rows, snapshot) {
                // Same data: keep the existing Arc so watchers holding the
                // old reference see no change.
                publish(state_tx, snapshot.clone(), false, None);
            } else {
                *snapshot = Arc::new(rows);
                publish(state_tx, snapshot.clone(), false, None);
            }
        },
        Err(backend_err) => {
            let fault = SyncFault::from_backend(&backend_err);
            warn!(
                "[realty-sync] Fetch failed ({}): {}",
                fault.category, backend_err
            );
            *snapshot = Arc::new(Vec::new());
            publish(state_tx, snapshot.clone(), false, Some(fault.clone()));
            callbacks.emit_error(&fault);
            callbacks.emit_notice(&fault.message);
        },
    }
}

/// Replace the watch value only when it actually changed.
fn publish(
    state_tx: &watch::Sender<CollectionState>,
    rows: Arc<Vec<Entity>>,
    loading: bool,
    error: Option<SyncFault>,
) {
    let next = CollectionState {
        rows,
        loading,
        error,
    };
    state_tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
