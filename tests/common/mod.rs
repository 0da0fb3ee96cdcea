//! Shared fakes for integration tests: a scripted table backend and a
//! scripted change feed that let tests drive fetch results and push change
//! records by hand.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

use realty_sync::{
    BackendError, ChangeFeed, ChangeRecord, CollectionState, Entity, FeedHandle, FilterParams,
    JsonMap, TableBackend,
};

/// Build a minimal entity owned by `tenant`.
pub fn entity(id: &str, tenant: &str) -> Entity {
    Entity::new(id, tenant)
}

/// Table backend with scripted results and call accounting.
pub struct ScriptedBackend {
    rows: Mutex<Vec<Entity>>,
    queued: Mutex<VecDeque<Vec<Entity>>>,
    fetch_calls: AtomicUsize,
    fetch_delay: Mutex<Duration>,
    fetch_log: Mutex<Vec<(String, FilterParams)>>,
    next_fetch_error: Mutex<Option<BackendError>>,
    next_write_error: Mutex<Option<BackendError>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            queued: Mutex::new(VecDeque::new()),
            fetch_calls: AtomicUsize::new(0),
            fetch_delay: Mutex::new(Duration::ZERO),
            fetch_log: Mutex::new(Vec::new()),
            next_fetch_error: Mutex::new(None),
            next_write_error: Mutex::new(None),
        })
    }

    /// Replace the rows the next fetches return.
    pub fn set_rows(&self, rows: Vec<Entity>) {
        *self.rows.lock().unwrap() = rows;
    }

    /// Queue a one-shot result consumed in call order, ahead of the default
    /// rows.  The result is fixed when the fetch starts, not when it
    /// resolves, so overlapping fetches observe distinct snapshots.
    pub fn queue_fetch(&self, rows: Vec<Entity>) {
        self.queued.lock().unwrap().push_back(rows);
    }

    /// Make every fetch take this long before resolving.
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    /// Fail the next fetch with `error`, then resume normal results.
    pub fn fail_next_fetch(&self, error: BackendError) {
        *self.next_fetch_error.lock().unwrap() = Some(error);
    }

    /// Fail the next create/update/delete with `error`.
    pub fn fail_next_write(&self, error: BackendError) {
        *self.next_write_error.lock().unwrap() = Some(error);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// The `(table, params)` arguments of every fetch so far.
    pub fn fetch_log(&self) -> Vec<(String, FilterParams)> {
        self.fetch_log.lock().unwrap().clone()
    }

    fn take_write_error(&self) -> Option<BackendError> {
        self.next_write_error.lock().unwrap().take()
    }
}

#[async_trait]
impl TableBackend for ScriptedBackend {
    async fn fetch(
        &self,
        table: &str,
        params: &FilterParams,
    ) -> Result<Vec<Entity>, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_log
            .lock()
            .unwrap()
            .push((table.to_string(), params.clone()));
        let queued = self.queued.lock().unwrap().pop_front();
        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.next_fetch_error.lock().unwrap().take() {
            return Err(error);
        }
        match queued {
            Some(rows) => Ok(rows),
            None => Ok(self.rows.lock().unwrap().clone()),
        }
    }

    async fn create(&self, _table: &str, data: JsonMap) -> Result<Entity, BackendError> {
        if let Some(error) = self.take_write_error() {
            return Err(error);
        }
        let value = serde_json::Value::Object(data);
        serde_json::from_value(value).map_err(|e| BackendError::new(e.to_string()))
    }

    async fn update(
        &self,
        _table: &str,
        id: &str,
        mut data: JsonMap,
    ) -> Result<Entity, BackendError> {
        if let Some(error) = self.take_write_error() {
            return Err(error);
        }
        data.insert("id".into(), serde_json::Value::String(id.to_string()));
        let value = serde_json::Value::Object(data);
        serde_json::from_value(value).map_err(|e| BackendError::new(e.to_string()))
    }

    async fn delete(&self, _table: &str, _id: &str) -> Result<bool, BackendError> {
        match self.take_write_error() {
            Some(error) => Err(error),
            None => Ok(true),
        }
    }
}

#[derive(Default)]
struct FeedLedger {
    opens: Vec<(String, String)>,
    closes: usize,
    concurrent: usize,
    max_concurrent: usize,
    tx: Option<mpsc::Sender<ChangeRecord>>,
    next_error: Option<BackendError>,
}

/// Change feed that records subscription lifecycles and lets tests push
/// records into the most recently opened subscription.
pub struct ScriptedFeed {
    ledger: Arc<Mutex<FeedLedger>>,
}

impl ScriptedFeed {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ledger: Arc::new(Mutex::new(FeedLedger::default())),
        })
    }

    /// Every `(table, tenant)` pair subscribed so far, in order.
    pub fn opens(&self) -> Vec<(String, String)> {
        self.ledger.lock().unwrap().opens.clone()
    }

    pub fn open_count(&self) -> usize {
        self.ledger.lock().unwrap().opens.len()
    }

    pub fn close_count(&self) -> usize {
        self.ledger.lock().unwrap().closes
    }

    /// Highest number of subscriptions that were ever open at once.
    pub fn max_concurrent(&self) -> usize {
        self.ledger.lock().unwrap().max_concurrent
    }

    /// Fail the next subscribe call with `error`.
    pub fn fail_next_subscribe(&self, error: BackendError) {
        self.ledger.lock().unwrap().next_error = Some(error);
    }

    /// Push a change record into the currently open subscription.
    pub fn push(&self, record: ChangeRecord) {
        let ledger = self.ledger.lock().unwrap();
        let tx = ledger.tx.as_ref().expect("no open subscription to push to");
        tx.try_send(record).expect("feed channel full");
    }
}

struct ScriptedHandle {
    ledger: Arc<Mutex<FeedLedger>>,
    open: bool,
}

#[async_trait]
impl FeedHandle for ScriptedHandle {
    async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.closes += 1;
        ledger.concurrent -= 1;
    }
}

#[async_trait]
impl ChangeFeed for ScriptedFeed {
    async fn subscribe(
        &self,
        table: &str,
        tenant_id: &str,
    ) -> Result<(Box<dyn FeedHandle>, mpsc::Receiver<ChangeRecord>), BackendError> {
        let (tx, rx) = mpsc::channel(32);
        let mut ledger = self.ledger.lock().unwrap();
        if let Some(error) = ledger.next_error.take() {
            return Err(error);
        }
        ledger.opens.push((table.to_string(), tenant_id.to_string()));
        ledger.concurrent += 1;
        ledger.max_concurrent = ledger.max_concurrent.max(ledger.concurrent);
        ledger.tx = Some(tx);
        let handle = ScriptedHandle {
            ledger: self.ledger.clone(),
            open: true,
        };
        Ok((Box::new(handle), rx))
    }
}

/// Block until the published collection state satisfies `pred`, or panic
/// after two seconds.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<CollectionState>,
    pred: impl Fn(&CollectionState) -> bool,
) -> CollectionState {
    {
        let current = rx.borrow();
        if pred(&current) {
            return current.clone();
        }
    }
    loop {
        timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("timed out waiting for collection state")
            .expect("state channel closed");
        let current = rx.borrow().clone();
        if pred(&current) {
            return current;
        }
    }
}

/// Poll `pred` every 10 ms until it holds, or panic after two seconds.
pub async fn wait_until(pred: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !pred() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not reached within two seconds");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
