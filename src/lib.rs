//! # realty-sync
//!
//! Realtime tenant-scoped collection synchronization for the Realty agency
//! backend.  The engine fetches filtered collections, keeps them live via a
//! change-feed subscription, coalesces bursts of change events into single
//! refetches, and suppresses redundant state updates through deep equality
//! checks, all against injected backend traits so any database client can
//! sit underneath.
//!
//! ## Guarantees
//!
//! - At most one fetch in flight per scope (drop-if-busy); stale results are
//!   discarded by generation token before they can touch state.
//! - Exactly one open change-feed subscription per `(table, tenant)` pair;
//!   the old handle is closed before the next one opens.
//! - Change events are tenant-filtered; foreign-tenant events never trigger
//!   a refetch.
//! - Trailing-edge debounce (default 1 s) coalesces event bursts.
//! - Closing or dropping a [`LiveCollection`] stops all state mutation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use realty_sync::{FilterParams, SyncCallbacks, SyncClient, TenantState};
//! # use realty_sync::{BackendError, ChangeFeed, ChangeRecord, Entity, FeedHandle, JsonMap, TableBackend};
//! # use async_trait::async_trait;
//! # struct Pg;
//! # #[async_trait]
//! # impl TableBackend for Pg {
//! #     async fn fetch(&self, _: &str, _: &FilterParams) -> Result<Vec<Entity>, BackendError> { Ok(vec![]) }
//! #     async fn create(&self, _: &str, _: JsonMap) -> Result<Entity, BackendError> { Err(BackendError::new("todo")) }
//! #     async fn update(&self, _: &str, _: &str, _: JsonMap) -> Result<Entity, BackendError> { Err(BackendError::new("todo")) }
//! #     async fn delete(&self, _: &str, _: &str) -> Result<bool, BackendError> { Ok(false) }
//! # }
//! # struct Feed;
//! # #[async_trait]
//! # impl ChangeFeed for Feed {
//! #     async fn subscribe(&self, _: &str, _: &str) -> Result<(Box<dyn FeedHandle>, tokio::sync::mpsc::Receiver<ChangeRecord>), BackendError> {
//! #         Err(BackendError::new("todo"))
//! #     }
//! # }
//! # async fn example() -> realty_sync::Result<()> {
//! let (_tenant_tx, tenant_rx) =
//!     tokio::sync::watch::channel(TenantState::resolved("agency-1"));
//!
//! let client = SyncClient::builder()
//!     .backend(Arc::new(Pg))
//!     .feed(Arc::new(Feed))
//!     .tenant_source(tenant_rx)
//!     .callbacks(SyncCallbacks::new().on_notice(|msg| println!("{msg}")))
//!     .build()?;
//!
//! let properties = client.live("properties", FilterParams::new());
//! let mut updates = properties.watch();
//! while updates.changed().await.is_ok() {
//!     println!("{} rows", updates.borrow().rows.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod callbacks;
pub mod client;
pub mod error;
pub mod live;
pub mod models;
pub mod mutation;
pub mod timings;

mod debounce;
mod equality;
mod feed;
mod fetch;

pub use backend::{BackendError, ChangeFeed, FeedHandle, JsonMap, TableBackend};
pub use callbacks::SyncCallbacks;
pub use client::{SyncClient, SyncClientBuilder};
pub use equality::snapshots_equal;
pub use error::{ErrorCategory, Result, SyncError, SyncFault};
pub use live::LiveCollection;
pub use models::{
    ChangeKind, ChangeRecord, CollectionState, Entity, FilterParams, MutationState, Scope,
    TenantState,
};
pub use mutation::Mutator;
pub use timings::{SyncTimings, SyncTimingsBuilder};
