//! User-facing notification callbacks.
//!
//! Hosts bridge these into their own toast / notification system:
//!
//! - [`on_error`](SyncCallbacks::on_error): fired with the classified fault
//!   whenever a fetch or mutation fails
//! - [`on_notice`](SyncCallbacks::on_notice): transient human-readable
//!   message (error wording or mutation success confirmation)
//! - [`on_data`](SyncCallbacks::on_data): fired with the stored entity after
//!   a successful create/update
//!
//! All callbacks are optional and `Send + Sync` so they can be invoked from
//! the orchestrator's background task.

use std::fmt;
use std::sync::Arc;

use crate::error::SyncFault;
use crate::models::Entity;

/// Type alias for the on_error callback.
pub type OnErrorCallback = Arc<dyn Fn(&SyncFault) + Send + Sync>;

/// Type alias for the on_notice callback.
pub type OnNoticeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Type alias for the on_data callback.
pub type OnDataCallback = Arc<dyn Fn(&Entity) + Send + Sync>;

/// Optional notification callbacks, registered builder-style.
#[derive(Clone, Default)]
pub struct SyncCallbacks {
    pub(crate) on_error: Option<OnErrorCallback>,
    pub(crate) on_notice: Option<OnNoticeCallback>,
    pub(crate) on_data: Option<OnDataCallback>,
}

impl fmt::Debug for SyncCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCallbacks")
            .field("on_error", &self.on_error.is_some())
            .field("on_notice", &self.on_notice.is_some())
            .field("on_data", &self.on_data.is_some())
            .finish()
    }
}

impl SyncCallbacks {
    /// Create an empty registry (no callbacks).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked with every classified fault.
    pub fn on_error(mut self, f: impl Fn(&SyncFault) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked with every transient user notification.
    pub fn on_notice(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_notice = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked with the stored entity after a
    /// successful create or update.
    pub fn on_data(mut self, f: impl Fn(&Entity) + Send + Sync + 'static) -> Self {
        self.on_data = Some(Arc::new(f));
        self
    }

    // ---------------------------------------------------------------
    // Internal dispatch helpers
    // ---------------------------------------------------------------

    pub(crate) fn emit_error(&self, fault: &SyncFault) {
        if let Some(cb) = &self.on_error {
            cb(fault);
        }
    }

    pub(crate) fn emit_notice(&self, message: &str) {
        if let Some(cb) = &self.on_notice {
            cb(message);
        }
    }

    pub(crate) fn emit_data(&self, entity: &Entity) {
        if let Some(cb) = &self.on_data {
            cb(entity);
        }
    }
}
