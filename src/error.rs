//! Error types and user-facing fault classification.
//!
//! Backend failures carry raw signals (codes, messages) that never reach
//! users directly.  [`ErrorCategory::classify`] buckets them into a small
//! taxonomy; each category maps to a single fixed wording
//! ([`ErrorCategory::user_message`]) that consumers show as a transient
//! notification.

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;

/// Errors returned by the sync engine's own API surface.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A classified backend failure (fetch or mutation path).
    #[error("{0}")]
    Backend(SyncFault),

    /// The client was configured incorrectly (builder misuse).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal coordination failure (e.g. the orchestrator task is gone).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for sync engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authorization / row-level-security rejection.
    PermissionDenied,
    /// Backend endpoint or credentials unavailable.
    ConfigurationMissing,
    /// Auth token invalid or expired.
    SessionExpired,
    /// The resolved identity has no tenant attached.
    NoTenant,
    /// Anything else.
    Unknown,
}

impl ErrorCategory {
    /// Classify a backend failure from its inspectable signals.
    ///
    /// Codes take priority over message substrings; unmatched errors fall
    /// back to [`ErrorCategory::Unknown`].
    pub fn classify(err: &BackendError) -> Self {
        if let Some(code) = err.code.as_deref() {
            match code {
                "42501" | "401" | "403" => return Self::PermissionDenied,
                "PGRST301" => return Self::SessionExpired,
                _ => {},
            }
        }

        let msg = err.message.to_ascii_lowercase();
        if msg.contains("permission denied") || msg.contains("row-level security") {
            Self::PermissionDenied
        } else if msg.contains("jwt") || (msg.contains("token") && msg.contains("expired")) {
            Self::SessionExpired
        } else if msg.contains("failed to fetch")
            || msg.contains("not configured")
            || msg.contains("missing configuration")
        {
            Self::ConfigurationMissing
        } else {
            Self::Unknown
        }
    }

    /// The single human-readable message shown for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "You do not have permission to access this data."
            },
            Self::ConfigurationMissing => {
                "The service is not reachable. Check the backend configuration."
            },
            Self::SessionExpired => "Your session has expired. Please sign in again.",
            Self::NoTenant => "No agency is associated with your account.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PermissionDenied => "permission-denied",
            Self::ConfigurationMissing => "configuration-missing",
            Self::SessionExpired => "session-expired",
            Self::NoTenant => "no-tenant",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A classified, user-presentable fault.
///
/// `message` is always the fixed per-category wording, never a raw backend
/// payload.  The raw payload goes to the log at `warn` level where the fault
/// is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncFault {
    /// Failure category.
    pub category: ErrorCategory,
    /// Human-readable message for this category.
    pub message: String,
}

impl SyncFault {
    /// Classify a backend error into a presentable fault.
    pub fn from_backend(err: &BackendError) -> Self {
        let category = ErrorCategory::classify(err);
        Self {
            category,
            message: category.user_message().to_string(),
        }
    }

    /// The fault raised when the resolved identity has no tenant.
    pub fn no_tenant() -> Self {
        Self {
            category: ErrorCategory::NoTenant,
            message: ErrorCategory::NoTenant.user_message().to_string(),
        }
    }
}

impl fmt::Display for SyncFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.category)
    }
}
