use crate::error::SyncFault;

/// Loading / error / success flags for one mutation coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationState {
    /// True while a mutation is in flight.
    pub busy: bool,
    /// Fault from the last mutation, if it failed.
    pub error: Option<SyncFault>,
    /// True when the last mutation succeeded.
    pub succeeded: bool,
}

impl MutationState {
    pub(crate) fn started() -> Self {
        Self {
            busy: true,
            error: None,
            succeeded: false,
        }
    }

    pub(crate) fn success() -> Self {
        Self {
            busy: false,
            error: None,
            succeeded: true,
        }
    }

    pub(crate) fn failed(fault: SyncFault) -> Self {
        Self {
            busy: false,
            error: Some(fault),
            succeeded: false,
        }
    }
}
