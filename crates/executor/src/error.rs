use thiserror::Error;

use autoreact_state::StateError;

/// Errors that abort processing of a single message.
///
/// Downstream failures are not errors here; they are classified and
/// reported through [`ProcessOutcome`](crate::ProcessOutcome).
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Shutdown was signaled while the processor was suspended.
    #[error("processing cancelled")]
    Cancelled,

    /// The settings store failed.
    #[error("settings store error: {0}")]
    State(#[from] StateError),
}

impl ProcessError {
    /// Whether this error must stop the worker instead of being absorbed.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
