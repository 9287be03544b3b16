//! Progress reporting and cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{GenResult, GenerateError};

/// Sink for the human-readable progress strings the pipeline emits.
///
/// Implemented for any `Fn(&str)`, so callers can pass a closure that
/// prints, appends to a UI log, or collects into a vector.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message);
    }
}

/// Sink that drops every message, for callers that only want the result.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _message: &str) {}
}

/// Cooperative cancellation flag shared between the pipeline and its caller.
///
/// Cancellation is observed only at well-defined checkpoints: between
/// stages, between marker-row iterations and between per-juror copies. An
/// in-flight remote call always runs to completion.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops at its next checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Checkpoint: error out if cancellation has been requested.
    pub fn check(&self) -> GenResult<()> {
        if self.is_cancelled() {
            Err(GenerateError::Cancelled)
        } else {
            Ok(())
        }
    }
}
