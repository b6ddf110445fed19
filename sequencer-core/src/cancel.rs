//! Cooperative cancellation between actions.

use portable_atomic::{AtomicBool, Ordering};

/// A flag that asks a running sequence to stop before its next action.
///
/// Can live in a `static` and be set from any task or interrupt handler.
/// The sequencer only looks at it between actions, never mid-dispatch.
///
/// # Example
///
/// ```
/// use sequencer_core::CancelToken;
///
/// static CANCEL: CancelToken = CancelToken::new();
///
/// CANCEL.cancel();
/// assert!(CANCEL.is_cancelled());
/// CANCEL.reset();
/// assert!(!CANCEL.is_cancelled());
/// ```
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear a previous request so the token can be reused for another run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
