use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Work was abandoned because the host asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Computation cancelled")]
pub struct Cancelled;

/// Trait for checking if computation should be cancelled
pub trait CancellationChecker: Clone + Send + Sync {
    /// Returns true if computation should be cancelled
    fn is_cancelled(&self) -> bool;

    /// `Err(Cancelled)` once cancellation was requested.
    #[inline]
    fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Never cancels - for single-threaded or non-cancellable contexts
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Checks an atomic boolean flag for cancellation
#[derive(Clone, Debug)]
pub struct AtomicBoolChecker {
    flag: Arc<AtomicBool>,
}

impl AtomicBoolChecker {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl CancellationChecker for AtomicBoolChecker {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Host-side cancellation source. Clones share one flag; hand
/// [`checker`](Self::checker) to the computation and call
/// [`cancel`](Self::cancel) from anywhere.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Re-arm the token for the next frame.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    pub fn checker(&self) -> AtomicBoolChecker {
        AtomicBoolChecker::new(Arc::clone(&self.flag))
    }
}

impl CancellationChecker for CancelToken {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
