//! Cooperative cancellation for long tree walks.
//!
//! Walkers poll the flag between moves, never inside apply/reverse, so
//! a stop always leaves the position at a ply boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A shared stop request. Clones observe the same flag.
#[derive(Clone, Debug)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Create a new stop flag (initially not stopped).
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Create a stop flag that is already set.
    #[must_use]
    pub fn stopped() -> Self {
        StopFlag(Arc::new(AtomicBool::new(true)))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Raise the flag from a background thread once `delay` has passed.
    pub fn stop_after(&self, delay: Duration) -> thread::JoinHandle<()> {
        let flag = self.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            flag.stop();
        })
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}
