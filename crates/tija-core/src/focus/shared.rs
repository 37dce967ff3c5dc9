use std::sync::{Arc, Mutex, PoisonError};

use super::clock::{Clock, SystemClock};
use super::tracker::FocusSessionTracker;

/// Thread-safe handle to one tracker.
///
/// Every operation on the tracker is short and non-blocking, so a single
/// mutex around the whole state is enough. Calls are applied in lock order.
#[derive(Debug)]
pub struct SharedTracker<C: Clock = SystemClock> {
    inner: Arc<Mutex<FocusSessionTracker<C>>>,
}

impl<C: Clock> Clone for SharedTracker<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedTracker<C> {
    pub fn new(tracker: FocusSessionTracker<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Run `f` with exclusive access to the tracker.
    pub fn with<R>(&self, f: impl FnOnce(&mut FocusSessionTracker<C>) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
