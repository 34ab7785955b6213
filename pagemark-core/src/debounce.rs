//! A cancelable single-slot timer for collapsing bursts of saves

use std::time::Duration;
use tokio::time::Instant;

/// Holds at most one pending value that becomes due after a quiet window
///
/// Every `schedule` replaces the pending value and restarts the window, so only
/// the last value of a burst is ever released.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the window from `now`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            deadline: now + self.delay,
            value,
        });
    }

    /// Release the pending value if its window has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Drop the pending value without releasing it, returning it to the caller
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Swap in a newer value for the pending one, keeping its deadline
    ///
    /// Does nothing when no value is pending.
    pub fn refresh(&mut self, value: T) {
        if let Some(pending) = &mut self.pending {
            pending.value = value;
        }
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}
