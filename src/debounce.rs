//! Debouncing for highlight and search passes
//!
//! Every buffer mutation schedules a pass. The pass runs only once the
//! buffer has been quiet for the debounce window; scheduling again before
//! then replaces the pending pass, so at most one is ever outstanding.
//!
//! This is a pure data structure with no I/O. The event loop calls
//! `schedule()` on each edit, sleeps for at most `time_until_due()` while
//! waiting for input, and calls `take_ready()` to learn when to run.

use std::time::{Duration, Instant};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: u64,
    due: Instant,
}

/// Single-flight, latest-wins delayed pass
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
    next_ticket: u64,
}

impl Debouncer {
    /// Creates a debouncer with the given window in milliseconds
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
            next_ticket: 0,
        }
    }

    /// Creates a debouncer with the default window (150ms)
    pub fn with_default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }

    /// Schedule a pass, superseding any pending one
    ///
    /// Returns the ticket of the new pass.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(old) = self.pending.replace(Pending {
            ticket,
            due: now + self.delay,
        }) {
            tracing::trace!(superseded = old.ticket, ticket, "pass rescheduled");
        }
        ticket
    }

    /// Drop the pending pass, if any
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How long until the pending pass is due; `None` if nothing is pending
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Claim the pending pass if its window has elapsed
    pub fn take_ready(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some(p) if now >= p.due => {
                self.pending = None;
                Some(p.ticket)
            }
            _ => None,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::with_default()
    }
}
