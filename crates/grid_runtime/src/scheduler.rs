//! Trailing-debounce bookkeeping for snapshot writes.
//!
//! The scheduler does not own a timer. Callers request a write, arm a timer with the returned
//! ticket, and ask [`PersistScheduler::fire`] when it elapses; only the newest ticket wins.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistScheduler {
    quiet_period: Duration,
    generation: u64,
    pending: bool,
}

impl PersistScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            generation: 0,
            pending: false,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Changes the quiet period for timers armed from now on. Outstanding tickets stay valid.
    pub fn set_quiet_period(&mut self, quiet_period: Duration) {
        self.quiet_period = quiet_period;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Registers a state change. Any earlier ticket is superseded.
    pub fn request(&mut self) -> PersistTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        PersistTicket(self.generation)
    }

    /// Returns `true` when `ticket` is the latest request and the write should run now.
    pub fn fire(&mut self, ticket: PersistTicket) -> bool {
        if !self.pending || ticket.0 != self.generation {
            return false;
        }
        self.pending = false;
        true
    }

    /// Drops any pending write.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}
