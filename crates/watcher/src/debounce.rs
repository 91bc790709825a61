//! Refresh debouncing
//!
//! Collapses bursts of triggers (layout changes, store events, repeated
//! file notifications for one logical write) into a single execution.
//! Time is passed in by the caller so the host's event loop stays in
//! charge of scheduling.

use std::time::{Duration, Instant};

/// Default quiet period
pub const DEFAULT_WAIT: Duration = Duration::from_millis(50);

/// Default cap on how long a continuous burst can defer execution
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(250);

/// Leading/trailing edge debouncer
///
/// Trailing mode: every trigger pushes the deadline to `now + wait`
/// (never past `burst_start + max_wait`); one execution happens when the
/// deadline passes.
///
/// Leading mode: the first trigger of an idle debouncer executes at once;
/// triggers during the following window produce one trailing execution.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    max_wait: Duration,
    leading: bool,
    /// First trigger of the current burst
    burst_start: Option<Instant>,
    /// When the current window closes
    deadline: Option<Instant>,
    /// A trailing execution is owed when the window closes
    pending: bool,
}

impl Debouncer {
    /// Trailing-edge debouncer with the given quiet period
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            max_wait: wait.max(DEFAULT_MAX_WAIT),
            leading: false,
            burst_start: None,
            deadline: None,
            pending: false,
        }
    }

    /// Set the burst cap (clamped to at least `wait`)
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait.max(self.wait);
        self
    }

    /// Also execute on the leading edge
    pub fn with_leading_edge(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Record a trigger
    ///
    /// Returns `true` when the caller should execute right now (leading edge).
    pub fn trigger(&mut self, now: Instant) -> bool {
        match (self.burst_start, self.deadline) {
            (Some(start), Some(_)) => {
                self.pending = true;
                self.deadline = Some((now + self.wait).min(start + self.max_wait));
                false
            }
            _ => {
                self.burst_start = Some(now);
                self.deadline = Some(now + self.wait);
                self.pending = !self.leading;
                self.leading
            }
        }
    }

    /// Check the window
    ///
    /// Returns `true` exactly once per burst when a trailing execution is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                let fire = self.pending;
                self.reset();
                fire
            }
            _ => false,
        }
    }

    /// When `poll` next needs to be called, if a window is open
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a trailing execution is owed
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drop any owed execution and close the window
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.burst_start = None;
        self.deadline = None;
        self.pending = false;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT)
    }
}
