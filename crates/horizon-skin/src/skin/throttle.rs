//! Redraw coalescing.

use std::time::{Duration, Instant};

/// Rate limiter for forced window updates.
///
/// At most one update is allowed per interval. Requests made in between are
/// remembered and become due once the interval has elapsed; a command
/// session ending flushes immediately.
#[derive(Debug, Clone)]
pub struct UpdateThrottle {
    interval: Duration,
    last: Option<Instant>,
    pending: bool,
}

impl UpdateThrottle {
    /// Create a throttle with the given minimum interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            pending: false,
        }
    }

    /// The minimum interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Request an update at `now`. Returns `true` if it may run right away;
    /// otherwise it stays pending.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.last = Some(now);
            self.pending = false;
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Whether a deferred request exists.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Take a deferred request if its interval has elapsed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.pending && self.ready(now) {
            self.last = Some(now);
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Record an update that bypassed the throttle.
    pub fn mark_flushed(&mut self, now: Instant) {
        self.last = Some(now);
        self.pending = false;
    }

    fn ready(&self, now: Instant) -> bool {
        self.last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }
}
