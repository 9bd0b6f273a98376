//! Sequential fixed-window rate limiter

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::window::Window;
use crate::config::validation::ValidationError;

/// Fixed-window rate limiter for a single calling task.
///
/// Same external contract as [`ConcurrentRateLimiter`]: `acquire` suspends
/// until one slot of the current or a future window has been reserved. With no
/// contention to coordinate there is no lock and no wakeup broadcast; a full
/// window is simply slept through.
///
/// The single-caller precondition is enforced at compile time: `acquire` takes
/// `&mut self`, so a second concurrent caller cannot exist.
///
/// [`ConcurrentRateLimiter`]: super::ConcurrentRateLimiter
pub struct SequentialRateLimiter {
    period: Duration,
    limit: u32,
    window: Window,
}

impl SequentialRateLimiter {
    /// Create a limiter allowing `limit` grants per `period`.
    pub fn new(period: Duration, limit: u32) -> Result<Self, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::rate_limit("limit must be at least 1"));
        }
        if period.is_zero() {
            return Err(ValidationError::rate_limit("period must be positive"));
        }
        Ok(Self {
            period,
            limit,
            window: Window::expired_at(Instant::now(), period),
        })
    }

    /// Reserve one slot, sleeping until the next window when the current one
    /// is full.
    pub async fn acquire(&mut self) {
        // A loop rather than recursion: pathological clock behavior must not
        // grow the stack.
        loop {
            let now = Instant::now();
            if self.window.expired(now) {
                self.window = Window::starting_at(now, self.period);
                debug!(limit = self.limit, "window reset");
            }
            if self.window.try_grant(self.limit) {
                trace!(count = self.window.count(), limit = self.limit, "slot granted");
                return;
            }
            trace!(limit = self.limit, "window full, sleeping until reset");
            tokio::time::sleep_until(self.window.reset_deadline()).await;
        }
    }

    /// Slots still available in the current window. Read-only: a lapsed window
    /// reports the full limit without being replaced.
    pub fn remaining(&self) -> u32 {
        if self.window.expired(Instant::now()) {
            self.limit
        } else {
            self.window.remaining(self.limit)
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
