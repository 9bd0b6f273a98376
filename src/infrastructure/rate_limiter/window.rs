//! Fixed-window accounting unit

use std::time::Duration;
use tokio::time::Instant;

/// Guard added to the wait deadline so a waiter never wakes exactly on the
/// boundary it is testing against.
pub(crate) const RESET_GUARD: Duration = Duration::from_millis(1);

/// One accounting interval `[start, end)` and the number of grants issued
/// within it.
///
/// A `Window` is replaced wholesale when a request is observed strictly after
/// `end`; the only in-place mutation is the `count` increment on a grant. The
/// maximum count (`limit`) lives on the owning limiter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Window {
    start: Instant,
    end: Instant,
    count: u32,
}

impl Window {
    /// Fresh window anchored at `now`.
    pub(crate) fn starting_at(now: Instant, period: Duration) -> Self {
        Self {
            start: now,
            end: now + period,
            count: 0,
        }
    }

    /// Initial window for a newly constructed limiter.
    ///
    /// Pinned in the past so its deadline has already elapsed: the first
    /// `acquire` replaces it with a window anchored at a freshly observed
    /// `now`, even if real time advanced between construction and first use.
    pub(crate) fn expired_at(now: Instant, period: Duration) -> Self {
        let start = now.checked_sub(period.saturating_mul(2)).unwrap_or(now);
        Self {
            start,
            end: start + period,
            count: 0,
        }
    }

    /// Whether `now` falls strictly after this window's deadline.
    pub(crate) fn expired(&self, now: Instant) -> bool {
        now > self.end
    }

    /// Reserve one slot if capacity remains. Returns `true` on a grant.
    pub(crate) fn try_grant(&mut self, limit: u32) -> bool {
        if self.count < limit {
            self.count += 1;
            true
        } else {
            false
        }
    }

    /// Slots still available in this window.
    pub(crate) fn remaining(&self, limit: u32) -> u32 {
        limit.saturating_sub(self.count)
    }

    /// Instant at which a waiter blocked on this window should re-check.
    pub(crate) fn reset_deadline(&self) -> Instant {
        self.end + RESET_GUARD
    }

    pub(crate) fn start(&self) -> Instant {
        self.start
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }
}
