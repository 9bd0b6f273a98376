//! Concurrent fixed-window rate limiter

use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::window::Window;
use super::AcquireError;
use crate::config::validation::ValidationError;

/// Fixed-window rate limiter for any number of concurrent callers sharing one
/// instance.
///
/// `acquire` suspends the calling task until one slot of the current or a
/// future window has been reserved; capacity exhaustion is always resolved by
/// waiting, never by rejection. All window state is read and written under a
/// single mutex held only for O(1) work; blocked callers park on a [`Notify`]
/// and are woken en masse when the window resets.
///
/// Fairness caveat: a window reset wakes every waiter and they race for the new
/// window's slots. Arrival order does not determine grant order, and the losers
/// simply wait for the next window. The worst-case wait for any caller is
/// bounded by `ceil(waiters / limit)` periods.
///
/// A grant is a durable reservation: once counted, the slot is consumed whether
/// or not the caller's subsequent operation succeeds.
pub struct ConcurrentRateLimiter {
    period: Duration,
    limit: u32,
    window: Mutex<Window>,
    reset: Notify,
}

impl ConcurrentRateLimiter {
    /// Create a limiter allowing `limit` grants per `period`.
    ///
    /// Fails fast on a zero limit or zero period; these are configuration
    /// errors, not runtime throttling conditions.
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
            window: Mutex::new(Window::expired_at(Instant::now(), period)),
            reset: Notify::new(),
        })
    }

    /// Reserve one slot, suspending until capacity is available.
    pub async fn acquire(&self) {
        // Without a token the wait can only end in a grant.
        let _ = self.acquire_inner(None).await;
    }

    /// Reserve one slot, or return [`AcquireError::Cancelled`] if `cancel`
    /// fires first. A cancelled wait consumes no capacity.
    pub async fn acquire_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(), AcquireError> {
        self.acquire_inner(Some(cancel)).await
    }

    async fn acquire_inner(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), AcquireError> {
        loop {
            // Observe `now` afresh each attempt; a timestamp taken before a
            // wait is stale by the time the waiter loses a race.
            let now = Instant::now();
            let mut window = self.window.lock().await;
            if window.expired(now) {
                *window = Window::starting_at(now, self.period);
                debug!(limit = self.limit, "window reset");
                // Broadcast: any number of waiters may now have capacity.
                self.reset.notify_waiters();
            }
            if window.try_grant(self.limit) {
                trace!(count = window.count(), limit = self.limit, "slot granted");
                return Ok(());
            }

            let deadline = window.reset_deadline();
            let notified = self.reset.notified();
            tokio::pin!(notified);
            // Register interest while the lock is still held, so a reset
            // broadcast between unlock and wait cannot be missed.
            notified.as_mut().enable();
            trace!(limit = self.limit, "window full, waiting for reset");
            drop(window);

            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep_until(deadline) => {}
                _ = cancelled(cancel) => {
                    debug!("acquisition cancelled while waiting");
                    return Err(AcquireError::Cancelled);
                }
            }
        }
    }

    /// Slots still available in the current window. Read-only: a lapsed window
    /// reports the full limit without being replaced.
    pub async fn remaining(&self) -> u32 {
        let now = Instant::now();
        let window = self.window.lock().await;
        if window.expired(now) {
            self.limit
        } else {
            window.remaining(self.limit)
        }
    }

    /// Start of the current accounting window.
    pub async fn window_start(&self) -> Instant {
        self.window.lock().await.start()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

async fn cancelled(cancel: Option<&CancellationToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}
