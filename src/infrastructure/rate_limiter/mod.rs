//! Fixed-Window Rate Limiting
//!
//! Bounds how many operations a set of callers may perform per time unit,
//! delaying excess callers until the window resets. Two strategies share the
//! same contract:
//! - [`ConcurrentRateLimiter`] for any number of tasks sharing one instance
//!   (mutex-guarded counter, broadcast wakeup on reset)
//! - [`SequentialRateLimiter`] for a single calling task (no lock, sleeps
//!   through a full window)
//!
//! This is a fixed (non-sliding) window counter: the count resets at fixed
//! boundaries, so bursts of up to twice the limit can straddle a boundary.
//! The limiter never rejects; capacity exhaustion is always resolved by
//! waiting.

pub mod concurrent;
pub mod sequential;
mod window;

pub use concurrent::ConcurrentRateLimiter;
pub use sequential::SequentialRateLimiter;

/// Why an otherwise-blocking acquisition returned without a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AcquireError {
    /// The caller's cancellation token fired while waiting for capacity.
    #[error("acquisition cancelled while waiting for window capacity")]
    Cancelled,
}
