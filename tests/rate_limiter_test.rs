//! Rate limiter scenario tests
//!
//! All timing tests run on tokio's paused clock, so window boundaries are
//! deterministic and no assertion depends on wall-clock scheduling.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crpt_api::{AcquireError, ConcurrentRateLimiter, SequentialRateLimiter};

/// Scenario: limit 2 per 100ms, five sequential calls. The first two return
/// immediately, the next two at the first window boundary, the fifth at the
/// boundary after that.
#[tokio::test(start_paused = true)]
async fn sequential_calls_pace_out_across_windows() {
    let mut limiter = SequentialRateLimiter::new(Duration::from_millis(100), 2).unwrap();
    let started = Instant::now();

    let mut elapsed = Vec::new();
    for _ in 0..5 {
        limiter.acquire().await;
        elapsed.push(started.elapsed());
    }

    assert_eq!(elapsed[0], Duration::ZERO);
    assert_eq!(elapsed[1], Duration::ZERO);
    for call in [elapsed[2], elapsed[3]] {
        assert!(call >= Duration::from_millis(100), "got {:?}", call);
        assert!(call < Duration::from_millis(110), "got {:?}", call);
    }
    assert!(elapsed[4] >= Duration::from_millis(200), "got {:?}", elapsed[4]);
    assert!(elapsed[4] < Duration::from_millis(215), "got {:?}", elapsed[4]);
}

/// Scenario: limit 3 per second, ten concurrent callers at time zero. Exactly
/// three land in the first window; the rest drain at subsequent boundaries,
/// with the last grant within ceil(7/3) periods plus slack.
#[tokio::test(start_paused = true)]
async fn concurrent_callers_drain_within_bounded_windows() {
    let limiter = Arc::new(ConcurrentRateLimiter::new(Duration::from_secs(1), 3).unwrap());
    let started = Instant::now();
    let grants: Arc<Mutex<Vec<Duration>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let limiter = Arc::clone(&limiter);
        let grants = Arc::clone(&grants);
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            grants.lock().unwrap().push(started.elapsed());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut grants = grants.lock().unwrap().clone();
    grants.sort();
    assert_eq!(grants.len(), 10, "every caller eventually acquires");

    let first_window = grants.iter().filter(|g| **g < Duration::from_secs(1)).count();
    assert_eq!(first_window, 3, "exactly the limit lands in the first window");

    let last = *grants.last().unwrap();
    assert!(last >= Duration::from_secs(3), "got {:?}", last);
    assert!(
        last <= Duration::from_secs(3) + Duration::from_millis(100),
        "last grant exceeded ceil(7/3) periods plus slack: {:?}",
        last
    );
}

/// At no point do more than `limit` grants share one accounting window. On the
/// paused clock every grant lands exactly on a window start, so grants group
/// by timestamp.
#[tokio::test(start_paused = true)]
async fn no_window_ever_exceeds_the_limit() {
    let limit = 3u32;
    let period = Duration::from_millis(100);
    let limiter = Arc::new(ConcurrentRateLimiter::new(period, limit).unwrap());
    let grants: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let limiter = Arc::clone(&limiter);
        let grants = Arc::clone(&grants);
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            grants.lock().unwrap().push(Instant::now());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut grants = grants.lock().unwrap().clone();
    grants.sort();
    assert_eq!(grants.len(), 20);

    let mut cluster = 1u32;
    for pair in grants.windows(2) {
        if pair[1] == pair[0] {
            cluster += 1;
            assert!(cluster <= limit, "window granted more than the limit");
        } else {
            // A new cluster means a new window, at least one period later.
            assert!(pair[1] - pair[0] >= period);
            cluster = 1;
        }
    }
}

/// Scenario: a limiter left idle past one full period grants the first
/// post-idle call immediately; the lapsed window retains nothing.
#[tokio::test(start_paused = true)]
async fn idle_limiter_grants_immediately_after_lapse() {
    let limiter = ConcurrentRateLimiter::new(Duration::from_millis(100), 2).unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    let before = Instant::now();
    limiter.acquire().await;
    assert_eq!(Instant::now(), before, "post-idle acquire must not suspend");
    assert_eq!(limiter.remaining().await, 1);
}

/// Below the limit, `acquire` returns without suspending at all.
#[tokio::test(start_paused = true)]
async fn below_limit_acquire_does_not_suspend() {
    let limiter = ConcurrentRateLimiter::new(Duration::from_secs(1), 5).unwrap();
    let before = Instant::now();
    for _ in 0..5 {
        limiter.acquire().await;
    }
    assert_eq!(Instant::now(), before);
}

/// Window starts observed over time never move backwards, and each new window
/// begins no earlier than the previous window's end.
#[tokio::test(start_paused = true)]
async fn window_starts_are_monotonic() {
    let period = Duration::from_millis(50);
    let limiter = ConcurrentRateLimiter::new(period, 1).unwrap();

    let mut starts = Vec::new();
    for _ in 0..4 {
        limiter.acquire().await;
        starts.push(limiter.window_start().await);
    }

    for pair in starts.windows(2) {
        assert!(pair[1] >= pair[0], "window start moved backwards");
        if pair[1] > pair[0] {
            assert!(pair[1] >= pair[0] + period, "window overlapped its predecessor");
        }
    }
}

/// Two callers racing a lapsed boundary produce exactly one window
/// replacement: both grants land in the same fresh window.
#[tokio::test(start_paused = true)]
async fn boundary_race_resets_exactly_once() {
    let limiter = Arc::new(ConcurrentRateLimiter::new(Duration::from_millis(100), 4).unwrap());
    limiter.acquire().await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let limiter = Arc::clone(&limiter);
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            limiter.window_start().await
        }));
    }
    let first = handles.pop().unwrap().await.unwrap();
    let second = handles.pop().unwrap().await.unwrap();

    assert_eq!(first, second, "racers must observe the same window");
    // One reset, two grants: a double reset would have discarded a count.
    assert_eq!(limiter.remaining().await, 2);
}

/// A waiter blocked on a full window can be released by cancellation instead
/// of capacity, and reports it distinctly.
#[tokio::test(start_paused = true)]
async fn cancellation_releases_a_blocked_waiter() {
    let limiter = Arc::new(ConcurrentRateLimiter::new(Duration::from_secs(60), 1).unwrap());
    limiter.acquire().await;

    let token = CancellationToken::new();
    let waiter = {
        let limiter = Arc::clone(&limiter);
        let token = token.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = limiter.acquire_cancellable(&token).await;
            (result, started.elapsed())
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    let (result, waited) = waiter.await.unwrap();
    assert_eq!(result, Err(AcquireError::Cancelled));
    assert!(waited < Duration::from_secs(1), "cancellation must not wait out the window");
}
