//! # Fixed Window Rate Limiter
//! Process-wide throttle for the aggregation endpoint.
//!
//! One counter and one window-start timestamp shared by every caller in the
//! process (not per-client, not per-IP). The window resets lazily on the
//! first call after it expires. Not suitable for multi-process deployments;
//! each instance keeps its own counter.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Clock abstraction so tests can drive the window manually.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the UNIX epoch.
    fn now_ms(&self) -> u64;
}

/// Wall-clock implementation used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

#[derive(Debug)]
struct WindowState {
    request_count: u32,
    window_start_ms: u64,
}

/// Thread-safe fixed-window counter. Construct once per process and share
/// behind an `Arc`.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    clock: Box<dyn Clock>,
    state: Mutex<WindowState>,
}

impl FixedWindowLimiter {
    /// Limiter on the system clock.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Box::new(SystemClock))
    }

    /// Limiter with an injected clock (tests).
    pub fn with_clock(max_requests: u32, window: Duration, clock: Box<dyn Clock>) -> Self {
        let start = clock.now_ms();
        Self {
            max_requests,
            window,
            clock,
            state: Mutex::new(WindowState {
                request_count: 0,
                window_start_ms: start,
            }),
        }
    }

    /// Count one request against the current window.
    ///
    /// Resets the counter when the window has elapsed, then increments it.
    /// Returns `true` while the incremented count stays within
    /// `max_requests`; a `false` means the caller must reject with 429 and
    /// perform no upstream fetch.
    pub fn check_and_consume(&self) -> bool {
        let now = self.clock.now_ms();
        let mut st = self.state.lock().expect("limiter mutex poisoned");

        if now.saturating_sub(st.window_start_ms) > self.window.as_millis() as u64 {
            st.request_count = 0;
            st.window_start_ms = now;
        }

        st.request_count += 1;
        st.request_count <= self.max_requests
    }

    /// Number of requests counted in the current window (diagnostics).
    pub fn current_count(&self) -> u32 {
        self.state.lock().expect("limiter mutex poisoned").request_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Manually advanced clock.
    struct ManualClock(Arc<AtomicU64>);

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn limiter(max: u32, window_ms: u64) -> (FixedWindowLimiter, Arc<AtomicU64>) {
        let t = Arc::new(AtomicU64::new(1_000));
        let l = FixedWindowLimiter::with_clock(
            max,
            Duration::from_millis(window_ms),
            Box::new(ManualClock(Arc::clone(&t))),
        );
        (l, t)
    }

    #[test]
    fn allows_up_to_max_then_rejects() {
        let (l, _t) = limiter(10, 60_000);
        for i in 1..=10 {
            assert!(l.check_and_consume(), "call {i} should be allowed");
        }
        assert!(!l.check_and_consume(), "11th call must be rejected");
        assert_eq!(l.current_count(), 11);
    }

    #[test]
    fn window_expiry_resets_counter() {
        let (l, t) = limiter(10, 60_000);
        for _ in 0..11 {
            l.check_and_consume();
        }
        assert!(!l.check_and_consume());

        // Advance past the window; next call must pass and count from 1.
        t.fetch_add(60_001, Ordering::SeqCst);
        assert!(l.check_and_consume());
        assert_eq!(l.current_count(), 1);
    }

    #[test]
    fn elapsed_equal_to_window_does_not_reset() {
        let (l, t) = limiter(2, 1_000);
        assert!(l.check_and_consume());
        t.fetch_add(1_000, Ordering::SeqCst);
        assert!(l.check_and_consume());
        assert_eq!(l.current_count(), 2, "boundary stays in the same window");
    }
}
