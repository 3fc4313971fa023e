//! Fixed-window login rate limiting

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Window {
    started: Instant,
    attempts: u32,
}

/// Per-client-IP fixed-window limiter for the login endpoint.
///
/// Every attempt counts against the quota, malformed and failed ones
/// included; the window resets once its full duration has elapsed.
pub struct LoginRateLimiter {
    windows: RwLock<HashMap<IpAddr, Window>>,
    max_attempts: u32,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            max_attempts,
            window,
        }
    }

    /// Record an attempt for this client. Returns false once the quota
    /// for the current window is exhausted.
    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        let mut windows = self.windows.write().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        let window = windows.entry(ip).or_insert(Window {
            started: now,
            attempts: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.attempts = 0;
        }

        window.attempts += 1;
        if window.attempts > self.max_attempts {
            tracing::warn!("rate limit exceeded for {}", ip);
            return false;
        }
        true
    }

    /// Drop windows that have fully elapsed
    pub fn prune(&self) {
        let mut windows = self.windows.write().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        windows.retain(|_, w| now.duration_since(w.started) < self.window);
    }

    /// Number of tracked client windows
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_attempts_within_quota_pass() {
        let limiter = LoginRateLimiter::new(10, Duration::from_secs(900));
        for _ in 0..10 {
            assert!(limiter.try_acquire(ip(1)));
        }
    }

    #[test]
    fn test_eleventh_attempt_is_denied() {
        let limiter = LoginRateLimiter::new(10, Duration::from_secs(900));
        for _ in 0..10 {
            assert!(limiter.try_acquire(ip(1)));
        }
        assert!(!limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limiter = LoginRateLimiter::new(1, Duration::from_secs(900));
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(2)));
    }

    #[test]
    fn test_window_resets_after_elapsing() {
        let limiter = LoginRateLimiter::new(2, Duration::from_secs(900));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));

        // Backdate the window past its duration
        {
            let mut windows = limiter.windows.write().unwrap();
            let window = windows.get_mut(&ip(1)).unwrap();
            window.started = Instant::now() - Duration::from_secs(901);
        }

        assert!(limiter.try_acquire(ip(1)));
    }

    #[test]
    fn test_attempt_just_inside_window_still_counted() {
        let limiter = LoginRateLimiter::new(2, Duration::from_secs(900));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));

        {
            let mut windows = limiter.windows.write().unwrap();
            let window = windows.get_mut(&ip(1)).unwrap();
            window.started = Instant::now() - Duration::from_secs(899);
        }

        assert!(!limiter.try_acquire(ip(1)));
    }

    #[test]
    fn test_prune_drops_elapsed_windows() {
        let limiter = LoginRateLimiter::new(10, Duration::from_secs(900));
        limiter.try_acquire(ip(1));
        limiter.try_acquire(ip(2));

        {
            let mut windows = limiter.windows.write().unwrap();
            let window = windows.get_mut(&ip(1)).unwrap();
            window.started = Instant::now() - Duration::from_secs(1000);
        }

        limiter.prune();
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
