//! # Rate Limiting
//!
//! A sliding-window limiter per principal, guarding against request
//! floods. This deliberately reads the real wall clock via
//! `std::time::Instant` rather than `msez_core::Timestamp`, which is
//! `SOURCE_DATE_EPOCH`-aware for reproducible builds — rate limiting
//! measures real elapsed time, not build-reproducible time.
//!
//! Grounded on `original_source/tools/phoenix/security.py`'s
//! "Rate Limiting" primitive.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::SecurityError;

#[derive(Debug, Clone)]
struct Window {
    hits: Vec<Instant>,
}

/// Fixed-capacity sliding window rate limiter keyed by principal.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u64,
    window: Duration,
    windows: HashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(limit: u64, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: HashMap::new(),
        }
    }

    /// Record a hit for `principal` at the current instant. Rejects if
    /// this would exceed `limit` hits within the trailing window.
    pub fn check(&mut self, principal: &str) -> Result<(), SecurityError> {
        self.check_at(principal, Instant::now())
    }

    fn check_at(&mut self, principal: &str, now: Instant) -> Result<(), SecurityError> {
        let window = self.window;
        let entry = self.windows.entry(principal.to_string()).or_insert_with(|| Window { hits: Vec::new() });
        entry.hits.retain(|t| now.duration_since(*t) <= window);
        if entry.hits.len() as u64 >= self.limit {
            return Err(SecurityError::RateLimited {
                limit: self.limit,
                window_s: window.as_secs(),
            });
        }
        entry.hits.push(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_limit_accepted() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("alice").is_ok());
        }
    }

    #[test]
    fn test_exceeding_limit_rejected() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
        limiter.check("alice").unwrap();
        limiter.check("alice").unwrap();
        let err = limiter.check("alice").unwrap_err();
        assert!(matches!(err, SecurityError::RateLimited { limit: 2, .. }));
    }

    #[test]
    fn test_separate_principals_have_separate_budgets() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.check("alice").unwrap();
        assert!(limiter.check("bob").is_ok());
    }

    #[test]
    fn test_hits_outside_window_are_forgotten() {
        let mut limiter = RateLimiter::new(1, Duration::from_millis(1));
        let t0 = Instant::now();
        limiter.check_at("alice", t0).unwrap();
        let t1 = t0 + Duration::from_secs(1);
        assert!(limiter.check_at("alice", t1).is_ok());
    }
}
