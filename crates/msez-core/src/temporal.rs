//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type that enforces the
//! canonicalization requirement of ISO8601 with Z suffix, truncated
//! to seconds precision.
//!
//! ## Security Invariant
//!
//! Timestamps in the SEZ Stack must be UTC with Z suffix for deterministic
//! canonicalization. Local timezone offsets would produce different canonical
//! byte sequences for the same instant, breaking content-addressed integrity.
//!
//! ## Implements
//!
//! Spec §8 — Temporal normalization rules for JCS canonicalization.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC-only timestamp, truncated to seconds precision.
///
/// This type guarantees that all timestamps in the system are in UTC
/// with no sub-second components, matching the JCS canonicalization
/// rule that normalizes datetimes to `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

/// Environment variable consulted by [`Timestamp::now`] for deterministic
/// "wall clock" reads (spec §6 environment, §9 determinism rails).
pub const SOURCE_DATE_EPOCH_VAR: &str = "SOURCE_DATE_EPOCH";

impl Timestamp {
    /// Create a timestamp representing "now", truncated to seconds.
    ///
    /// If the `SOURCE_DATE_EPOCH` environment variable is set and parses
    /// as a non-negative integer, that epoch is returned instead of the
    /// real wall clock. Every digest-producing path in the stack must read
    /// "now" exclusively through this function so that generators are
    /// byte-reproducible given a fixed `SOURCE_DATE_EPOCH` (spec §9).
    /// Observability and the rate limiter deliberately bypass this and
    /// read the real clock, since their purpose is to measure real time.
    pub fn now() -> Self {
        if let Ok(epoch) = std::env::var(SOURCE_DATE_EPOCH_VAR) {
            if let Ok(seconds) = epoch.trim().parse::<i64>() {
                if let chrono::LocalResult::Single(dt) = Utc.timestamp_opt(seconds, 0) {
                    return Self(dt);
                }
            }
        }
        let now = Utc::now();
        // Truncate sub-second precision.
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // SOURCE_DATE_EPOCH is process-global; serialize the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_source_date_epoch_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(SOURCE_DATE_EPOCH_VAR, "1735689600");
        let ts = Timestamp::now();
        std::env::remove_var(SOURCE_DATE_EPOCH_VAR);
        assert_eq!(ts.to_iso8601(), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_source_date_epoch_ignored_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(SOURCE_DATE_EPOCH_VAR);
        let before = Utc::now().timestamp();
        let ts = Timestamp::now();
        assert!(ts.as_datetime().timestamp() >= before - 2);
    }

    #[test]
    fn test_source_date_epoch_garbage_falls_back_to_real_clock() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(SOURCE_DATE_EPOCH_VAR, "not-a-number");
        let before = Utc::now().timestamp();
        let ts = Timestamp::now();
        std::env::remove_var(SOURCE_DATE_EPOCH_VAR);
        assert!(ts.as_datetime().timestamp() >= before - 2);
    }

    #[test]
    fn test_to_iso8601_format() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 5, 9, 30, 0).unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2026-03-05T09:30:00Z");
    }

    #[test]
    fn test_from_utc_truncates_subseconds() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }
}
