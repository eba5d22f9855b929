//! # Reputation Scoring
//!
//! Watchers are ranked by a weighted blend of availability, attestation
//! accuracy, and tenure. The score feeds quorum selection in
//! `selection.rs`.
//!
//! ## Implements
//!
//! Spec §4.10 — Watcher Economy, reputation formula.

use serde::{Deserialize, Serialize};

/// Number of days of tenure that earns the full tenure component.
pub const TENURE_CAP_DAYS: f64 = 365.0;

/// Raw inputs behind a watcher's reputation score, each already expressed
/// as a percentage in `0.0..=100.0` except `tenure_days`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReputationMetrics {
    /// Percentage of expected attestation windows actually met.
    pub availability_pct: f64,
    /// Percentage of submitted attestations later confirmed correct.
    pub accuracy_pct: f64,
    /// Days since the watcher's bond was first activated.
    pub tenure_days: f64,
}

impl ReputationMetrics {
    /// The blended reputation score: `0.4*availability + 0.5*accuracy +
    /// 0.1*tenure`, each component normalized to `0..=100` before
    /// weighting and the final score clamped to be non-negative.
    pub fn score(&self) -> f64 {
        let availability = self.availability_pct.clamp(0.0, 100.0);
        let accuracy = self.accuracy_pct.clamp(0.0, 100.0);
        let tenure = (self.tenure_days.max(0.0) / TENURE_CAP_DAYS * 100.0).min(100.0);

        let score = 0.4 * availability + 0.5 * accuracy + 0.1 * tenure;
        score.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_metrics_score_100() {
        let m = ReputationMetrics {
            availability_pct: 100.0,
            accuracy_pct: 100.0,
            tenure_days: TENURE_CAP_DAYS,
        };
        assert!((m.score() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_metrics_score_0() {
        let m = ReputationMetrics {
            availability_pct: 0.0,
            accuracy_pct: 0.0,
            tenure_days: 0.0,
        };
        assert_eq!(m.score(), 0.0);
    }

    #[test]
    fn test_tenure_beyond_cap_does_not_exceed_component_weight() {
        let capped = ReputationMetrics {
            availability_pct: 0.0,
            accuracy_pct: 0.0,
            tenure_days: TENURE_CAP_DAYS,
        };
        let over = ReputationMetrics {
            availability_pct: 0.0,
            accuracy_pct: 0.0,
            tenure_days: TENURE_CAP_DAYS * 10.0,
        };
        assert_eq!(capped.score(), over.score());
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let m = ReputationMetrics {
            availability_pct: 150.0,
            accuracy_pct: -10.0,
            tenure_days: 0.0,
        };
        assert!((m.score() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighting_favors_accuracy_over_availability() {
        let accurate = ReputationMetrics {
            availability_pct: 0.0,
            accuracy_pct: 100.0,
            tenure_days: 0.0,
        };
        let available = ReputationMetrics {
            availability_pct: 100.0,
            accuracy_pct: 0.0,
            tenure_days: 0.0,
        };
        assert!(accurate.score() > available.score());
    }
}
