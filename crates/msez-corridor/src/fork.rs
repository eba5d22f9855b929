//! # Fork Detection & Resolution
//!
//! Detects and resolves forks in corridor receipt chains using a
//! three-tier ordering:
//!
//! 1. Primary: timestamp (earliest `issued_at` wins — the branch that was
//!    actually proposed first).
//! 2. Secondary: watcher attestation count (more attestations win).
//! 3. Tertiary: lexicographic ordering of the branch's `next_root` digest
//!    (deterministic tiebreaker when the first two are equal).
//!
//! Maximum clock skew tolerance: 5 minutes. Branches whose `issued_at` is
//! more than that far in the future relative to the resolver's reference
//! time are rejected outright rather than ranked.
//!
//! A resolution is only final once it is wrapped in a fork-resolution VC
//! naming the same `(sequence, prev_root)` key (spec §4.4) — this module
//! picks the winner the VC then attests to; it does not sign anything
//! itself.
//!
//! ## Security Invariant
//!
//! Fork resolution must be deterministic — any two nodes evaluating the
//! same fork data must arrive at the same resolution.
//!
//! ## Implements
//!
//! Spec §4.4 — fork resolution.

use crate::receipt::{ForkResolution, Receipt};
use msez_core::Timestamp;
use thiserror::Error;

/// Errors raised while resolving a fork.
#[derive(Error, Debug)]
pub enum ForkError {
    #[error("no fork candidates supplied")]
    NoCandidates,

    #[error("every fork candidate exceeded the clock skew tolerance")]
    AllCandidatesExceedSkew,

    #[error("fork candidates do not share a (sequence, prev_root) key")]
    MismatchedForkKey,
}

/// One branch competing to extend a chain at a fork point, together with
/// the watcher attestation count backing it.
#[derive(Debug, Clone)]
pub struct ForkCandidate {
    pub receipt: Receipt,
    pub watcher_attestation_count: u32,
}

/// Resolves forks in corridor receipt chains via deterministic three-tier
/// ordering.
#[derive(Debug)]
pub struct ForkResolver {
    /// Maximum allowed clock skew in seconds (default: 300 = 5 minutes).
    pub max_clock_skew_seconds: u64,
}

impl ForkResolver {
    /// Create a new fork resolver with default clock skew tolerance.
    pub fn new() -> Self {
        Self {
            max_clock_skew_seconds: 300,
        }
    }

    /// Resolve a fork among `candidates`, all of which must share the same
    /// `(sequence, prev_root)` key, relative to `now`.
    pub fn resolve(&self, candidates: &[ForkCandidate], now: Timestamp) -> Result<ForkResolution, ForkError> {
        if candidates.is_empty() {
            return Err(ForkError::NoCandidates);
        }
        let sequence = candidates[0].receipt.sequence;
        let prev_root = candidates[0].receipt.prev_root.clone();
        if candidates
            .iter()
            .any(|c| c.receipt.sequence != sequence || c.receipt.prev_root != prev_root)
        {
            return Err(ForkError::MismatchedForkKey);
        }

        let in_tolerance: Vec<&ForkCandidate> = candidates
            .iter()
            .filter(|c| {
                let skew = c.receipt.issued_at.as_datetime().timestamp() - now.as_datetime().timestamp();
                skew <= self.max_clock_skew_seconds as i64
            })
            .collect();
        if in_tolerance.is_empty() {
            return Err(ForkError::AllCandidatesExceedSkew);
        }

        let winner = in_tolerance
            .into_iter()
            .min_by(|a, b| {
                a.receipt
                    .issued_at
                    .cmp(&b.receipt.issued_at)
                    .then_with(|| b.watcher_attestation_count.cmp(&a.watcher_attestation_count))
                    .then_with(|| a.receipt.next_root.cmp(&b.receipt.next_root))
            })
            .expect("non-empty after skew filter");

        Ok(ForkResolution {
            sequence,
            prev_root,
            chosen_next_root: winner
                .receipt
                .next_root
                .clone()
                .expect("fork candidates are always frozen receipts"),
        })
    }
}

impl Default for ForkResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::CorridorId;

    fn candidate(sequence: u64, prev_root: &str, amount: &str, attestations: u32, issued_at: Timestamp) -> ForkCandidate {
        let mut receipt = Receipt::draft(
            CorridorId::new(),
            sequence,
            prev_root.to_string(),
            vec![],
            vec![],
            vec![],
            serde_json::json!({"amount": amount}),
        )
        .freeze()
        .unwrap();
        receipt.issued_at = issued_at;
        ForkCandidate {
            receipt,
            watcher_attestation_count: attestations,
        }
    }

    #[test]
    fn test_earliest_timestamp_wins() {
        let resolver = ForkResolver::new();
        let now = Timestamp::now();
        let earlier = candidate(0, "root", "100", 1, now);
        let later = candidate(
            0,
            "root",
            "200",
            10,
            Timestamp::from_utc(*now.as_datetime() + chrono::Duration::seconds(60)),
        );
        let resolution = resolver.resolve(&[earlier.clone(), later], now).unwrap();
        assert_eq!(resolution.chosen_next_root, earlier.receipt.next_root.unwrap());
    }

    #[test]
    fn test_tie_on_timestamp_breaks_on_attestation_count() {
        let resolver = ForkResolver::new();
        let now = Timestamp::now();
        let weak = candidate(0, "root", "100", 1, now);
        let strong = candidate(0, "root", "200", 10, now);
        let resolution = resolver.resolve(&[weak, strong.clone()], now).unwrap();
        assert_eq!(resolution.chosen_next_root, strong.receipt.next_root.unwrap());
    }

    #[test]
    fn test_clock_skew_beyond_tolerance_excluded() {
        let resolver = ForkResolver::new();
        let now = Timestamp::now();
        let far_future = candidate(
            0,
            "root",
            "100",
            1,
            Timestamp::from_utc(*now.as_datetime() + chrono::Duration::seconds(3600)),
        );
        let result = resolver.resolve(&[far_future], now);
        assert!(matches!(result, Err(ForkError::AllCandidatesExceedSkew)));
    }

    #[test]
    fn test_mismatched_fork_key_rejected() {
        let resolver = ForkResolver::new();
        let now = Timestamp::now();
        let a = candidate(0, "root-a", "100", 1, now);
        let b = candidate(1, "root-b", "200", 1, now);
        let result = resolver.resolve(&[a, b], now);
        assert!(matches!(result, Err(ForkError::MismatchedForkKey)));
    }

    #[test]
    fn test_deterministic_across_repeated_calls() {
        let resolver = ForkResolver::new();
        let now = Timestamp::now();
        let a = candidate(0, "root", "100", 5, now);
        let b = candidate(0, "root", "200", 5, now);
        let r1 = resolver.resolve(&[a.clone(), b.clone()], now).unwrap();
        let r2 = resolver.resolve(&[a, b], now).unwrap();
        assert_eq!(r1.chosen_next_root, r2.chosen_next_root);
    }
}
