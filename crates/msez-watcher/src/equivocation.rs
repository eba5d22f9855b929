//! # Equivocation Detection
//!
//! An incremental detector: each attestation claim is checked against
//! whatever else has already been seen for the same
//! `(subject, domain, time_quantum)` key. A second, conflicting claim
//! from the same watcher is equivocation.
//!
//! ## Implements
//!
//! Spec §4.10 — Watcher Economy, equivocation detector.

use std::collections::HashMap;

use msez_core::{ArtifactRef, ComplianceDomain, Timestamp, WatcherId};
use serde::{Deserialize, Serialize};

/// One attestation claim submitted by a watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationClaim {
    pub watcher_id: WatcherId,
    pub subject: String,
    pub domain: ComplianceDomain,
    pub time_quantum: String,
    /// The asserted value — opaque to the detector, compared for equality.
    pub claim: String,
    pub attestation_ref: ArtifactRef,
    pub at: Timestamp,
}

/// Proof that a watcher submitted two conflicting claims for the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivocationEvidence {
    pub watcher_id: WatcherId,
    pub subject: String,
    pub domain: ComplianceDomain,
    pub time_quantum: String,
    pub first: ArtifactRef,
    pub second: ArtifactRef,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct ClaimKey {
    watcher_id: WatcherId,
    subject: String,
    domain: ComplianceDomain,
    time_quantum: String,
}

/// Incremental, append-only equivocation detector. Holds the first claim
/// seen per `(watcher, subject, domain, time_quantum)` key; a later,
/// differing claim under the same key is evidence.
#[derive(Debug, Clone, Default)]
pub struct EquivocationDetector {
    seen: HashMap<ClaimKey, AttestationClaim>,
}

impl EquivocationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim. Returns `Some(evidence)` if it conflicts with a
    /// previously recorded claim under the same key; otherwise records it
    /// (if new) and returns `None`.
    pub fn observe(&mut self, claim: AttestationClaim) -> Option<EquivocationEvidence> {
        let key = ClaimKey {
            watcher_id: claim.watcher_id.clone(),
            subject: claim.subject.clone(),
            domain: claim.domain,
            time_quantum: claim.time_quantum.clone(),
        };

        match self.seen.get(&key) {
            Some(prior) if prior.claim != claim.claim => Some(EquivocationEvidence {
                watcher_id: claim.watcher_id.clone(),
                subject: claim.subject.clone(),
                domain: claim.domain,
                time_quantum: claim.time_quantum.clone(),
                first: prior.attestation_ref.clone(),
                second: claim.attestation_ref.clone(),
            }),
            Some(_) => None,
            None => {
                self.seen.insert(key, claim);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(watcher: WatcherId, value: &str, tag: &[u8]) -> AttestationClaim {
        AttestationClaim {
            watcher_id: watcher,
            subject: "asset-1".to_string(),
            domain: ComplianceDomain::all_domains()[0],
            time_quantum: "2026-07".to_string(),
            claim: value.to_string(),
            attestation_ref: ArtifactRef::new("MSEZSmartAssetAttestation", &msez_core::sha256_bytes(tag)),
            at: Timestamp::now(),
        }
    }

    #[test]
    fn test_first_claim_recorded_no_evidence() {
        let w1 = WatcherId::new();
        let mut detector = EquivocationDetector::new();
        assert!(detector.observe(claim(w1, "COMPLIANT", b"1")).is_none());
    }

    #[test]
    fn test_repeated_identical_claim_no_evidence() {
        let w1 = WatcherId::new();
        let mut detector = EquivocationDetector::new();
        detector.observe(claim(w1.clone(), "COMPLIANT", b"1"));
        assert!(detector.observe(claim(w1, "COMPLIANT", b"1")).is_none());
    }

    #[test]
    fn test_conflicting_claim_produces_evidence() {
        let w1 = WatcherId::new();
        let mut detector = EquivocationDetector::new();
        detector.observe(claim(w1.clone(), "COMPLIANT", b"1"));
        let evidence = detector.observe(claim(w1.clone(), "NON_COMPLIANT", b"2"));
        assert!(evidence.is_some());
        let evidence = evidence.unwrap();
        assert_eq!(evidence.watcher_id, w1);
    }

    #[test]
    fn test_different_watchers_same_key_not_equivocation() {
        let w1 = WatcherId::new();
        let w2 = WatcherId::new();
        let mut detector = EquivocationDetector::new();
        detector.observe(claim(w1, "COMPLIANT", b"1"));
        assert!(detector.observe(claim(w2, "NON_COMPLIANT", b"2")).is_none());
    }

    #[test]
    fn test_different_time_quantum_not_equivocation() {
        let w1 = WatcherId::new();
        let mut detector = EquivocationDetector::new();
        detector.observe(claim(w1.clone(), "COMPLIANT", b"1"));
        let mut later = claim(w1, "NON_COMPLIANT", b"2");
        later.time_quantum = "2026-08".to_string();
        assert!(detector.observe(later).is_none());
    }
}
