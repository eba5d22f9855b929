//! # Watcher Registry & Quorum Selection
//!
//! Holds registered watchers and picks the top-reputation subset eligible
//! to attest for a jurisdiction.
//!
//! ## Implements
//!
//! Spec §4.10 — Watcher Economy, watcher selection.

use msez_core::{JurisdictionId, WatcherId, DID};
use serde::{Deserialize, Serialize};

use crate::bond::WatcherBond;
use crate::reputation::ReputationMetrics;

/// A registered watcher: its identity, bonds, reputation, and the
/// jurisdictions it is eligible to attest for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watcher {
    pub watcher_id: WatcherId,
    pub did: DID,
    pub jurisdictions: Vec<JurisdictionId>,
    pub bonds: Vec<WatcherBond>,
    pub reputation: ReputationMetrics,
    pub banned: bool,
}

impl Watcher {
    /// A watcher is eligible to be selected if it isn't banned, isn't
    /// jurisdiction-excluded, and holds at least one bond with available
    /// collateral.
    fn is_eligible_for(&self, jurisdiction: &JurisdictionId) -> bool {
        !self.banned
            && self.jurisdictions.contains(jurisdiction)
            && self.bonds.iter().any(|b| b.available() > 0)
    }
}

/// In-memory registry of watchers, queried by `select_watchers`.
#[derive(Debug, Clone, Default)]
pub struct WatcherRegistry {
    watchers: Vec<Watcher>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, watcher: Watcher) {
        self.watchers.push(watcher);
    }

    /// Select watchers eligible for `jurisdiction`, highest reputation
    /// first, ties broken by lexicographically smaller `did`. Returns
    /// exactly `min(min_count, eligible.len())` watchers — never pads
    /// with ineligible ones, never panics if fewer are eligible than
    /// requested.
    pub fn select_watchers(&self, jurisdiction: &JurisdictionId, min_count: usize) -> Vec<&Watcher> {
        let mut eligible: Vec<&Watcher> = self
            .watchers
            .iter()
            .filter(|w| w.is_eligible_for(jurisdiction))
            .collect();

        eligible.sort_by(|a, b| {
            b.reputation
                .score()
                .partial_cmp(&a.reputation.score())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.did.as_str().cmp(b.did.as_str()))
        });

        eligible.truncate(min_count);
        eligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher(did: &str, score: f64, jurisdictions: Vec<JurisdictionId>) -> Watcher {
        let watcher_id = WatcherId::new();
        Watcher {
            bonds: vec![WatcherBond::new(format!("bond-{watcher_id}"), 1_000, "USD").unwrap()],
            watcher_id,
            did: DID::parse(did).unwrap(),
            jurisdictions,
            reputation: ReputationMetrics {
                availability_pct: score,
                accuracy_pct: score,
                tenure_days: 0.0,
            },
            banned: false,
        }
    }

    #[test]
    fn test_select_returns_min_of_requested_and_eligible() {
        let j = JurisdictionId::new("PK-KHI");
        let mut registry = WatcherRegistry::new();
        registry.register(watcher("did:web:w1", 90.0, vec![j.clone()]));
        registry.register(watcher("did:web:w2", 80.0, vec![j.clone()]));

        let selected = registry.select_watchers(&j, 5);
        assert_eq!(selected.len(), 2);

        let selected = registry.select_watchers(&j, 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].did.as_str(), "did:web:w1");
    }

    #[test]
    fn test_banned_watcher_excluded() {
        let j = JurisdictionId::new("PK-KHI");
        let mut registry = WatcherRegistry::new();
        let mut w = watcher("did:web:w1", 99.0, vec![j.clone()]);
        w.banned = true;
        registry.register(w);

        assert!(registry.select_watchers(&j, 1).is_empty());
    }

    #[test]
    fn test_watcher_without_jurisdiction_excluded() {
        let j = JurisdictionId::new("PK-KHI");
        let other = JurisdictionId::new("AE-DXB");
        let mut registry = WatcherRegistry::new();
        registry.register(watcher("did:web:w1", 99.0, vec![other]));

        assert!(registry.select_watchers(&j, 1).is_empty());
    }

    #[test]
    fn test_tie_broken_by_lexicographic_did() {
        let j = JurisdictionId::new("PK-KHI");
        let mut registry = WatcherRegistry::new();
        registry.register(watcher("did:web:zz", 50.0, vec![j.clone()]));
        registry.register(watcher("did:web:aa", 50.0, vec![j.clone()]));

        let selected = registry.select_watchers(&j, 1);
        assert_eq!(selected[0].did.as_str(), "did:web:aa");
    }

    #[test]
    fn test_fully_slashed_bond_makes_watcher_ineligible() {
        let j = JurisdictionId::new("PK-KHI");
        let mut w = watcher("did:web:w1", 90.0, vec![j.clone()]);
        w.bonds[0]
            .slash(
                crate::bond::SlashingCondition::Equivocation,
                crate::bond::SlashingEvidence::Collusion {
                    evidence_ref: msez_core::ArtifactRef::new(
                        "MSEZSmartAssetAttestation",
                        &msez_core::sha256_bytes(b"x"),
                    ),
                },
                msez_core::Timestamp::now(),
            )
            .unwrap();
        let mut registry = WatcherRegistry::new();
        registry.register(w);

        assert!(registry.select_watchers(&j, 1).is_empty());
    }
}
