//! # Watcher Bonds & Slashing
//!
//! A bond is a watcher's posted collateral; slashing conditions consume
//! a fixed fraction of whatever collateral remains, never more than is
//! available.
//!
//! ## Implements
//!
//! Spec §4.10 — Watcher Economy, bond and slashing-condition tables.

use msez_core::{ArtifactRef, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a posted bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BondStatus {
    Pending,
    Active,
    Slashed,
    PartiallySlashed,
    FullySlashed,
    Withdrawn,
}

impl BondStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FullySlashed | Self::Withdrawn)
    }
}

impl std::fmt::Display for BondStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Slashed => "SLASHED",
            Self::PartiallySlashed => "PARTIALLY_SLASHED",
            Self::FullySlashed => "FULLY_SLASHED",
            Self::Withdrawn => "WITHDRAWN",
        };
        f.write_str(s)
    }
}

/// Which rule a slash was levied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlashingCondition {
    Equivocation,
    FalseAttestation,
    AvailabilityFailure,
    Collusion,
}

impl SlashingCondition {
    /// Fraction of *available* collateral this condition slashes, as a
    /// percentage in `0..=100`.
    pub fn slash_percent(&self) -> u8 {
        match self {
            Self::Equivocation => 100,
            Self::FalseAttestation => 50,
            Self::AvailabilityFailure => 1,
            Self::Collusion => 100,
        }
    }

    /// Whether this condition also bans the watcher outright, independent
    /// of whether collateral remains to slash.
    pub fn bans_watcher(&self) -> bool {
        matches!(self, Self::Collusion)
    }
}

/// The evidence backing a slashing claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SlashingEvidence {
    /// Two signed attestations from the same key, same subject key,
    /// differing claims.
    Equivocation {
        attestation_a: ArtifactRef,
        attestation_b: ArtifactRef,
    },
    /// An attested state later falsified by a checkpoint.
    FalseAttestation { checkpoint_ref: ArtifactRef },
    /// A missed attestation within the SLA window.
    AvailabilityFailure { sla_window: String },
    /// Out-of-band evidence of coordinated misbehavior.
    Collusion { evidence_ref: ArtifactRef },
}

/// One slash applied to a bond.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlashingRecord {
    pub condition: SlashingCondition,
    /// Collateral actually consumed — `min(percentage-of-available, available)`.
    pub amount_slashed: u64,
    pub evidence: SlashingEvidence,
    pub at: Timestamp,
}

/// A status transition recorded against a bond.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherTransitionRecord {
    pub from: BondStatus,
    pub to: BondStatus,
    pub at: Timestamp,
    pub reason: String,
}

/// Errors raised by bond operations.
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("bond collateral must be strictly positive")]
    ZeroCollateral,
    #[error("bond is not active (status {status})")]
    BondNotActive { status: BondStatus },
    #[error("bond {bond_id} is already terminal at {status}")]
    AlreadyTerminal { bond_id: String, status: BondStatus },
}

/// A watcher's posted collateral and its slashing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherBond {
    pub bond_id: String,
    pub collateral_amount: u64,
    pub currency: String,
    pub status: BondStatus,
    pub slash_count: u32,
    pub slash_history: Vec<SlashingRecord>,
    pub history: Vec<WatcherTransitionRecord>,
}

impl WatcherBond {
    /// Post a new bond. Rejects zero collateral per spec.
    pub fn new(bond_id: impl Into<String>, collateral_amount: u64, currency: impl Into<String>) -> Result<Self, WatcherError> {
        if collateral_amount == 0 {
            return Err(WatcherError::ZeroCollateral);
        }
        Ok(Self {
            bond_id: bond_id.into(),
            collateral_amount,
            currency: currency.into(),
            status: BondStatus::Pending,
            slash_count: 0,
            slash_history: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Collateral not yet consumed by a slash.
    pub fn available(&self) -> u64 {
        self.collateral_amount
            .saturating_sub(self.slash_history.iter().map(|s| s.amount_slashed).sum::<u64>())
    }

    /// Activate a pending bond.
    pub fn activate(&mut self, now: Timestamp) -> Result<(), WatcherError> {
        if self.status != BondStatus::Pending {
            return Err(WatcherError::BondNotActive { status: self.status });
        }
        self.transition(BondStatus::Active, "activated", now);
        Ok(())
    }

    /// Apply a slash for `condition`, capping the amount consumed at
    /// whatever collateral remains available.
    pub fn slash(
        &mut self,
        condition: SlashingCondition,
        evidence: SlashingEvidence,
        now: Timestamp,
    ) -> Result<u64, WatcherError> {
        if self.status.is_terminal() {
            return Err(WatcherError::AlreadyTerminal {
                bond_id: self.bond_id.clone(),
                status: self.status,
            });
        }

        let available = self.available();
        let requested = (self.collateral_amount as u128 * condition.slash_percent() as u128 / 100) as u64;
        let amount = requested.min(available);

        self.slash_history.push(SlashingRecord {
            condition,
            amount_slashed: amount,
            evidence,
            at: now,
        });
        self.slash_count += 1;

        let remaining = self.available();
        let next_status = if remaining == 0 {
            BondStatus::FullySlashed
        } else if self.slash_count > 0 {
            BondStatus::PartiallySlashed
        } else {
            self.status
        };
        self.transition(next_status, format!("slashed for {condition:?}"), now);

        Ok(amount)
    }

    /// Withdraw an active bond with no further slashing possible.
    pub fn withdraw(&mut self, now: Timestamp) -> Result<(), WatcherError> {
        if self.status.is_terminal() {
            return Err(WatcherError::AlreadyTerminal {
                bond_id: self.bond_id.clone(),
                status: self.status,
            });
        }
        self.transition(BondStatus::Withdrawn, "withdrawn", now);
        Ok(())
    }

    fn transition(&mut self, to: BondStatus, reason: impl Into<String>, now: Timestamp) {
        let from = self.status;
        if from == to {
            return;
        }
        self.history.push(WatcherTransitionRecord {
            from,
            to,
            at: now,
            reason: reason.into(),
        });
        self.status = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence() -> SlashingEvidence {
        SlashingEvidence::AvailabilityFailure {
            sla_window: "2026-01-01T00:00:00Z/2026-01-01T01:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_zero_collateral_rejected() {
        assert!(matches!(
            WatcherBond::new("bond-1", 0, "USD"),
            Err(WatcherError::ZeroCollateral)
        ));
    }

    #[test]
    fn test_equivocation_slashes_full_bond() {
        let mut bond = WatcherBond::new("bond-1", 1_000, "USD").unwrap();
        bond.activate(Timestamp::now()).unwrap();
        let slashed = bond
            .slash(
                SlashingCondition::Equivocation,
                SlashingEvidence::Equivocation {
                    attestation_a: ArtifactRef::new("MSEZSmartAssetAttestation", &msez_core::sha256_bytes(b"a")),
                    attestation_b: ArtifactRef::new("MSEZSmartAssetAttestation", &msez_core::sha256_bytes(b"b")),
                },
                Timestamp::now(),
            )
            .unwrap();
        assert_eq!(slashed, 1_000);
        assert_eq!(bond.status, BondStatus::FullySlashed);
        assert_eq!(bond.slash_count, 1);
    }

    #[test]
    fn test_slash_capped_at_available_not_requested() {
        let mut bond = WatcherBond::new("bond-1", 100, "USD").unwrap();
        bond.activate(Timestamp::now()).unwrap();
        // 50% false-attestation slash, then another 50% false-attestation
        // slash should only consume what's left (25), not another 50.
        bond.slash(SlashingCondition::FalseAttestation, evidence(), Timestamp::now())
            .unwrap();
        assert_eq!(bond.available(), 50);
        let second = bond
            .slash(SlashingCondition::FalseAttestation, evidence(), Timestamp::now())
            .unwrap();
        assert_eq!(second, 50);
        assert_eq!(bond.available(), 0);
        assert_eq!(bond.status, BondStatus::FullySlashed);
    }

    #[test]
    fn test_availability_failure_partial_slash() {
        let mut bond = WatcherBond::new("bond-1", 1_000, "USD").unwrap();
        bond.activate(Timestamp::now()).unwrap();
        let slashed = bond
            .slash(SlashingCondition::AvailabilityFailure, evidence(), Timestamp::now())
            .unwrap();
        assert_eq!(slashed, 10);
        assert_eq!(bond.status, BondStatus::PartiallySlashed);
    }

    #[test]
    fn test_slash_after_fully_slashed_rejected() {
        let mut bond = WatcherBond::new("bond-1", 100, "USD").unwrap();
        bond.activate(Timestamp::now()).unwrap();
        bond.slash(SlashingCondition::Equivocation, evidence(), Timestamp::now())
            .unwrap();
        let err = bond
            .slash(SlashingCondition::Collusion, evidence(), Timestamp::now())
            .unwrap_err();
        assert!(matches!(err, WatcherError::AlreadyTerminal { .. }));
    }
}
