//! # Escrow Operations
//!
//! Manages amounts escrowed for the duration of a dispute: filing
//! fees, security deposits, award escrow, and appeal bonds.
//!
//! ## States
//!
//! `pending -> funded -> {partially_released | fully_released | forfeited}`
//!
//! Every transaction against an escrow — deposit, release, forfeit —
//! is appended to an immutable `transactions` log rather than
//! overwriting prior state.
//!
//! ## Implements
//!
//! Spec §4.15 — Arbitration & Escrow: escrow FSM.

use msez_core::{Timestamp, DID};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dispute::DisputeId;
use crate::money::{CurrencyMismatch, Money};

/// Unique identifier for an escrow account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscrowId(pub Uuid);

impl EscrowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EscrowId {
    fn default() -> Self {
        Self::new()
    }
}

/// What an escrow account is funded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowType {
    FilingFee,
    SecurityDeposit,
    AwardEscrow,
    AppealBond,
}

/// The lifecycle state of an escrow account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowStatus {
    Pending,
    Funded,
    PartiallyReleased,
    FullyReleased,
    Forfeited,
}

impl std::fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EscrowStatus::Pending => "PENDING",
            EscrowStatus::Funded => "FUNDED",
            EscrowStatus::PartiallyReleased => "PARTIALLY_RELEASED",
            EscrowStatus::FullyReleased => "FULLY_RELEASED",
            EscrowStatus::Forfeited => "FORFEITED",
        };
        f.write_str(name)
    }
}

/// The condition type under which escrow funds may be released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseConditionType {
    RulingEnforced,
    AppealPeriodExpired,
    SettlementAgreed,
    DisputeWithdrawn,
    InstitutionOrder,
}

/// A condition gating escrow release, and whether it has been met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseCondition {
    pub condition_type: ReleaseConditionType,
    pub satisfied: bool,
    pub satisfied_at: Option<Timestamp>,
}

impl ReleaseCondition {
    pub fn unsatisfied(condition_type: ReleaseConditionType) -> Self {
        Self { condition_type, satisfied: false, satisfied_at: None }
    }

    pub fn satisfy(&mut self) {
        self.satisfied = true;
        self.satisfied_at = Some(Timestamp::now());
    }
}

/// The kind of movement a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowTransactionKind {
    Deposit,
    PartialRelease,
    FullRelease,
    Forfeit,
}

/// One immutable entry in an escrow's transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowTransaction {
    pub kind: EscrowTransactionKind,
    pub amount: Money,
    pub timestamp: Timestamp,
    pub recipient: Option<DID>,
    pub reason: Option<String>,
    pub ruling_vc_digest: Option<String>,
}

/// Raised when an escrow operation is attempted from a status, or for
/// an amount, that does not permit it.
#[derive(Error, Debug)]
pub enum EscrowError {
    #[error("cannot {action} an escrow in status {status}")]
    InvalidTransition { status: EscrowStatus, action: &'static str },
    #[error("release amount {requested} exceeds remaining balance {remaining}")]
    AmountExceedsBalance { requested: Money, remaining: Money },
    #[error(transparent)]
    CurrencyMismatch(#[from] CurrencyMismatch),
}

/// An escrow account funded for the duration of a dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    pub escrow_id: EscrowId,
    pub dispute_id: DisputeId,
    pub escrow_type: EscrowType,
    pub amount: Money,
    pub status: EscrowStatus,
    pub depositor: Option<DID>,
    pub beneficiary: Option<DID>,
    pub release_conditions: Vec<ReleaseCondition>,
    pub transactions: Vec<EscrowTransaction>,
}

impl Escrow {
    pub fn open(dispute_id: DisputeId, escrow_type: EscrowType, amount: Money, depositor: Option<DID>) -> Self {
        Self {
            escrow_id: EscrowId::new(),
            dispute_id,
            escrow_type,
            amount,
            status: EscrowStatus::Pending,
            depositor,
            beneficiary: None,
            release_conditions: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Total already released or forfeited against this escrow.
    fn released_total(&self) -> Result<Money, CurrencyMismatch> {
        let mut total = Money::zero(self.amount.currency().to_string());
        for tx in &self.transactions {
            if matches!(tx.kind, EscrowTransactionKind::PartialRelease | EscrowTransactionKind::FullRelease | EscrowTransactionKind::Forfeit) {
                total = total.add(&tx.amount)?;
            }
        }
        Ok(total)
    }

    fn remaining(&self) -> Result<Money, CurrencyMismatch> {
        self.amount.sub(&self.released_total()?)
    }

    /// Record the initial deposit: `pending -> funded`.
    pub fn deposit(&mut self) -> Result<&EscrowTransaction, EscrowError> {
        if self.status != EscrowStatus::Pending {
            return Err(EscrowError::InvalidTransition { status: self.status, action: "deposit into" });
        }
        self.push(EscrowTransactionKind::Deposit, self.amount.clone(), None, None, None);
        self.status = EscrowStatus::Funded;
        Ok(self.transactions.last().expect("just pushed"))
    }

    /// Release part of the escrowed amount to `recipient`:
    /// `funded | partially_released -> partially_released`.
    pub fn partially_release(&mut self, amount: Money, recipient: DID, reason: impl Into<String>) -> Result<&EscrowTransaction, EscrowError> {
        if !matches!(self.status, EscrowStatus::Funded | EscrowStatus::PartiallyReleased) {
            return Err(EscrowError::InvalidTransition { status: self.status, action: "partially release" });
        }
        let remaining = self.remaining()?;
        if !remaining.covers(&amount)? {
            return Err(EscrowError::AmountExceedsBalance { requested: amount, remaining });
        }
        self.push(EscrowTransactionKind::PartialRelease, amount, Some(recipient), Some(reason.into()), None);
        self.status = EscrowStatus::PartiallyReleased;
        Ok(self.transactions.last().expect("just pushed"))
    }

    /// Release the entire remaining balance to `recipient`:
    /// `funded | partially_released -> fully_released`.
    pub fn fully_release(&mut self, recipient: DID, reason: impl Into<String>, ruling_vc_digest: Option<String>) -> Result<&EscrowTransaction, EscrowError> {
        if !matches!(self.status, EscrowStatus::Funded | EscrowStatus::PartiallyReleased) {
            return Err(EscrowError::InvalidTransition { status: self.status, action: "fully release" });
        }
        let remaining = self.remaining()?;
        self.push(EscrowTransactionKind::FullRelease, remaining, Some(recipient), Some(reason.into()), ruling_vc_digest);
        self.status = EscrowStatus::FullyReleased;
        Ok(self.transactions.last().expect("just pushed"))
    }

    /// Forfeit the entire remaining balance per an adverse ruling:
    /// `funded -> forfeited`.
    pub fn forfeit(&mut self, reason: impl Into<String>, ruling_vc_digest: String) -> Result<&EscrowTransaction, EscrowError> {
        if self.status != EscrowStatus::Funded {
            return Err(EscrowError::InvalidTransition { status: self.status, action: "forfeit" });
        }
        let remaining = self.remaining()?;
        self.push(EscrowTransactionKind::Forfeit, remaining, None, Some(reason.into()), Some(ruling_vc_digest));
        self.status = EscrowStatus::Forfeited;
        Ok(self.transactions.last().expect("just pushed"))
    }

    fn push(&mut self, kind: EscrowTransactionKind, amount: Money, recipient: Option<DID>, reason: Option<String>, ruling_vc_digest: Option<String>) {
        self.transactions.push(EscrowTransaction {
            kind,
            amount,
            timestamp: Timestamp::now(),
            recipient,
            reason,
            ruling_vc_digest,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beneficiary() -> DID {
        DID::parse("did:key:claimant").unwrap()
    }

    fn funded_escrow(amount_cents: i64) -> Escrow {
        let mut escrow = Escrow::open(DisputeId::new(), EscrowType::AwardEscrow, Money::new(amount_cents, "USD"), None);
        escrow.deposit().unwrap();
        escrow
    }

    #[test]
    fn test_deposit_moves_pending_to_funded() {
        let escrow = funded_escrow(100_000);
        assert_eq!(escrow.status, EscrowStatus::Funded);
    }

    #[test]
    fn test_double_deposit_rejected() {
        let mut escrow = funded_escrow(100_000);
        assert!(escrow.deposit().is_err());
    }

    #[test]
    fn test_full_release_exhausts_balance() {
        let mut escrow = funded_escrow(100_000);
        escrow.fully_release(beneficiary(), "ruling enforced", None).unwrap();
        assert_eq!(escrow.status, EscrowStatus::FullyReleased);
        assert_eq!(escrow.remaining().unwrap(), Money::new(0, "USD"));
    }

    #[test]
    fn test_partial_release_then_full_release_of_remainder() {
        let mut escrow = funded_escrow(100_000);
        escrow.partially_release(Money::new(40_000, "USD"), beneficiary(), "interim payment").unwrap();
        assert_eq!(escrow.status, EscrowStatus::PartiallyReleased);
        escrow.fully_release(beneficiary(), "final payment", None).unwrap();
        assert_eq!(escrow.remaining().unwrap(), Money::new(0, "USD"));
        assert_eq!(escrow.transactions.len(), 3);
    }

    #[test]
    fn test_partial_release_exceeding_balance_rejected() {
        let mut escrow = funded_escrow(100_000);
        assert!(escrow.partially_release(Money::new(200_000, "USD"), beneficiary(), "too much").is_err());
    }

    #[test]
    fn test_forfeit_requires_funded_status() {
        let mut escrow = Escrow::open(DisputeId::new(), EscrowType::SecurityDeposit, Money::new(50_000, "USD"), None);
        assert!(escrow.forfeit("never funded", "digest".into()).is_err());
    }

    #[test]
    fn test_forfeit_from_funded_succeeds() {
        let mut escrow = funded_escrow(50_000);
        escrow.forfeit("adverse ruling", "digest".into()).unwrap();
        assert_eq!(escrow.status, EscrowStatus::Forfeited);
    }

    #[test]
    fn test_transactions_log_is_append_only() {
        let mut escrow = funded_escrow(100_000);
        escrow.fully_release(beneficiary(), "paid", None).unwrap();
        assert_eq!(escrow.transactions.len(), 2);
        assert_eq!(escrow.transactions[0].kind, EscrowTransactionKind::Deposit);
        assert_eq!(escrow.transactions[1].kind, EscrowTransactionKind::FullRelease);
    }
}
