//! # msez-arbitration — Dispute Resolution
//!
//! Implements the dispute resolution lifecycle for the SEZ Stack:
//!
//! - **Money** (`money.rs`): fixed-point decimal amount tagged with a
//!   currency, used throughout claims, rulings, and escrow.
//!
//! - **Dispute** (`dispute.rs`): dispute lifecycle state machine
//!   (filing, response, hearing, resolution) plus the ruling VC
//!   builder.
//!
//! - **Evidence** (`evidence.rs`): content-addressed, signed evidence
//!   packages for dispute proceedings.
//!
//! - **Escrow** (`escrow.rs`): escrow FSM for amounts held during
//!   arbitration, with an immutable transaction log.
//!
//! - **Enforcement** (`enforcement.rs`): derives the enforcement
//!   action implied by a ruling's order and records the enforcement
//!   receipt.
//!
//! ## Crate Policy
//!
//! - Depends on `msez-core`, `msez-crypto`, `msez-vc`, and `msez-state`
//!   internally.
//! - Ruling and evidence signatures use the same DataIntegrity
//!   EdDSA-JCS-2022 idiom as `msez-vc`'s other credential types.
//! - Money arithmetic never uses floating point; cross-currency
//!   operations are a typed error.

pub mod dispute;
pub mod enforcement;
pub mod escrow;
pub mod evidence;
pub mod money;

pub use dispute::{
    Claim, Disposition, Dispute, DisputeId, DisputeState, DisputeType, EnforcementMethod,
    Institution, InvalidDisputeTransition, Order, OrderType, Party, Ruling, RulingType, ruling_vc,
};
pub use enforcement::{enforce_order, EnforcementAction, EnforcementError, EnforcementReceipt};
pub use escrow::{
    Escrow, EscrowError, EscrowId, EscrowStatus, EscrowTransaction, EscrowTransactionKind,
    EscrowType, ReleaseCondition, ReleaseConditionType,
};
pub use evidence::{AuthenticityAttestation, AuthenticityType, EvidenceError, EvidenceItem, EvidencePackage, EvidenceType};
pub use money::{CurrencyMismatch, Money};
