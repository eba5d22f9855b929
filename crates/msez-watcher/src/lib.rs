//! # msez-watcher — Corridor Watcher Economy
//!
//! Watchers bond collateral, attest to compliance-tensor facts, and are
//! slashed for misbehavior. This crate owns that economy end to end:
//!
//! - **Bond** (`bond.rs`): `WatcherBond`, `BondStatus`, `SlashingCondition`
//!   with exact slash percentages, slash-capped-at-available semantics.
//! - **Reputation** (`reputation.rs`): the weighted availability/accuracy/
//!   tenure score driving quorum selection.
//! - **Registry** (`registry.rs`): `WatcherRegistry::select_watchers`,
//!   `min(min_count, eligible)` sized, reputation-desc / did-lex order.
//! - **Equivocation** (`equivocation.rs`): incremental detector over
//!   `(watcher, subject, domain, time_quantum)`.
//!
//! Previously a thin stub lived under `msez_state::watcher`; that module
//! now re-exports these types for compatibility.
//!
//! ## Implements
//!
//! Spec §3 (Watcher data model), §4.10 Watcher Economy.

pub mod bond;
pub mod equivocation;
pub mod reputation;
pub mod registry;

pub use bond::{
    BondStatus, SlashingCondition, SlashingEvidence, SlashingRecord, WatcherBond, WatcherError,
    WatcherTransitionRecord,
};
pub use equivocation::{AttestationClaim, EquivocationDetector, EquivocationEvidence};
pub use reputation::ReputationMetrics;
pub use registry::{Watcher, WatcherRegistry};
