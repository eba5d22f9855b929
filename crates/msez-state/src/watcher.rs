//! # Watcher Bonding (compatibility re-export)
//!
//! The watcher economy was elevated to its own crate, `msez-watcher`, since
//! bonding/slashing/reputation/selection/equivocation detection is
//! substantial enough to version and test independently of the other
//! typestate machines in this crate. This module re-exports those types
//! so existing call sites resolving `msez_state::watcher::*` keep working.
//!
//! ## Implements
//!
//! Spec §4.10 — Watcher Economy (implementation lives in `msez-watcher`).

pub use msez_watcher::{
    AttestationClaim, BondStatus, EquivocationDetector, EquivocationEvidence, ReputationMetrics,
    SlashingCondition, SlashingEvidence, SlashingRecord, Watcher, WatcherBond, WatcherError,
    WatcherRegistry, WatcherTransitionRecord,
};
