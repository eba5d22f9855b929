//! # Execution Context
//!
//! Immutable for the duration of one execution — the VM never reads a
//! clock or RNG directly; `timestamp` and `block_height` are the only
//! way time enters a running program, and both are fixed before
//! execution starts.
//!
//! ## Implements
//!
//! Spec §3 — Smart-Asset VM state, §4.12 determinism rule.

use msez_core::{JurisdictionId, Timestamp};

/// The read-only environment a VM execution runs inside.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub caller: String,
    pub origin: String,
    pub jurisdiction: JurisdictionId,
    pub timestamp: Timestamp,
    pub block_height: u64,
    pub gas_limit: u64,
    pub gas_price: u64,
}

impl ExecutionContext {
    pub fn new(
        caller: impl Into<String>,
        origin: impl Into<String>,
        jurisdiction: JurisdictionId,
        timestamp: Timestamp,
        block_height: u64,
        gas_limit: u64,
        gas_price: u64,
    ) -> Self {
        Self {
            caller: caller.into(),
            origin: origin.into(),
            jurisdiction,
            timestamp,
            block_height,
            gas_limit,
            gas_price,
        }
    }
}
