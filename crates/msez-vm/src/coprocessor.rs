//! # Coprocessor Ports
//!
//! The compliance and migration opcode classes don't carry their own
//! state — they call out through an injected port, so the VM core stays
//! ignorant of tensor/saga internals and a test harness can swap in a
//! fake implementation.
//!
//! ## Implements
//!
//! Spec §4.12 — Smart-Asset VM, compliance and migration coprocessors.

use msez_core::ComplianceDomain;
use msez_tensor::ComplianceState;

use crate::word::Word;

/// Read access to the compliance tensor, injected into a running VM.
pub trait ComplianceCoprocessor {
    /// Look up one cell's state. `TENSOR_GET` pushes `1` if `COMPLIANT`
    /// or `EXEMPT`, else `0` — the spec's "push {0,1}" behavior.
    fn get_state(
        &self,
        asset_id: &str,
        jurisdiction_id: &str,
        domain: ComplianceDomain,
        time_quantum: &str,
    ) -> Option<ComplianceState>;

    /// The tensor's current Merkle root, as raw bytes, for
    /// `TENSOR_COMMITMENT` to push onto the stack.
    fn commitment_digest(&self) -> Option<[u8; 32]>;
}

/// Outcome of a migration coprocessor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCallOutcome {
    Accepted,
    Rejected,
}

/// Write access into the migration saga / corridor bridge, injected into
/// a running VM. `LOCK`/`UNLOCK`/`TRANSIT`/`SETTLE` each become one call.
pub trait MigrationCoprocessor {
    fn lock(&mut self, migration_id: &str) -> MigrationCallOutcome;
    fn unlock(&mut self, migration_id: &str) -> MigrationCallOutcome;
    fn transit(&mut self, migration_id: &str) -> MigrationCallOutcome;
    fn settle(&mut self, migration_id: &str) -> MigrationCallOutcome;
}

/// Host-backed cryptographic verification, injected into a running VM.
/// `VERIFY_SIG`/`MERKLE_VERIFY` each pop one word — a handle the host
/// resolves against its own signature/proof material — and call through
/// this port; the VM never touches ed25519 or Merkle proof bytes itself.
pub trait CryptoCoprocessor {
    /// Verify the signature referenced by `handle`.
    fn verify_signature(&self, handle: Word) -> bool;
    /// Verify the Merkle inclusion proof referenced by `handle`.
    fn verify_merkle(&self, handle: Word) -> bool;
}

/// A coprocessor trio that always rejects — the default when a program
/// doesn't need any of them, so the VM never has to special-case "no port
/// installed" as a distinct execution mode.
#[derive(Debug, Default)]
pub struct NullCoprocessor;

impl ComplianceCoprocessor for NullCoprocessor {
    fn get_state(
        &self,
        _asset_id: &str,
        _jurisdiction_id: &str,
        _domain: ComplianceDomain,
        _time_quantum: &str,
    ) -> Option<ComplianceState> {
        None
    }

    fn commitment_digest(&self) -> Option<[u8; 32]> {
        None
    }
}

impl MigrationCoprocessor for NullCoprocessor {
    fn lock(&mut self, _migration_id: &str) -> MigrationCallOutcome {
        MigrationCallOutcome::Rejected
    }
    fn unlock(&mut self, _migration_id: &str) -> MigrationCallOutcome {
        MigrationCallOutcome::Rejected
    }
    fn transit(&mut self, _migration_id: &str) -> MigrationCallOutcome {
        MigrationCallOutcome::Rejected
    }
    fn settle(&mut self, _migration_id: &str) -> MigrationCallOutcome {
        MigrationCallOutcome::Rejected
    }
}

impl CryptoCoprocessor for NullCoprocessor {
    fn verify_signature(&self, _handle: Word) -> bool {
        false
    }
    fn verify_merkle(&self, _handle: Word) -> bool {
        false
    }
}
