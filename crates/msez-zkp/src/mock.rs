//! # Mock Proof System (Phase 1)
//!
//! A deterministic, transparent "proof system" for Phase 1 deployment.
//! A proof is a pair of SHA-256 digests: one over the full witness
//! (public + private inputs), one over the public inputs alone. Proofs
//! carry no zero-knowledge privacy guarantee — `verify` only checks
//! that a proof was produced for the public inputs it is being checked
//! against, not that a satisfying witness exists.
//!
//! ## Security Notice
//!
//! This implementation provides NO zero-knowledge privacy. It is
//! acceptable for Phase 1 (deterministic compliance evaluation) but
//! must be replaced with real proof systems in Phase 2.

use msez_core::sha256_bytes;

use crate::traits::{ProofError, ProofSystem, VerifyError};

/// A mock proof. `witness_digest` binds both inputs (what a real
/// circuit's proof would attest to); `public_digest` binds only the
/// public inputs, so `verify` can check a proof was produced for the
/// public inputs it is being checked against without ever seeing the
/// private inputs again.
#[derive(Debug, Clone)]
pub struct MockProof {
    pub witness_digest: [u8; 32],
    pub public_digest: [u8; 32],
}

/// A mock verifying key.
#[derive(Debug, Clone)]
pub struct MockVerifyingKey;

/// A mock proving key.
#[derive(Debug, Clone)]
pub struct MockProvingKey;

/// Phase 1 mock proof system — deterministic, transparent, no ZK privacy.
///
/// Proofs provide no zero-knowledge guarantee: `verify` only checks that
/// the proof was generated against the same public inputs it is being
/// checked against, not that a witness satisfying the circuit exists.
#[derive(Debug, Default)]
pub struct MockProofSystem;

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type VerifyingKey = MockVerifyingKey;
    type ProvingKey = MockProvingKey;

    fn prove(
        &self,
        _pk: &Self::ProvingKey,
        public_inputs: &[u8],
        private_inputs: &[u8],
    ) -> Result<Self::Proof, ProofError> {
        let mut witness = Vec::with_capacity(public_inputs.len() + private_inputs.len());
        witness.extend_from_slice(public_inputs);
        witness.extend_from_slice(private_inputs);
        Ok(MockProof {
            witness_digest: sha256_bytes(&witness).bytes,
            public_digest: sha256_bytes(public_inputs).bytes,
        })
    }

    fn verify(
        &self,
        _vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[u8],
    ) -> Result<bool, VerifyError> {
        Ok(proof.public_digest == sha256_bytes(public_inputs).bytes)
    }
}
