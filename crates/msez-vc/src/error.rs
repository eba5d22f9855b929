//! Error types for Verifiable Credential issuance and verification.

use thiserror::Error;

/// Errors arising from VC construction, signing, or verification.
#[derive(Error, Debug)]
pub enum VcError {
    /// The credential carries no `proof` entry to verify.
    #[error("credential has no proof")]
    ProofMissing,

    /// The DataIntegrity proof's cryptosuite is not one this verifier
    /// supports (only `eddsa-jcs-2022` in Phase 1).
    #[error("unsupported cryptosuite {0:?}")]
    UnsupportedCryptosuite(String),

    /// `verificationMethod` is not a well-formed `did:...#key` reference.
    #[error("malformed verification method {0:?}")]
    MalformedVerificationMethod(String),

    /// Proof value failed to decode as hex.
    #[error("malformed proof value: {0}")]
    MalformedProofValue(String),

    /// Signature verification against the supplied key failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(#[from] msez_core::CryptoError),

    /// Canonicalization of the credential (for signing or digesting) failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] msez_core::CanonicalizationError),

    /// The credential has expired relative to the reference time.
    #[error("credential expired at {expiration}, reference time {now}")]
    Expired {
        /// The credential's declared expiration.
        expiration: String,
        /// The time it was checked against.
        now: String,
    },
}
