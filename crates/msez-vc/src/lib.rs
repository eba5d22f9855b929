//! # msez-vc — Verifiable Credentials
//!
//! Implements W3C Verifiable Credentials for the SEZ Stack, including:
//!
//! - **Credential** (`credential.rs`): VC structure, issuance, and verification
//!   following the W3C VC Data Model v2.0.
//!
//! - **Proof** (`proof.rs`): DataIntegrity proof structure over the
//!   `eddsa-jcs-2022` cryptosuite, and (Phase 2) BBS+ selective disclosure.
//!
//! - **Registry** (`registry.rs`): Smart Asset Registry VCs — the credential
//!   type used to assert compliance evaluation results.
//!
//! ## Security Invariant
//!
//! All VC digests are computed from `CanonicalBytes` via `msez-crypto`'s
//! Ed25519 signing path. Proof signing uses real Ed25519 — no mocking in
//! production paths.
//!
//! ## Crate Policy
//!
//! - Depends on `msez-core` and `msez-crypto` internally.
//! - `credentialSubject` remains extensible per W3C VC spec.
//! - `proof` array elements have rigid structure (`additionalProperties: false`).

pub mod credential;
pub mod error;
pub mod proof;
pub mod registry;

pub use credential::VerifiableCredential;
pub use error::VcError;
pub use proof::{Proof, ProofPurpose, ProofType, EDDSA_JCS_2022};
pub use registry::{DomainFinding, SmartAssetRegistrySubject, SmartAssetRegistryVc};
