//! # Proof Types
//!
//! Defines the DataIntegrity proof structure attached to Verifiable
//! Credentials, and the Ed25519-JCS cryptosuite that produces/checks it.
//!
//! ## Proof Types Supported
//!
//! - `DataIntegrityProof` with cryptosuite `eddsa-jcs-2022` — Phase 1 (current).
//! - BBS+ selective disclosure (Phase 2) — type signature only, behind the
//!   `bbs-plus` feature on `msez-crypto`; not constructible here yet.
//!
//! ## Security Invariant
//!
//! Proof array elements have rigid structure — no arbitrary fields may be
//! injected into proofs; the proof itself is excluded from the digest it
//! secures (`strict_digest` over the credential minus `proof`).
//!
//! ## Implements
//!
//! Spec §6 — wire format ("proofs are DataIntegrity EdDSA-JCS-2022").

use msez_core::Timestamp;
use serde::{Deserialize, Serialize};

/// The cryptosuite identifier for Ed25519 signing over JCS-canonicalized
/// input, as named on the wire.
pub const EDDSA_JCS_2022: &str = "eddsa-jcs-2022";

/// The type of cryptographic proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofType {
    /// A W3C Data Integrity proof (cryptosuite carries the actual algorithm).
    DataIntegrityProof,
    /// BBS+ selective disclosure proof (Phase 2, not yet constructible).
    BbsBlsSignature2020,
}

/// The purpose a proof asserts, per the Data Integrity spec's `proofPurpose`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The credential is being asserted by its issuer.
    AssertionMethod,
    /// The proof authenticates the controller of the verification method.
    Authentication,
    /// The proof authorizes a capability invocation.
    CapabilityInvocation,
}

/// A cryptographic proof attached to a Verifiable Credential.
///
/// Serializes with W3C Data Integrity field names (camelCase on the wire).
/// `additionalProperties: false` at the schema level — no field beyond
/// these five may appear in a proof object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// The type of proof; always `DataIntegrityProof` in Phase 1.
    #[serde(rename = "type")]
    pub proof_type: ProofType,
    /// The cryptosuite used, e.g. `eddsa-jcs-2022`.
    pub cryptosuite: String,
    /// When the proof was created.
    pub created: Timestamp,
    /// The DID URL of the verification method used (`did:...#key-1`).
    pub verification_method: String,
    /// The purpose this proof is offered for.
    pub proof_purpose: ProofPurpose,
    /// The signature value, lowercase hex-encoded.
    pub proof_value: String,
}

impl Proof {
    /// Construct a proof record from a freshly computed Ed25519 signature.
    pub fn new(
        verification_method: impl Into<String>,
        proof_purpose: ProofPurpose,
        signature: &msez_crypto::Ed25519Signature,
    ) -> Self {
        Self {
            proof_type: ProofType::DataIntegrityProof,
            cryptosuite: EDDSA_JCS_2022.to_string(),
            created: Timestamp::now(),
            verification_method: verification_method.into(),
            proof_purpose,
            proof_value: signature.to_hex(),
        }
    }

    /// Decode `proof_value` back into an `Ed25519Signature`.
    pub fn signature(&self) -> Result<msez_crypto::Ed25519Signature, crate::error::VcError> {
        msez_crypto::Ed25519Signature::from_hex(&self.proof_value)
            .map_err(crate::error::VcError::VerificationFailed)
    }

    /// Split `did:method:id#fragment` into `(did, fragment)`. The DID part
    /// is the signer's identity; the fragment names the specific key.
    pub fn split_verification_method(&self) -> Result<(&str, &str), crate::error::VcError> {
        self.verification_method
            .split_once('#')
            .filter(|(did, frag)| !did.is_empty() && !frag.is_empty())
            .ok_or_else(|| {
                crate::error::VcError::MalformedVerificationMethod(
                    self.verification_method.clone(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::CanonicalBytes;

    #[test]
    fn test_proof_roundtrips_signature() {
        let kp = msez_crypto::Ed25519KeyPair::generate();
        let canonical = CanonicalBytes::new(&serde_json::json!({"x": 1})).unwrap();
        let sig = kp.sign(&canonical);
        let proof = Proof::new("did:key:zTest#key-1", ProofPurpose::AssertionMethod, &sig);
        assert_eq!(proof.signature().unwrap(), sig);
    }

    #[test]
    fn test_split_verification_method_ok() {
        let kp = msez_crypto::Ed25519KeyPair::generate();
        let canonical = CanonicalBytes::new(&serde_json::json!({"x": 1})).unwrap();
        let sig = kp.sign(&canonical);
        let proof = Proof::new("did:key:zTest#key-1", ProofPurpose::AssertionMethod, &sig);
        let (did, frag) = proof.split_verification_method().unwrap();
        assert_eq!(did, "did:key:zTest");
        assert_eq!(frag, "key-1");
    }

    #[test]
    fn test_split_verification_method_rejects_missing_fragment() {
        let kp = msez_crypto::Ed25519KeyPair::generate();
        let canonical = CanonicalBytes::new(&serde_json::json!({"x": 1})).unwrap();
        let sig = kp.sign(&canonical);
        let proof = Proof::new("did:key:zTest", ProofPurpose::AssertionMethod, &sig);
        assert!(proof.split_verification_method().is_err());
    }

    #[test]
    fn test_proof_serializes_camel_case() {
        let kp = msez_crypto::Ed25519KeyPair::generate();
        let canonical = CanonicalBytes::new(&serde_json::json!({"x": 1})).unwrap();
        let sig = kp.sign(&canonical);
        let proof = Proof::new("did:key:zTest#key-1", ProofPurpose::AssertionMethod, &sig);
        let value = serde_json::to_value(&proof).unwrap();
        assert_eq!(value["cryptosuite"], "eddsa-jcs-2022");
        assert_eq!(value["proofPurpose"], "assertionMethod");
        assert!(value.get("verificationMethod").is_some());
    }
}
