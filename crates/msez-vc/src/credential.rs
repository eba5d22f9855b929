//! # Verifiable Credential Structure
//!
//! Defines the core VC envelope following W3C VC Data Model v2.0, with
//! signing and verification over the DataIntegrity EdDSA-JCS-2022
//! cryptosuite.
//!
//! ## Implements
//!
//! Spec §3/§6 — Verifiable Credential structure and signing protocol
//! ("proofs are DataIntegrity EdDSA-JCS-2022 ... must verify over JCS of
//! the VC minus `proof`").

use msez_core::{CanonicalBytes, ContentDigest, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::VcError;
use crate::proof::{Proof, ProofPurpose};

const DEFAULT_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// A W3C Verifiable Credential.
///
/// `credential_subject` stays an open `serde_json::Value` per the W3C VC
/// model's extensibility requirement — concrete subject shapes (e.g.
/// `SmartAssetRegistryVc`) are built on top by serializing into this field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiableCredential {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// Optional credential identifier (often a URN or artifact URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The VC type array, e.g. `["VerifiableCredential", "MSEZCorridorForkAlarmCredential"]`.
    #[serde(rename = "type")]
    pub vc_type: Vec<String>,
    /// The issuer DID.
    pub issuer: String,
    /// When the credential was issued.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,
    /// Optional expiration; absent means the credential never expires.
    #[serde(rename = "expirationDate", skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
    /// The credential subject (extensible per W3C spec).
    #[serde(rename = "credentialSubject")]
    pub credential_subject: serde_json::Value,
    /// The DataIntegrity proof, present once signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiableCredential {
    /// Build an unsigned credential. `vc_type` should NOT include the
    /// leading `"VerifiableCredential"` tag — it is prepended automatically.
    pub fn new(
        vc_type: impl Into<String>,
        issuer: impl Into<String>,
        credential_subject: serde_json::Value,
    ) -> Self {
        Self {
            context: vec![DEFAULT_CONTEXT.to_string()],
            id: None,
            vc_type: vec!["VerifiableCredential".to_string(), vc_type.into()],
            issuer: issuer.into(),
            issuance_date: Timestamp::now(),
            expiration_date: None,
            credential_subject,
            proof: None,
        }
    }

    /// Attach an `id` (builder-style).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach an `expirationDate` (builder-style).
    pub fn with_expiration(mut self, expiration: Timestamp) -> Self {
        self.expiration_date = Some(expiration);
        self
    }

    /// JCS bytes of this credential with `proof` removed — the exact
    /// input that is signed and that verification re-derives.
    pub fn signing_bytes(&self) -> Result<CanonicalBytes, VcError> {
        let mut value = serde_json::to_value(self).map_err(|e| {
            VcError::Canonicalization(msez_core::CanonicalizationError::SerializationFailed(e))
        })?;
        if let serde_json::Value::Object(ref mut map) = value {
            map.remove("proof");
        }
        Ok(CanonicalBytes::new(&value)?)
    }

    /// Digest of this credential minus `proof` (spec §3 `vc` artifact
    /// digest rule: `sha256(JCS(obj without proof))`).
    pub fn digest(&self) -> Result<ContentDigest, VcError> {
        Ok(msez_core::sha256_digest(&self.signing_bytes()?))
    }

    /// Sign the credential, attaching a `DataIntegrityProof`. Consumes and
    /// returns `self` so callers can chain from `new()`.
    pub fn sign(
        mut self,
        keypair: &msez_crypto::Ed25519KeyPair,
        verification_method: impl Into<String>,
    ) -> Result<Self, VcError> {
        let canonical = self.signing_bytes()?;
        let signature = keypair.sign(&canonical);
        self.proof = Some(Proof::new(
            verification_method,
            ProofPurpose::AssertionMethod,
            &signature,
        ));
        Ok(self)
    }

    /// Verify the attached proof against `public_key`. Returns `Ok(())`
    /// only if a proof is present, its cryptosuite is `eddsa-jcs-2022`,
    /// and the signature checks out over JCS of the VC minus `proof`.
    pub fn verify(&self, public_key: &msez_crypto::Ed25519PublicKey) -> Result<(), VcError> {
        let proof = self.proof.as_ref().ok_or(VcError::ProofMissing)?;
        if proof.cryptosuite != crate::proof::EDDSA_JCS_2022 {
            return Err(VcError::UnsupportedCryptosuite(proof.cryptosuite.clone()));
        }
        let canonical = self.signing_bytes()?;
        let signature = proof.signature()?;
        msez_crypto::ed25519::verify_with_public_key(&canonical, &signature, public_key)
            .map_err(VcError::VerificationFailed)
    }

    /// True if `expirationDate` is set and `now` is at or past it.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        matches!(self.expiration_date, Some(exp) if now >= exp)
    }

    /// Verify the proof and additionally reject an expired credential.
    pub fn verify_current(
        &self,
        public_key: &msez_crypto::Ed25519PublicKey,
        now: Timestamp,
    ) -> Result<(), VcError> {
        self.verify(public_key)?;
        if let Some(expiration) = self.expiration_date {
            if now >= expiration {
                return Err(VcError::Expired {
                    expiration: expiration.to_iso8601(),
                    now: now.to_iso8601(),
                });
            }
        }
        Ok(())
    }
}
