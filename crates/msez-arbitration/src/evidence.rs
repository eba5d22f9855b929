//! # Evidence Package Management
//!
//! Content-addressed evidence packages for dispute proceedings. Each
//! item references its underlying artifact by digest rather than
//! embedding it, the same `ArtifactRef`-by-digest convention used
//! throughout the rest of the stack.
//!
//! ## Implements
//!
//! Spec §4.15 — Arbitration & Escrow: evidence package.

use msez_core::{ArtifactRef, CanonicalizationError, CryptoError, DID};
use msez_vc::{Proof, ProofPurpose, VcError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dispute::DisputeId;

/// The kind of evidence a single item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceType {
    SmartAssetReceipt,
    CorridorReceipt,
    ComplianceEvidence,
    ExpertReport,
    WitnessStatement,
    ContractDocument,
    CommunicationRecord,
    PaymentRecord,
    ShippingDocument,
    InspectionReport,
}

/// How an evidence item's authenticity is attested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticityType {
    CorridorCheckpointInclusion,
    SmartAssetCheckpointInclusion,
    NotarizedDocument,
    ExpertCertification,
    ChainOfCustody,
}

/// An attestation proving an evidence item's authenticity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticityAttestation {
    pub attestation_type: AuthenticityType,
    pub proof_ref: Option<ArtifactRef>,
}

/// A single piece of evidence submitted in support of a dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub evidence_id: String,
    pub evidence_type: EvidenceType,
    pub description: String,
    pub artifact_ref: ArtifactRef,
    pub relevance: Option<String>,
    pub authenticity_attestation: Option<AuthenticityAttestation>,
}

/// Errors raised signing or verifying an evidence package.
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("evidence package has no submitting party proof")]
    ProofMissing,
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
    #[error(transparent)]
    Vc(#[from] VcError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// An evidence package: every item a party submits into one dispute's
/// record, signed as a unit by the submitting party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidencePackage {
    pub evidence_package_id: Uuid,
    pub dispute_id: DisputeId,
    pub submitting_party: DID,
    pub evidence_items: Vec<EvidenceItem>,
    pub proof: Option<Proof>,
}

impl EvidencePackage {
    pub fn new(dispute_id: DisputeId, submitting_party: DID, evidence_items: Vec<EvidenceItem>) -> Self {
        Self {
            evidence_package_id: Uuid::new_v4(),
            dispute_id,
            submitting_party,
            evidence_items,
            proof: None,
        }
    }

    /// JCS bytes of this package with `proof` removed.
    fn signing_bytes(&self) -> Result<msez_core::CanonicalBytes, EvidenceError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| EvidenceError::Canonicalization(CanonicalizationError::SerializationFailed(e)))?;
        if let serde_json::Value::Object(ref mut map) = value {
            map.remove("proof");
        }
        Ok(msez_core::CanonicalBytes::new(&value)?)
    }

    /// Sign the package, attesting that `submitting_party` submitted
    /// exactly these items.
    pub fn sign(
        mut self,
        keypair: &msez_crypto::Ed25519KeyPair,
        verification_method: impl Into<String>,
    ) -> Result<Self, EvidenceError> {
        let canonical = self.signing_bytes()?;
        let signature = keypair.sign(&canonical);
        self.proof = Some(Proof::new(verification_method, ProofPurpose::AssertionMethod, &signature));
        Ok(self)
    }

    /// Verify the attached proof against `public_key`.
    pub fn verify_proof(&self, public_key: &msez_crypto::Ed25519PublicKey) -> Result<(), EvidenceError> {
        let proof = self.proof.as_ref().ok_or(EvidenceError::ProofMissing)?;
        let canonical = self.signing_bytes()?;
        let signature = proof.signature()?;
        msez_crypto::ed25519::verify_with_public_key(&canonical, &signature, public_key)
            .map_err(EvidenceError::Crypto)
    }
}
