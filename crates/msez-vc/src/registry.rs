//! # Smart Asset Registry VC
//!
//! The credential type used to assert compliance evaluation results for
//! smart assets: a typed `credentialSubject` shape layered on top of the
//! generic `VerifiableCredential` envelope.
//!
//! ## Implements
//!
//! Spec §3 — `smart-asset-attestation`/`vc` artifact types; §4.6 Compliance
//! Tensor commitments as VC-able objects.

use msez_core::{ComplianceDomain, Timestamp};
use serde::{Deserialize, Serialize};

use crate::credential::VerifiableCredential;
use crate::error::VcError;

const REGISTRY_VC_TYPE: &str = "MSEZSmartAssetRegistryCredential";

/// One compliance-domain finding carried in a registry credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainFinding {
    /// Which compliance domain this finding covers.
    pub domain: ComplianceDomain,
    /// The compliance state asserted for this domain as of `as_of`.
    pub state: String,
    /// Optional machine reason code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
}

/// The typed subject of a Smart Asset Registry Verifiable Credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartAssetRegistrySubject {
    /// The asset being registered/evaluated.
    pub asset_id: String,
    /// The asset's declared type tag.
    pub asset_type: String,
    /// The jurisdiction of registration.
    pub jurisdiction_id: String,
    /// Per-domain compliance findings as of issuance.
    pub findings: Vec<DomainFinding>,
    /// Digest of the compliance tensor commitment this subject summarizes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tensor_commitment_digest: Option<String>,
    /// When these findings were evaluated.
    pub as_of: Timestamp,
}

/// A Smart Asset Registry Verifiable Credential: a `VerifiableCredential`
/// envelope carrying a `SmartAssetRegistrySubject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartAssetRegistryVc {
    /// The underlying generic VC envelope.
    #[serde(flatten)]
    pub vc: VerifiableCredential,
}

impl SmartAssetRegistryVc {
    /// Build an unsigned registry credential from a typed subject.
    pub fn new(issuer: impl Into<String>, subject: SmartAssetRegistrySubject) -> Result<Self, VcError> {
        let subject_value = serde_json::to_value(&subject).map_err(|e| {
            VcError::Canonicalization(msez_core::CanonicalizationError::SerializationFailed(e))
        })?;
        Ok(Self {
            vc: VerifiableCredential::new(REGISTRY_VC_TYPE, issuer, subject_value),
        })
    }

    /// Sign the underlying VC envelope.
    pub fn sign(
        mut self,
        keypair: &msez_crypto::Ed25519KeyPair,
        verification_method: impl Into<String>,
    ) -> Result<Self, VcError> {
        self.vc = self.vc.sign(keypair, verification_method)?;
        Ok(self)
    }

    /// Verify the underlying VC envelope's proof.
    pub fn verify(&self, public_key: &msez_crypto::Ed25519PublicKey) -> Result<(), VcError> {
        self.vc.verify(public_key)
    }

    /// Deserialize the typed subject back out of `credentialSubject`.
    pub fn subject(&self) -> Result<SmartAssetRegistrySubject, VcError> {
        serde_json::from_value(self.vc.credential_subject.clone()).map_err(|e| {
            VcError::Canonicalization(msez_core::CanonicalizationError::SerializationFailed(e))
        })
    }
}
