//! # Tensor Commitment
//!
//! Content-addressed commitment generation for compliance tensor states.
//! All commitments flow through `CanonicalBytes` → SHA-256.
//!
//! ## Security Invariant
//!
//! Commitments are computed via `msez_core::sha256_bytes()` from
//! `CanonicalBytes`, not from raw `serde_json::to_vec()`.
//!
//! ## Implements
//!
//! Spec §4.6 — Tensor commitment as a VC-able object.

use msez_core::{CanonicalizationError, ContentDigest, Timestamp};
use serde::{Deserialize, Serialize};

use crate::tensor::{ComplianceTensor, SliceSpec};

/// A content-addressed commitment to a compliance tensor state.
///
/// Meant to be carried as the `credentialSubject` of a VC (e.g. via
/// `msez_vc::SmartAssetRegistryVc`'s `tensor_commitment_digest`), not a VC
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorCommitment {
    /// The tensor's Merkle root, or `None` for an empty tensor.
    pub root: Option<ContentDigest>,
    /// Number of occupied cells the root was computed over.
    pub cell_count: usize,
    /// When the commitment was produced.
    pub as_of: Timestamp,
    /// A description of the slice committed, if this is a sub-tensor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_spec: Option<String>,
}

impl TensorCommitment {
    /// Commit to the full tensor.
    pub fn commit(tensor: &ComplianceTensor, as_of: Timestamp) -> Result<Self, CanonicalizationError> {
        Ok(Self {
            root: tensor.merkle_root()?,
            cell_count: tensor.cell_count(),
            as_of,
            slice_spec: None,
        })
    }

    /// Commit to a slice of the tensor, tagging the commitment with a
    /// human-readable description of which axes were fixed.
    pub fn commit_slice(
        tensor: &ComplianceTensor,
        spec: &SliceSpec,
        description: impl Into<String>,
        as_of: Timestamp,
    ) -> Result<Self, CanonicalizationError> {
        let sliced = tensor.slice(spec);
        Ok(Self {
            root: sliced.merkle_root()?,
            cell_count: sliced.cell_count(),
            as_of,
            slice_spec: Some(description.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{ComplianceCell, ComplianceState, TensorCoord};
    use msez_core::{ComplianceDomain, JurisdictionId};

    #[test]
    fn test_commit_empty_tensor_has_no_root() {
        let tensor = ComplianceTensor::new();
        let commitment = TensorCommitment::commit(&tensor, Timestamp::now()).unwrap();
        assert!(commitment.root.is_none());
        assert_eq!(commitment.cell_count, 0);
    }

    #[test]
    fn test_commit_nonempty_tensor_has_root() {
        let mut tensor = ComplianceTensor::new();
        tensor.set(
            TensorCoord {
                asset_id: "asset-1".to_string(),
                jurisdiction_id: JurisdictionId::new("PK-PSEZ"),
                domain: ComplianceDomain::Kyc,
                time_quantum: "2026-Q1".to_string(),
            },
            ComplianceCell {
                state: ComplianceState::Compliant,
                reason_code: None,
                attestations: Vec::new(),
                last_update: Timestamp::now(),
            },
        );
        let commitment = TensorCommitment::commit(&tensor, Timestamp::now()).unwrap();
        assert!(commitment.root.is_some());
        assert_eq!(commitment.cell_count, 1);
    }
}
