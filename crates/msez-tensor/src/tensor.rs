//! # Compliance Tensor
//!
//! A sparse 4-dimensional mapping `(asset_id, jurisdiction_id, domain,
//! time_quantum) → ComplianceCell`. Cells form a pessimistic total-order
//! lattice: `NON_COMPLIANT < UNKNOWN < EXPIRED < PENDING < EXEMPT <
//! COMPLIANT`, with `meet` = worst-of and `join` = best-of.
//!
//! ## Security Invariant
//!
//! Uses `ComplianceDomain` from `msez-core` — the single source of truth
//! for all compliance domains. `UNKNOWN` sits just above the bottom so
//! that anything not yet evaluated is treated fail-safe at compliance
//! gates, same as an explicit `NON_COMPLIANT`.
//!
//! ## Implements
//!
//! Spec §3 (data model) and §4.6 — Compliance tensor.

use std::collections::BTreeMap;

use msez_core::{ArtifactRef, CanonicalizationError, ComplianceDomain, JurisdictionId, Timestamp};
use serde::{Deserialize, Serialize};

/// The compliance state of a single tensor cell.
///
/// Variant declaration order is the lattice order: `NonCompliant` is the
/// bottom, `Compliant` is the top. `meet` picks the lesser (worse)
/// variant, `join` the greater (better) one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceState {
    NonCompliant,
    Unknown,
    Expired,
    Pending,
    Exempt,
    Compliant,
}

impl ComplianceState {
    /// Worst-of: the lesser state in lattice order.
    pub fn meet(self, other: Self) -> Self {
        self.min(other)
    }

    /// Best-of: the greater state in lattice order.
    pub fn join(self, other: Self) -> Self {
        self.max(other)
    }
}

/// The coordinate identifying one tensor cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TensorCoord {
    pub asset_id: String,
    pub jurisdiction_id: JurisdictionId,
    pub domain: ComplianceDomain,
    pub time_quantum: String,
}

/// A slice filter: an axis set to `Some` is fixed, `None` is free.
#[derive(Debug, Clone, Default)]
pub struct SliceSpec {
    pub asset_id: Option<String>,
    pub jurisdiction_id: Option<JurisdictionId>,
    pub domain: Option<ComplianceDomain>,
    pub time_quantum: Option<String>,
}

impl SliceSpec {
    fn matches(&self, coord: &TensorCoord) -> bool {
        self.asset_id.as_ref().map_or(true, |a| a == &coord.asset_id)
            && self
                .jurisdiction_id
                .as_ref()
                .map_or(true, |j| j == &coord.jurisdiction_id)
            && self.domain.map_or(true, |d| d == coord.domain)
            && self
                .time_quantum
                .as_ref()
                .map_or(true, |t| t == &coord.time_quantum)
    }
}

/// One occupied cell of the compliance tensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCell {
    pub state: ComplianceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(default)]
    pub attestations: Vec<ArtifactRef>,
    pub last_update: Timestamp,
}

/// A compliance tensor: a sparse map from `TensorCoord` to `ComplianceCell`.
///
/// `BTreeMap` keeps occupied cells in a deterministic iteration order that
/// matches the lexicographic ordering `merkle_root` requires, so no
/// separate sort step is needed before hashing.
#[derive(Debug, Clone, Default)]
pub struct ComplianceTensor {
    cells: BTreeMap<TensorCoord, ComplianceCell>,
}

impl ComplianceTensor {
    /// Create an empty compliance tensor.
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Set (insert or overwrite) a cell.
    pub fn set(&mut self, coord: TensorCoord, cell: ComplianceCell) {
        self.cells.insert(coord, cell);
    }

    /// Get the cell at `coord`, if occupied.
    pub fn get(&self, coord: &TensorCoord) -> Option<&ComplianceCell> {
        self.cells.get(coord)
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Return a sub-tensor containing only cells matching `spec`'s fixed axes.
    pub fn slice(&self, spec: &SliceSpec) -> ComplianceTensor {
        ComplianceTensor {
            cells: self
                .cells
                .iter()
                .filter(|(coord, _)| spec.matches(coord))
                .map(|(coord, cell)| (coord.clone(), cell.clone()))
                .collect(),
        }
    }

    /// Cellwise meet (worst-of) with another tensor. A coordinate occupied
    /// in only one tensor is treated as `NON_COMPLIANT` in the other, so
    /// the result carries every coordinate occupied in either input.
    pub fn meet(&self, other: &ComplianceTensor) -> ComplianceTensor {
        self.combine(other, ComplianceState::meet, |_| ComplianceState::NonCompliant)
    }

    /// Cellwise join (best-of) with another tensor. A coordinate occupied
    /// in only one tensor contributes its own state directly — there is
    /// nothing in the other side to outrank it.
    pub fn join(&self, other: &ComplianceTensor) -> ComplianceTensor {
        self.combine(other, ComplianceState::join, |state| state)
    }

    /// `op` combines two occupied cells. `one_sided` derives the result
    /// state for a coordinate occupied in only one input from that
    /// input's own state — `meet` folds it against `NonCompliant` so a
    /// coordinate absent from one tensor can never look better than it
    /// would if that tensor explicitly marked it non-compliant; `join`
    /// passes it through unchanged since there is nothing on the other
    /// side to outrank it.
    fn combine(
        &self,
        other: &ComplianceTensor,
        op: impl Fn(ComplianceState, ComplianceState) -> ComplianceState,
        one_sided: impl Fn(ComplianceState) -> ComplianceState,
    ) -> ComplianceTensor {
        let mut result = BTreeMap::new();
        for coord in self.cells.keys().chain(other.cells.keys()) {
            if result.contains_key(coord) {
                continue;
            }
            let a = self.cells.get(coord);
            let b = other.cells.get(coord);
            let cell = match (a, b) {
                (Some(a), Some(b)) => ComplianceCell {
                    state: op(a.state, b.state),
                    reason_code: a.reason_code.clone().or_else(|| b.reason_code.clone()),
                    attestations: a
                        .attestations
                        .iter()
                        .cloned()
                        .chain(b.attestations.iter().cloned())
                        .collect(),
                    last_update: a.last_update.max(b.last_update),
                },
                (Some(a), None) => ComplianceCell {
                    state: one_sided(a.state),
                    ..a.clone()
                },
                (None, Some(b)) => ComplianceCell {
                    state: one_sided(b.state),
                    ..b.clone()
                },
                (None, None) => unreachable!("coord drawn from one of the two key sets"),
            };
            result.insert(coord.clone(), cell);
        }
        ComplianceTensor { cells: result }
    }

    /// Compute the Merkle root over the canonical enumeration of occupied
    /// cells: sorted by `TensorCoord` (already the map's iteration order),
    /// leaf = `sha256(JCS(cell))`, internal = `sha256(left || right)` with
    /// the last node duplicated at each level when the row is odd. Pure —
    /// does not mutate `self`.
    pub fn merkle_root(&self) -> Result<Option<msez_core::ContentDigest>, CanonicalizationError> {
        if self.cells.is_empty() {
            return Ok(None);
        }

        let mut level: Vec<[u8; 32]> = Vec::with_capacity(self.cells.len());
        for cell in self.cells.values() {
            let bytes = msez_core::CanonicalBytes::new(cell)?;
            level.push(msez_core::sha256_bytes(bytes.as_bytes()).bytes);
        }

        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = if pair.len() == 2 { pair[1] } else { pair[0] };
                let mut combined = Vec::with_capacity(64);
                combined.extend_from_slice(&left);
                combined.extend_from_slice(&right);
                next.push(msez_core::sha256_bytes(&combined).bytes);
            }
            level = next;
        }

        Ok(Some(msez_core::ContentDigest::new(
            msez_core::DigestAlgorithm::Sha256,
            level[0],
        )))
    }

    /// Build an inclusion proof for `coord`, or `None` if the cell isn't occupied.
    pub fn prove_inclusion(
        &self,
        coord: &TensorCoord,
    ) -> Result<Option<MerkleInclusionProof>, CanonicalizationError> {
        if !self.cells.contains_key(coord) {
            return Ok(None);
        }

        let leaves: Vec<[u8; 32]> = {
            let mut out = Vec::with_capacity(self.cells.len());
            for cell in self.cells.values() {
                let bytes = msez_core::CanonicalBytes::new(cell)?;
                out.push(msez_core::sha256_bytes(bytes.as_bytes()).bytes);
            }
            out
        };
        let mut index = self.cells.keys().position(|c| c == coord).expect("checked above");

        let mut level = leaves;
        let mut siblings = Vec::new();
        while level.len() > 1 {
            let sibling_index = if index % 2 == 0 { index + 1 } else { index - 1 };
            let sibling = if sibling_index < level.len() {
                level[sibling_index]
            } else {
                level[index]
            };
            siblings.push(sibling);

            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = if pair.len() == 2 { pair[1] } else { pair[0] };
                let mut combined = Vec::with_capacity(64);
                combined.extend_from_slice(&left);
                combined.extend_from_slice(&right);
                next.push(msez_core::sha256_bytes(&combined).bytes);
            }
            level = next;
            index /= 2;
        }

        Ok(Some(MerkleInclusionProof {
            leaf_index: self.cells.keys().position(|c| c == coord).expect("checked above"),
            siblings,
        }))
    }
}

/// An inclusion proof for one leaf of a `ComplianceTensor::merkle_root`.
#[derive(Debug, Clone)]
pub struct MerkleInclusionProof {
    pub leaf_index: usize,
    pub siblings: Vec<[u8; 32]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::ComplianceDomain;

    fn coord(asset: &str, jur: &str, domain: ComplianceDomain, tq: &str) -> TensorCoord {
        TensorCoord {
            asset_id: asset.to_string(),
            jurisdiction_id: JurisdictionId::new(jur),
            domain,
            time_quantum: tq.to_string(),
        }
    }

    fn cell(state: ComplianceState) -> ComplianceCell {
        ComplianceCell {
            state,
            reason_code: None,
            attestations: Vec::new(),
            last_update: Timestamp::now(),
        }
    }

    #[test]
    fn test_lattice_ordering() {
        assert!(ComplianceState::NonCompliant < ComplianceState::Unknown);
        assert!(ComplianceState::Unknown < ComplianceState::Expired);
        assert!(ComplianceState::Expired < ComplianceState::Pending);
        assert!(ComplianceState::Pending < ComplianceState::Exempt);
        assert!(ComplianceState::Exempt < ComplianceState::Compliant);
    }

    #[test]
    fn test_meet_and_join() {
        let a = ComplianceState::Compliant;
        let b = ComplianceState::NonCompliant;
        assert_eq!(a.meet(b), ComplianceState::NonCompliant);
        assert_eq!(a.join(b), ComplianceState::Compliant);
    }

    #[test]
    fn test_meet_leq_both_leq_join() {
        let a = ComplianceState::Pending;
        let b = ComplianceState::Exempt;
        let meet = a.meet(b);
        let join = a.join(b);
        assert!(meet <= a && meet <= b);
        assert!(a <= join && b <= join);
    }

    #[test]
    fn test_tensor_meet_one_sided_cell_is_non_compliant() {
        let c = coord("asset-1", "PK-PSEZ", ComplianceDomain::Kyc, "2026-Q1");
        let mut a = ComplianceTensor::new();
        a.set(c.clone(), cell(ComplianceState::Compliant));
        let b = ComplianceTensor::new();

        let met = a.meet(&b);
        assert_eq!(met.get(&c).unwrap().state, ComplianceState::NonCompliant);
    }

    #[test]
    fn test_tensor_join_one_sided_cell_passes_through() {
        let c = coord("asset-1", "PK-PSEZ", ComplianceDomain::Kyc, "2026-Q1");
        let mut a = ComplianceTensor::new();
        a.set(c.clone(), cell(ComplianceState::Compliant));
        let b = ComplianceTensor::new();

        let joined = a.join(&b);
        assert_eq!(joined.get(&c).unwrap().state, ComplianceState::Compliant);
    }

    #[test]
    fn test_merkle_root_pure_and_deterministic() {
        let mut tensor = ComplianceTensor::new();
        tensor.set(
            coord("asset-1", "PK-PSEZ", ComplianceDomain::Kyc, "2026-Q1"),
            cell(ComplianceState::Compliant),
        );
        tensor.set(
            coord("asset-1", "PK-PSEZ", ComplianceDomain::Aml, "2026-Q1"),
            cell(ComplianceState::Pending),
        );
        let before = tensor.cell_count();
        let root1 = tensor.merkle_root().unwrap().unwrap();
        let root2 = tensor.merkle_root().unwrap().unwrap();
        assert_eq!(tensor.cell_count(), before);
        assert_eq!(root1.to_hex(), root2.to_hex());
    }

    #[test]
    fn test_empty_tensor_has_no_root() {
        let tensor = ComplianceTensor::new();
        assert!(tensor.merkle_root().unwrap().is_none());
    }

    #[test]
    fn test_slice_filters_by_fixed_axes() {
        let mut tensor = ComplianceTensor::new();
        tensor.set(
            coord("asset-1", "PK-PSEZ", ComplianceDomain::Kyc, "2026-Q1"),
            cell(ComplianceState::Compliant),
        );
        tensor.set(
            coord("asset-2", "AE-DIFC", ComplianceDomain::Kyc, "2026-Q1"),
            cell(ComplianceState::Pending),
        );
        let spec = SliceSpec {
            jurisdiction_id: Some(JurisdictionId::new("PK-PSEZ")),
            ..Default::default()
        };
        let sliced = tensor.slice(&spec);
        assert_eq!(sliced.cell_count(), 1);
    }

    #[test]
    fn test_unoccupied_coord_is_none() {
        let tensor = ComplianceTensor::new();
        let c = coord("asset-1", "PK-PSEZ", ComplianceDomain::Kyc, "2026-Q1");
        assert!(tensor.get(&c).is_none());
    }

    #[test]
    fn test_prove_inclusion_roundtrip_shape() {
        let mut tensor = ComplianceTensor::new();
        let c1 = coord("asset-1", "PK-PSEZ", ComplianceDomain::Kyc, "2026-Q1");
        let c2 = coord("asset-1", "PK-PSEZ", ComplianceDomain::Aml, "2026-Q1");
        let c3 = coord("asset-1", "PK-PSEZ", ComplianceDomain::Tax, "2026-Q1");
        tensor.set(c1.clone(), cell(ComplianceState::Compliant));
        tensor.set(c2, cell(ComplianceState::Pending));
        tensor.set(c3, cell(ComplianceState::Exempt));

        let proof = tensor.prove_inclusion(&c1).unwrap().unwrap();
        assert_eq!(proof.leaf_index, 0);
        assert!(!proof.siblings.is_empty());
    }
}
