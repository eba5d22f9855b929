//! # msez-tensor — Compliance Tensor & Manifold
//!
//! Implements the mathematical framework for multi-domain compliance
//! evaluation:
//!
//! - **Tensor** (`tensor.rs`): the compliance tensor, a sparse 4-D map
//!   `(asset_id, jurisdiction_id, domain, time_quantum) → ComplianceCell`
//!   over a 6-value total-order lattice, with Merkle root/inclusion proof
//!   and `meet`/`join`.
//!
//! - **Manifold** (`manifold.rs`): a directed multigraph of jurisdictions
//!   connected by corridors; Dijkstra path planning weighted so missing
//!   attestations dominate monetary fees.
//!
//! - **Commitment** (`commitment.rs`): `TensorCommitment`, a VC-able
//!   wrapper around a tensor's Merkle root.
//!
//! - **Evaluation** (`evaluation.rs`): maps raw attestation facts to a
//!   `ComplianceState` per domain, iterating all 20
//!   `ComplianceDomain::all_domains()` so none is silently skipped.
//!
//! ## Mathematical Definition
//!
//! Let D = {d_1, d_2, ..., d_20} be the set of compliance domains (from
//! `msez_core::ComplianceDomain`). The compliance tensor is a mapping
//! T: A × J × D × Q → S, where A is asset IDs, J jurisdictions, Q time
//! quanta, and S the six-value lattice `{NON_COMPLIANT, UNKNOWN, EXPIRED,
//! PENDING, EXEMPT, COMPLIANT}`.
//!
//! ## Security Invariant
//!
//! Tensor commitments are computed exclusively from `CanonicalBytes` via
//! `msez-core::sha256_bytes()`. The canonicalization split defect
//! (audit §2.1) is prevented by the type system.
//!
//! ## Implements
//!
//! Spec §3 (data model), §4.6 Compliance Tensor, §4.7 Compliance Manifold.

pub mod commitment;
pub mod evaluation;
pub mod manifold;
pub mod tensor;

pub use commitment::TensorCommitment;
pub use evaluation::{evaluate_all_domains, evaluate_domain, DomainEvaluationInput};
pub use manifold::{
    AttestationGap, ComplianceManifold, CorridorEdge, FeeSchedule, NoPathError, Path, PathWeights,
};
pub use tensor::{ComplianceCell, ComplianceState, ComplianceTensor, MerkleInclusionProof, SliceSpec, TensorCoord};
