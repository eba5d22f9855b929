//! # Pack Validation
//!
//! Structural and cross-pack integrity checks shared by all three pack
//! types: jurisdiction consistency, supersession chain validity, and
//! digest-set membership against a corridor's expected sets (spec's
//! `lawpack_digest_set ⊇ expected` / `ruleset_digest_set ⊇ expected`
//! receipt invariant).
//!
//! ## Implements
//!
//! Spec §10-15 — Pack validation and integrity rules.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::lawpack::Lawpack;
use crate::licensepack::Licensepack;
use crate::regpack::Regpack;

#[derive(Error, Debug)]
pub enum PackValidationError {
    #[error("jurisdiction mismatch: pack is for {pack_jurisdiction}, expected {expected}")]
    JurisdictionMismatch { pack_jurisdiction: String, expected: String },
    #[error("digest set does not cover expected digest {missing}")]
    MissingExpectedDigest { missing: String },
    #[error("lawpack {digest} claims to supersede a pack it does not chain to")]
    BrokenSupersessionChain { digest: String },
}

/// Validate that `lawpack` belongs to `jurisdiction_id` and, if it
/// claims to supersede a prior version, that the chain is intact.
pub fn validate_lawpack(
    lawpack: &Lawpack,
    jurisdiction_id: &str,
    previous: Option<&Lawpack>,
) -> Result<(), PackValidationError> {
    if lawpack.metadata.jurisdiction_id != jurisdiction_id {
        return Err(PackValidationError::JurisdictionMismatch {
            pack_jurisdiction: lawpack.metadata.jurisdiction_id.clone(),
            expected: jurisdiction_id.to_string(),
        });
    }
    if let (Some(prev), Some(_)) = (previous, &lawpack.metadata.supersedes_digest) {
        if !lawpack.supersedes(prev) {
            return Err(PackValidationError::BrokenSupersessionChain { digest: lawpack.compute_digest() });
        }
    }
    Ok(())
}

/// Validate that `regpack` belongs to `jurisdiction_id`.
pub fn validate_regpack(regpack: &Regpack, jurisdiction_id: &str) -> Result<(), PackValidationError> {
    if regpack.metadata.jurisdiction_id != jurisdiction_id {
        return Err(PackValidationError::JurisdictionMismatch {
            pack_jurisdiction: regpack.metadata.jurisdiction_id.clone(),
            expected: jurisdiction_id.to_string(),
        });
    }
    Ok(())
}

/// Validate that `licensepack` belongs to `jurisdiction_id`.
pub fn validate_licensepack(licensepack: &Licensepack, jurisdiction_id: &str) -> Result<(), PackValidationError> {
    if licensepack.jurisdiction_id() != jurisdiction_id {
        return Err(PackValidationError::JurisdictionMismatch {
            pack_jurisdiction: licensepack.jurisdiction_id().to_string(),
            expected: jurisdiction_id.to_string(),
        });
    }
    Ok(())
}

/// Check a corridor receipt's `lawpack_digest_set` (or `ruleset_digest_set`)
/// against the set of digests the corridor definition expects: spec's
/// invariant I-R4 requires the receipt's set to be a superset of the
/// expected set, never a subset.
pub fn validate_digest_set_covers_expected(
    receipt_digest_set: &BTreeSet<String>,
    expected_digest_set: &BTreeSet<String>,
) -> Result<(), PackValidationError> {
    for expected in expected_digest_set {
        if !receipt_digest_set.contains(expected) {
            return Err(PackValidationError::MissingExpectedDigest { missing: expected.clone() });
        }
    }
    Ok(())
}
