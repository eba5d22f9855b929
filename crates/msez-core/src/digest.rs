//! # Content Digest — Content-Addressed Identifiers
//!
//! Defines `ContentDigest` and `DigestAlgorithm` for the content-addressed
//! storage (CAS) system that underpins the entire SEZ Stack.
//!
//! ## Security Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes`, ensuring that
//! all digests in the system are produced through the correct canonicalization
//! pipeline. This is enforced by the function signature of `ContentDigest::from_canonical()`.
//!
//! ## Implements
//!
//! Spec §8 — Content addressing and CAS naming conventions.
//! Audit §2.2 — DigestAlgorithm enum for SHA256/Poseidon2 forward compatibility.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;

/// The hash algorithm used to produce a content digest.
///
/// Phase 1 uses SHA256 exclusively. Poseidon2 activates in Phase 2 with
/// the ZK proof system. All commitment structures carry an algorithm tag
/// for forward migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 — standard content addressing (Phase 1+).
    Sha256,
    /// Poseidon2 — ZK-friendly arithmetic-circuit-native hash (Phase 2).
    Poseidon2,
}

/// A content-addressed digest with its algorithm tag.
///
/// Produced exclusively from `CanonicalBytes` to ensure canonicalization
/// correctness. The 32-byte digest and algorithm tag together form a
/// self-describing content identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    ///
    /// Prefer `ContentDigest::sha256()` for constructing SHA256 digests
    /// from `CanonicalBytes`.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", match self.algorithm {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Poseidon2 => "poseidon2",
        }, self.to_hex())
    }
}

/// Compute the SHA-256 digest of canonical bytes.
///
/// The only entry point for digest computation on canonicalized data;
/// callers must produce `CanonicalBytes` first, which structurally
/// prevents hashing over non-canonical JSON.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute the lowercase hex SHA-256 digest of canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Compute the SHA-256 digest of raw bytes (not necessarily canonical).
///
/// Used for `blob`, `lawpack`, `regpack`, `licensepack`, `circuit`, and
/// `proof-key` artifacts, whose digest rule (spec §3) is `sha256(bytes)`
/// over an opaque byte container rather than a JCS-canonicalized object.
pub fn sha256_bytes(data: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute the "strict digest" of a signed/chained artifact: the SHA-256
/// of the JCS bytes of the object with a set of top-level keys removed.
///
/// Spec §3/§4.1: generic signed objects digest over `obj \ {"proof"}`;
/// corridor receipts digest over `obj \ {"proof", "next_root"}`. This is
/// the single implementation both call sites share — duplicating the key
/// exclusion logic per-artifact-type is the defect class this prevents.
///
/// # Errors
///
/// Returns `CanonicalizationError` if `obj` doesn't serialize to a JSON
/// object, contains a float, or fails JCS serialization.
pub fn strict_digest(
    obj: &impl Serialize,
    excluded_keys: &[&str],
) -> Result<ContentDigest, CanonicalizationError> {
    let mut value = serde_json::to_value(obj)?;
    if let serde_json::Value::Object(ref mut map) = value {
        for key in excluded_keys {
            map.remove(*key);
        }
    }
    let canonical = CanonicalBytes::new(&value)?;
    Ok(sha256_digest(&canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        // sha256("") well-known empty-string digest.
        let cb = CanonicalBytes::new(&"").unwrap();
        // CanonicalBytes wraps the JCS-encoded string `""`, i.e. bytes `""`
        // including quotes, so this just checks determinism, not the raw
        // empty-input vector.
        let hex = sha256_hex(&cb);
        assert_eq!(hex.len(), 64);
    }

    #[test]
    fn test_sha256_bytes_empty_matches_known_vector() {
        let digest = sha256_bytes(b"");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85"
        );
    }

    #[test]
    fn test_strict_digest_excludes_proof() {
        let with_proof = serde_json::json!({"a": 1, "proof": {"sig": "x"}});
        let without_proof = serde_json::json!({"a": 1});
        let d1 = strict_digest(&with_proof, &["proof"]).unwrap();
        let d2 = strict_digest(&without_proof, &["proof"]).unwrap();
        assert_eq!(d1.to_hex(), d2.to_hex());
    }

    #[test]
    fn test_strict_digest_excludes_next_root_and_proof() {
        let receipt = serde_json::json!({
            "sequence": 0,
            "next_root": "deadbeef",
            "proof": {"sig": "x"}
        });
        let bare = serde_json::json!({"sequence": 0});
        let d1 = strict_digest(&receipt, &["proof", "next_root"]).unwrap();
        let d2 = strict_digest(&bare, &["proof", "next_root"]).unwrap();
        assert_eq!(d1.to_hex(), d2.to_hex());
    }

    #[test]
    fn test_strict_digest_rejects_floats() {
        let obj = serde_json::json!({"amount": 1.5});
        assert!(strict_digest(&obj, &["proof"]).is_err());
    }
}
