//! # Artifact Reference — The Universal Typed Pointer
//!
//! Defines `ArtifactRef`, the structure that appears anywhere one artifact
//! points at another: receipt payloads, tensor attestations, VC evidence
//! lists, bridge receipts. The `uri` field is advisory; the digest is
//! authoritative.
//!
//! ## Implements
//!
//! Spec §3 — `ArtifactRef` data model.

use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;

/// A short lowercase tag identifying an artifact's kind, matching
/// `^[a-z0-9][a-z0-9-]{0,63}$` (spec §3).
pub fn is_valid_artifact_type(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return false;
    }
    if s.len() > 64 {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// The universal typed pointer to a content-addressed artifact.
///
/// `uri` is a hint for where to find the bytes (e.g. a relative path in a
/// witness bundle); it is never consulted for integrity — only
/// `digest_sha256` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// The artifact's type tag.
    pub artifact_type: String,
    /// Lowercase hex SHA-256 digest of the referenced artifact.
    pub digest_sha256: String,
    /// Advisory location hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Advisory human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Advisory MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Advisory byte length of the referenced artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<u64>,
}

impl ArtifactRef {
    /// Construct a minimal reference from a type tag and digest.
    pub fn new(artifact_type: impl Into<String>, digest: &ContentDigest) -> Self {
        Self {
            artifact_type: artifact_type.into(),
            digest_sha256: digest.to_hex(),
            uri: None,
            display_name: None,
            media_type: None,
            byte_length: None,
        }
    }

    /// The `(artifact_type, digest_sha256)` key used for CAS addressing
    /// and BFS seen-sets during closure traversal.
    pub fn key(&self) -> (String, String) {
        (self.artifact_type.clone(), self.digest_sha256.clone())
    }
}

/// Scan a parsed JSON value for every nested object carrying both
/// `artifact_type` and `digest_sha256` keys — these are typed references
/// per spec §4.3's traversal rule. Returns them in a stable, depth-first
/// left-to-right order matching JSON source order.
pub fn extract_artifact_refs(value: &serde_json::Value) -> Vec<ArtifactRef> {
    let mut refs = Vec::new();
    walk(value, &mut refs);
    refs
}

fn walk(value: &serde_json::Value, out: &mut Vec<ArtifactRef>) {
    match value {
        serde_json::Value::Object(map) => {
            if let (Some(serde_json::Value::String(artifact_type)), Some(serde_json::Value::String(digest))) =
                (map.get("artifact_type"), map.get("digest_sha256"))
            {
                out.push(ArtifactRef {
                    artifact_type: artifact_type.clone(),
                    digest_sha256: digest.clone(),
                    uri: map.get("uri").and_then(|v| v.as_str()).map(String::from),
                    display_name: map
                        .get("display_name")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    media_type: map.get("media_type").and_then(|v| v.as_str()).map(String::from),
                    byte_length: map.get("byte_length").and_then(|v| v.as_u64()),
                });
            }
            for v in map.values() {
                walk(v, out);
            }
        }
        serde_json::Value::Array(arr) => {
            for v in arr {
                walk(v, out);
            }
        }
        _ => {}
    }
}
