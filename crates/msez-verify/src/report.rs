//! Verification report types: the graph a traversal actually walked,
//! plus any findings (missing artifacts, digest mismatches).

use msez_core::ArtifactRef;
use serde::{Deserialize, Serialize};

/// One node visited during a closure traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// The node's artifact type.
    pub artifact_type: String,
    /// The node's digest, hex-encoded.
    pub digest: String,
    /// BFS depth from the root (root is depth 0).
    pub depth: usize,
    /// True if this node was recorded at the depth limit and not expanded.
    pub truncated: bool,
}

/// One edge discovered between a parent node and a referenced child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `(artifact_type, digest)` of the referencing node.
    pub from: (String, String),
    /// `(artifact_type, digest)` of the referenced node.
    pub to: (String, String),
}

/// A digest mismatch found in strict mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MismatchRecord {
    /// Artifact type of the mismatching node.
    pub artifact_type: String,
    /// The digest the referencing artifact expected.
    pub expected_digest: String,
    /// The digest actually recomputed from the bytes on disk.
    pub computed_digest: String,
}

/// The full result of a closure traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// The root artifact the traversal started from.
    pub root: ArtifactRef,
    /// All nodes successfully visited.
    pub nodes: Vec<GraphNode>,
    /// All edges discovered between visited nodes.
    pub edges: Vec<GraphEdge>,
    /// Referenced artifacts that could not be resolved in the CAS.
    pub missing: Vec<ArtifactRef>,
    /// Digest mismatches found in strict mode.
    pub mismatches: Vec<MismatchRecord>,
}

impl VerifyReport {
    /// Start a new, empty report for the given root.
    pub fn new(root: ArtifactRef) -> Self {
        Self {
            root,
            nodes: Vec::new(),
            edges: Vec::new(),
            missing: Vec::new(),
            mismatches: Vec::new(),
        }
    }

    /// True if the closure is complete and internally consistent: no
    /// missing artifacts and no digest mismatches.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_clean_true_for_empty_findings() {
        let root = ArtifactRef::new("blob", &msez_core::sha256_bytes(b"x"));
        let report = VerifyReport::new(root);
        assert!(report.is_clean());
    }

    #[test]
    fn test_is_clean_false_with_missing() {
        let root = ArtifactRef::new("blob", &msez_core::sha256_bytes(b"x"));
        let mut report = VerifyReport::new(root.clone());
        report.missing.push(root);
        assert!(!report.is_clean());
    }
}
