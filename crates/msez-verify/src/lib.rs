//! # msez-verify — Artifact Graph Verifier
//!
//! Walks the closure of `ArtifactRef` pointers reachable from a root
//! artifact, reporting missing artifacts and digest mismatches, and can
//! package the closure into a self-contained witness bundle that a
//! verifier can check completely offline.
//!
//! ## Crate Policy
//!
//! - Depends on `msez-core` (for `ArtifactRef`/digests) and `msez-crypto`
//!   (for `CasStore`) only.
//! - BFS traversal with a `(type, digest)` seen-set; never revisits a node.
//!
//! ## Implements
//!
//! Spec §4.3 — Artifact Graph Verifier.

mod bundle;
mod report;

pub use bundle::{build_witness_bundle, load_witness_bundle, WitnessBundleError};
pub use report::{GraphEdge, GraphNode, MismatchRecord, VerifyReport};

use std::collections::{HashSet, VecDeque};

use msez_core::ArtifactRef;
use msez_crypto::CasStore;
use thiserror::Error;

/// Default maximum BFS depth (spec §4.3).
pub const DEFAULT_MAX_DEPTH: usize = 8;
/// Default maximum node count (spec §4.3).
pub const DEFAULT_MAX_NODES: usize = 1000;

/// Errors that can abort a verification run outright (as opposed to being
/// recorded as findings in the report).
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The traversal exceeded `max_nodes` before completing the closure.
    #[error("artifact graph exceeds node budget of {0}")]
    NodeBudgetExceeded(usize),
    /// CAS or filesystem error while reading a root artifact.
    #[error("cas error: {0}")]
    Cas(#[from] msez_crypto::CasError),
    /// The root artifact or a traversed member was not valid JSON.
    #[error("invalid json at {artifact_type}/{digest}: {source}")]
    InvalidJson {
        /// Artifact type of the offending node.
        artifact_type: String,
        /// Digest of the offending node.
        digest: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// IO error reading a root path.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options controlling a traversal.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Maximum BFS depth from the root.
    pub max_depth: usize,
    /// Maximum total node count.
    pub max_nodes: usize,
    /// Re-hash every traversed artifact and report mismatches.
    pub strict: bool,
    /// Suffix used to locate each artifact type's files in the CAS
    /// (`"json"` for all structured types in this implementation).
    pub suffix: String,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            strict: false,
            suffix: "json".to_string(),
        }
    }
}

/// Verify the closure reachable from a root `ArtifactRef`, resolving
/// member artifacts through `store`.
///
/// BFS with a `(type, digest)` seen-set (spec §4.3 algorithm sketch). On
/// each node: resolve via CAS, parse JSON, recompute the digest (in
/// strict mode), extract nested `ArtifactRef`s, enqueue unseen ones.
pub fn verify_closure(
    store: &CasStore,
    root: &ArtifactRef,
    options: &VerifyOptions,
) -> Result<VerifyReport, VerifyError> {
    let mut report = VerifyReport::new(root.clone());
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut queue: VecDeque<(ArtifactRef, usize)> = VecDeque::new();
    queue.push_back((root.clone(), 0));
    seen.insert(root.key());

    while let Some((node_ref, depth)) = queue.pop_front() {
        if report.nodes.len() >= options.max_nodes {
            return Err(VerifyError::NodeBudgetExceeded(options.max_nodes));
        }
        if depth > options.max_depth {
            report.nodes.push(GraphNode {
                artifact_type: node_ref.artifact_type.clone(),
                digest: node_ref.digest_sha256.clone(),
                depth,
                truncated: true,
            });
            continue;
        }

        let digest = match parse_hex_digest(&node_ref.digest_sha256) {
            Some(d) => d,
            None => {
                report.missing.push(node_ref.clone());
                continue;
            }
        };

        let path = match store.resolve(&node_ref.artifact_type, &digest) {
            Ok(p) => p,
            Err(msez_crypto::CasError::NotFound { .. }) => {
                report.missing.push(node_ref.clone());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = std::fs::read(&path)?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|source| VerifyError::InvalidJson {
                artifact_type: node_ref.artifact_type.clone(),
                digest: node_ref.digest_sha256.clone(),
                source,
            })?;

        if options.strict {
            let recomputed = msez_core::sha256_bytes(&bytes);
            if recomputed.to_hex() != node_ref.digest_sha256 {
                report.mismatches.push(MismatchRecord {
                    artifact_type: node_ref.artifact_type.clone(),
                    expected_digest: node_ref.digest_sha256.clone(),
                    computed_digest: recomputed.to_hex(),
                });
            }
        }

        report.nodes.push(GraphNode {
            artifact_type: node_ref.artifact_type.clone(),
            digest: node_ref.digest_sha256.clone(),
            depth,
            truncated: false,
        });

        for child in msez_core::extract_artifact_refs(&value) {
            report.edges.push(GraphEdge {
                from: node_ref.key(),
                to: child.key(),
            });
            if seen.insert(child.key()) {
                queue.push_back((child, depth + 1));
            }
        }
    }

    Ok(report)
}

fn parse_hex_digest(hex: &str) -> Option<msez_core::ContentDigest> {
    if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut bytes = [0u8; 32];
    for i in 0..32 {
        bytes[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(msez_core::ContentDigest::new(
        msez_core::DigestAlgorithm::Sha256,
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::sha256_bytes;
    use tempfile::TempDir;

    fn store_json(store: &CasStore, artifact_type: &str, value: &serde_json::Value) -> ArtifactRef {
        let bytes = serde_json::to_vec(value).unwrap();
        let digest = sha256_bytes(&bytes);
        store
            .store(artifact_type, &digest, &bytes, "json", false)
            .unwrap();
        ArtifactRef::new(artifact_type, &digest)
    }

    #[test]
    fn test_verify_closure_single_node() {
        let dir = TempDir::new().unwrap();
        let store = CasStore::with_roots(vec![dir.path().to_path_buf()]);
        let root = store_json(&store, "blob", &serde_json::json!({"hello": "world"}));

        let report = verify_closure(&store, &root, &VerifyOptions::default()).unwrap();
        assert_eq!(report.nodes.len(), 1);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_verify_closure_walks_nested_refs() {
        let dir = TempDir::new().unwrap();
        let store = CasStore::with_roots(vec![dir.path().to_path_buf()]);
        let leaf = store_json(&store, "schema", &serde_json::json!({"v": 1}));
        let root_value = serde_json::json!({
            "evidence": [{
                "artifact_type": leaf.artifact_type,
                "digest_sha256": leaf.digest_sha256,
            }]
        });
        let root = store_json(&store, "vc", &root_value);

        let report = verify_closure(&store, &root, &VerifyOptions::default()).unwrap();
        assert_eq!(report.nodes.len(), 2);
        assert_eq!(report.edges.len(), 1);
    }

    #[test]
    fn test_verify_closure_reports_missing() {
        let dir = TempDir::new().unwrap();
        let store = CasStore::with_roots(vec![dir.path().to_path_buf()]);
        let missing = ArtifactRef::new("vc", &sha256_bytes(b"never stored"));

        let report = verify_closure(&store, &missing, &VerifyOptions::default()).unwrap();
        assert_eq!(report.missing.len(), 1);
        assert!(report.nodes.is_empty());
    }

    #[test]
    fn test_verify_closure_strict_detects_tamper() {
        let dir = TempDir::new().unwrap();
        let store = CasStore::with_roots(vec![dir.path().to_path_buf()]);
        let root = store_json(&store, "blob", &serde_json::json!({"hello": "world"}));
        // Tamper with the on-disk bytes without updating the digest.
        let path = store.artifact_path("blob", &sha256_bytes(
            serde_json::to_vec(&serde_json::json!({"hello": "world"})).unwrap().as_slice()
        ), "json");
        std::fs::write(&path, b"{\"hello\":\"tampered\"}").unwrap();

        let opts = VerifyOptions {
            strict: true,
            ..Default::default()
        };
        let report = verify_closure(&store, &root, &opts).unwrap();
        assert_eq!(report.mismatches.len(), 1);
    }

    #[test]
    fn test_verify_closure_no_cycle_revisit() {
        let dir = TempDir::new().unwrap();
        let store = CasStore::with_roots(vec![dir.path().to_path_buf()]);
        let leaf = store_json(&store, "schema", &serde_json::json!({"v": 1}));
        let leaf_ref = serde_json::json!({
            "artifact_type": leaf.artifact_type,
            "digest_sha256": leaf.digest_sha256,
        });
        // Two different parents reference the same leaf; it must be
        // visited exactly once.
        let root_value = serde_json::json!({"a": leaf_ref.clone(), "b": leaf_ref});
        let root = store_json(&store, "vc", &root_value);

        let report = verify_closure(&store, &root, &VerifyOptions::default()).unwrap();
        assert_eq!(report.nodes.len(), 2);
        assert_eq!(report.edges.len(), 2);
    }
}
