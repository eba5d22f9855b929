//! # Content-Addressed Storage (CAS)
//!
//! Provides store, resolve, and candidate-enumeration operations for the
//! content-addressed artifact store. Artifacts are named by their content
//! digest: `{root}/{type}/{digest}.{suffix}`. Digest is the truth; `suffix`
//! and `uri` are advisory.
//!
//! ## Security Invariant
//!
//! All stored artifacts are verified at retrieval time — the digest
//! of the retrieved content is recomputed and compared against the
//! requested digest. A mismatch on read is a warning, not fatal (unless
//! `resolve_strict` is used); a mismatch on write is always fatal.
//!
//! ## Implements
//!
//! Spec §4.2 — CAS store layout, operations, and failure model.

use std::fs;
use std::path::{Path, PathBuf};

use msez_core::ContentDigest;
use thiserror::Error;

/// Environment variable holding an OS-path-separated list of additional
/// store roots, prepended to the default root (spec §6).
pub const STORE_DIRS_VAR: &str = "MSEZ_ARTIFACT_STORE_DIRS";

/// Errors produced by CAS operations.
#[derive(Error, Debug)]
pub enum CasError {
    /// No artifact matching `(type, digest)` was found in any store root.
    #[error("artifact not found: {artifact_type}/{digest}")]
    NotFound {
        /// The artifact type tag.
        artifact_type: String,
        /// The requested digest, hex-encoded.
        digest: String,
    },

    /// Multiple candidates exist for `(type, digest)` that do not resolve
    /// to the same canonical path across store roots.
    #[error("ambiguous artifact: {artifact_type}/{digest} has {count} divergent candidates")]
    AmbiguousArtifact {
        /// The artifact type tag.
        artifact_type: String,
        /// The requested digest, hex-encoded.
        digest: String,
        /// Number of divergent candidate paths found.
        count: usize,
    },

    /// Writing content under `(type, digest)` found existing content with
    /// a different hash already stored there.
    #[error("hash collision writing {artifact_type}/{digest}: existing content does not match")]
    HashCollision {
        /// The artifact type tag.
        artifact_type: String,
        /// The digest under which the collision was detected, hex-encoded.
        digest: String,
    },

    /// IO error reading or writing the store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One candidate location for an artifact, with the digest recomputed
/// from the bytes actually found on disk.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Filesystem path of the candidate.
    pub path: PathBuf,
    /// Digest recomputed from the candidate's bytes.
    pub recomputed_digest: ContentDigest,
}

/// A content-addressed artifact store backed by the filesystem, searching
/// across one or more store roots.
#[derive(Debug, Clone)]
pub struct CasStore {
    /// Root directories searched in order, first match wins for reads.
    /// Writes always target `roots[0]`.
    roots: Vec<PathBuf>,
}

impl CasStore {
    /// Create a CAS store rooted at the given directory, additionally
    /// prepending any roots found in `MSEZ_ARTIFACT_STORE_DIRS`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut roots = Vec::new();
        if let Ok(extra) = std::env::var(STORE_DIRS_VAR) {
            for dir in std::env::split_paths(&extra) {
                roots.push(dir);
            }
        }
        roots.push(root.into());
        Self { roots }
    }

    /// Create a CAS store with an explicit, fully-specified list of roots
    /// (no environment-variable lookup). Used by tests that must not be
    /// sensitive to the ambient environment.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Returns the primary (write-target) root directory of this store.
    pub fn root(&self) -> &Path {
        &self.roots[0]
    }

    /// Returns all configured store roots, in search order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Compute the filesystem path for an artifact by type, digest, and
    /// suffix (e.g. `"corridor-receipt.json"`), rooted at the primary root.
    pub fn artifact_path(&self, artifact_type: &str, digest: &ContentDigest, suffix: &str) -> PathBuf {
        self.roots[0]
            .join(artifact_type)
            .join(format!("{}.{}", digest.to_hex(), suffix))
    }

    /// Store `bytes` under `(artifact_type, digest)`.
    ///
    /// If a file already exists at the target path with content hashing
    /// to `digest`, this is a no-op and returns the existing path
    /// (idempotent). If it exists with different content, returns
    /// `HashCollision`. If `overwrite` is true, an existing file whose
    /// content does NOT match is replaced instead of erroring — callers
    /// should prefer leaving this false; it exists for recovery tooling.
    pub fn store(
        &self,
        artifact_type: &str,
        digest: &ContentDigest,
        bytes: &[u8],
        suffix: &str,
        overwrite: bool,
    ) -> Result<PathBuf, CasError> {
        let path = self.artifact_path(artifact_type, digest, suffix);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            let existing = fs::read(&path)?;
            let existing_digest = msez_core::sha256_bytes(&existing);
            if existing_digest.bytes == digest.bytes {
                return Ok(path);
            }
            if !overwrite {
                return Err(CasError::HashCollision {
                    artifact_type: artifact_type.to_string(),
                    digest: digest.to_hex(),
                });
            }
        }
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Enumerate every candidate file across all store roots matching
    /// `(artifact_type, digest)` under any suffix.
    pub fn candidates(&self, artifact_type: &str, digest: &ContentDigest) -> Vec<Candidate> {
        let prefix = digest.to_hex();
        let mut found = Vec::new();
        for root in &self.roots {
            let dir = root.join(artifact_type);
            let entries = match fs::read_dir(&dir) {
                Ok(e) => e,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if !name.starts_with(&prefix) {
                    continue;
                }
                let Ok(bytes) = fs::read(&path) else {
                    continue;
                };
                let recomputed_digest = msez_core::sha256_bytes(&bytes);
                found.push(Candidate {
                    path,
                    recomputed_digest,
                });
            }
        }
        found
    }

    /// Resolve `(artifact_type, digest)` to a single filesystem path,
    /// searching roots in order.
    ///
    /// If multiple candidates exist across roots but all resolve to the
    /// same canonical path (e.g. a symlinked or duplicated store), the
    /// first is returned. If candidates diverge (different real paths for
    /// the same nominal digest), returns `AmbiguousArtifact`. On success,
    /// the hash is recomputed from the winning candidate; a mismatch is
    /// logged as a warning via `tracing`, not treated as fatal — callers
    /// wanting fatal-on-mismatch should use `resolve_strict`.
    pub fn resolve(&self, artifact_type: &str, digest: &ContentDigest) -> Result<PathBuf, CasError> {
        let candidates = self.candidates(artifact_type, digest);
        self.pick(artifact_type, digest, candidates, false)
    }

    /// Like `resolve`, but a digest mismatch on the winning candidate is
    /// a fatal `HashCollision` rather than a warning.
    pub fn resolve_strict(
        &self,
        artifact_type: &str,
        digest: &ContentDigest,
    ) -> Result<PathBuf, CasError> {
        let candidates = self.candidates(artifact_type, digest);
        self.pick(artifact_type, digest, candidates, true)
    }

    fn pick(
        &self,
        artifact_type: &str,
        digest: &ContentDigest,
        candidates: Vec<Candidate>,
        fatal_on_mismatch: bool,
    ) -> Result<PathBuf, CasError> {
        if candidates.is_empty() {
            return Err(CasError::NotFound {
                artifact_type: artifact_type.to_string(),
                digest: digest.to_hex(),
            });
        }
        let canonical_paths: std::collections::BTreeSet<PathBuf> = candidates
            .iter()
            .filter_map(|c| fs::canonicalize(&c.path).ok())
            .collect();
        if canonical_paths.len() > 1 {
            return Err(CasError::AmbiguousArtifact {
                artifact_type: artifact_type.to_string(),
                digest: digest.to_hex(),
                count: canonical_paths.len(),
            });
        }
        let winner = &candidates[0];
        if winner.recomputed_digest.bytes != digest.bytes {
            if fatal_on_mismatch {
                return Err(CasError::HashCollision {
                    artifact_type: artifact_type.to_string(),
                    digest: digest.to_hex(),
                });
            }
            tracing::warn!(
                artifact_type,
                requested = %digest,
                recomputed = %winner.recomputed_digest,
                path = %winner.path.display(),
                "CAS resolve: digest mismatch on read"
            );
        }
        Ok(winner.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::{sha256_bytes, DigestAlgorithm};
    use tempfile::TempDir;

    fn tmp_store() -> (TempDir, CasStore) {
        let dir = TempDir::new().unwrap();
        let store = CasStore::with_roots(vec![dir.path().to_path_buf()]);
        (dir, store)
    }

    #[test]
    fn test_store_and_resolve_roundtrip() {
        let (_dir, store) = tmp_store();
        let bytes = b"hello world";
        let digest = sha256_bytes(bytes);
        let path = store.store("blob", &digest, bytes, "bin", false).unwrap();
        let resolved = store.resolve("blob", &digest).unwrap();
        assert_eq!(path, resolved);
        assert_eq!(fs::read(resolved).unwrap(), bytes);
    }

    #[test]
    fn test_store_idempotent_same_content() {
        let (_dir, store) = tmp_store();
        let bytes = b"same content";
        let digest = sha256_bytes(bytes);
        let p1 = store.store("blob", &digest, bytes, "bin", false).unwrap();
        let p2 = store.store("blob", &digest, bytes, "bin", false).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_store_rejects_hash_collision() {
        let (_dir, store) = tmp_store();
        let bytes_a = b"content a";
        let digest_a = sha256_bytes(bytes_a);
        store.store("blob", &digest_a, bytes_a, "bin", false).unwrap();
        // Force a collision by writing different bytes under the same digest.
        let different_digest = ContentDigest::new(DigestAlgorithm::Sha256, digest_a.bytes);
        let result = store.store("blob", &different_digest, b"content b - different", "bin", false);
        assert!(matches!(result, Err(CasError::HashCollision { .. })));
    }

    #[test]
    fn test_resolve_not_found() {
        let (_dir, store) = tmp_store();
        let digest = sha256_bytes(b"never stored");
        let result = store.resolve("blob", &digest);
        assert!(matches!(result, Err(CasError::NotFound { .. })));
    }

    #[test]
    fn test_candidates_enumerates_across_roots() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let bytes = b"shared content";
        let digest = sha256_bytes(bytes);
        let store_a = CasStore::with_roots(vec![dir_a.path().to_path_buf()]);
        store_a.store("blob", &digest, bytes, "bin", false).unwrap();
        let store_b = CasStore::with_roots(vec![dir_b.path().to_path_buf()]);
        store_b.store("blob", &digest, bytes, "bin", false).unwrap();

        let multi_root = CasStore::with_roots(vec![
            dir_a.path().to_path_buf(),
            dir_b.path().to_path_buf(),
        ]);
        let candidates = multi_root.candidates("blob", &digest);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_env_store_dirs_prepended() {
        let dir = TempDir::new().unwrap();
        std::env::set_var(STORE_DIRS_VAR, dir.path());
        let store = CasStore::new(std::env::temp_dir().join("msez-cas-default-root"));
        std::env::remove_var(STORE_DIRS_VAR);
        assert_eq!(store.roots()[0], dir.path());
    }
}
