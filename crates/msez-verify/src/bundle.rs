//! Witness bundles: a self-contained zip archive holding every artifact
//! in a verified closure, so an auditor can check the whole graph
//! offline without access to the original CAS roots.
//!
//! Layout:
//!
//! ```text
//! manifest.json                     -- canonical JSON: the VerifyReport
//! README.txt                        -- human-readable summary
//! artifacts/<type>/<digest>.<suffix> -- each artifact's raw bytes
//! ```

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use msez_core::CanonicalBytes;
use thiserror::Error;
use zip::write::SimpleFileOptions;

use crate::report::VerifyReport;
use crate::VerifyOptions;

/// Errors building or loading a witness bundle.
#[derive(Error, Debug)]
pub enum WitnessBundleError {
    /// IO error reading or writing the archive.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Error reading or writing the zip container itself.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// The manifest could not be serialized or parsed.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
    /// JCS canonicalization of the manifest failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] msez_core::CanonicalizationError),
    /// The bundle is missing its manifest entry.
    #[error("witness bundle is missing manifest.json")]
    MissingManifest,
    /// An artifact listed in the manifest was absent from the archive.
    #[error("witness bundle is missing artifact bytes for {artifact_type}/{digest}")]
    MissingArtifact {
        /// Artifact type of the missing entry.
        artifact_type: String,
        /// Digest of the missing entry.
        digest: String,
    },
    /// An artifact's bytes in the archive do not hash to its manifest digest.
    #[error("witness bundle tamper detected: {artifact_type}/{digest} does not match its bytes")]
    TamperDetected {
        /// Artifact type of the mismatching entry.
        artifact_type: String,
        /// Digest as recorded in the manifest.
        digest: String,
    },
}

/// Build a witness bundle zip at `out_path` from an already-computed
/// `VerifyReport`, reading each visited node's bytes from `store`.
pub fn build_witness_bundle(
    store: &msez_crypto::CasStore,
    report: &VerifyReport,
    options: &VerifyOptions,
    out_path: &Path,
) -> Result<(), WitnessBundleError> {
    let file = std::fs::File::create(out_path)?;
    let mut zip = zip::ZipWriter::new(file);
    let file_options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let manifest_value = serde_json::to_value(report)?;
    let manifest_canonical = CanonicalBytes::new(&manifest_value)?;
    zip.start_file("manifest.json", file_options)?;
    zip.write_all(manifest_canonical.as_bytes())?;

    zip.start_file("README.txt", file_options)?;
    zip.write_all(readme_text(report).as_bytes())?;

    for node in &report.nodes {
        let digest = parse_digest(&node.digest).ok_or_else(|| {
            WitnessBundleError::MissingArtifact {
                artifact_type: node.artifact_type.clone(),
                digest: node.digest.clone(),
            }
        })?;
        let path = store
            .resolve(&node.artifact_type, &digest)
            .map_err(|_| WitnessBundleError::MissingArtifact {
                artifact_type: node.artifact_type.clone(),
                digest: node.digest.clone(),
            })?;
        let bytes = std::fs::read(&path)?;
        let entry_name = format!(
            "artifacts/{}/{}.{}",
            node.artifact_type, node.digest, options.suffix
        );
        zip.start_file(entry_name, file_options)?;
        zip.write_all(&bytes)?;
    }

    zip.finish()?;
    Ok(())
}

/// Load and offline-verify a witness bundle: re-derive every artifact's
/// digest from the bytes actually present in the archive and compare
/// against the manifest. Returns the embedded `VerifyReport` on success.
pub fn load_witness_bundle(path: &Path) -> Result<VerifyReport, WitnessBundleError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let manifest_bytes = read_entry(&mut archive, "manifest.json")?
        .ok_or(WitnessBundleError::MissingManifest)?;
    let report: VerifyReport = serde_json::from_slice(&manifest_bytes)?;

    let mut artifact_bytes: HashMap<(String, String), Vec<u8>> = HashMap::new();
    for node in &report.nodes {
        let entry_name = format!("artifacts/{}/", node.artifact_type);
        let names: Vec<String> = archive
            .file_names()
            .filter(|n| n.starts_with(&entry_name) && n.contains(&node.digest))
            .map(String::from)
            .collect();
        let Some(name) = names.into_iter().next() else {
            return Err(WitnessBundleError::MissingArtifact {
                artifact_type: node.artifact_type.clone(),
                digest: node.digest.clone(),
            });
        };
        let bytes = read_entry(&mut archive, &name)?.ok_or_else(|| {
            WitnessBundleError::MissingArtifact {
                artifact_type: node.artifact_type.clone(),
                digest: node.digest.clone(),
            }
        })?;
        let recomputed = msez_core::sha256_bytes(&bytes);
        if recomputed.to_hex() != node.digest {
            return Err(WitnessBundleError::TamperDetected {
                artifact_type: node.artifact_type.clone(),
                digest: node.digest.clone(),
            });
        }
        artifact_bytes.insert((node.artifact_type.clone(), node.digest.clone()), bytes);
    }

    Ok(report)
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, WitnessBundleError> {
    let mut entry = match archive.by_name(name) {
        Ok(e) => e,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(Some(buf))
}

fn parse_digest(hex: &str) -> Option<msez_core::ContentDigest> {
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

fn readme_text(report: &VerifyReport) -> String {
    format!(
        "Witness bundle for {}/{}\n\nNodes: {}\nEdges: {}\nMissing: {}\nMismatches: {}\n\
         \nThis archive is self-contained. Verify offline with msez-verify's\n\
         load_witness_bundle, which re-derives every artifact's digest from\n\
         the bytes in this file and compares it against manifest.json.\n",
        report.root.artifact_type,
        report.root.digest_sha256,
        report.nodes.len(),
        report.edges.len(),
        report.missing.len(),
        report.mismatches.len(),
    )
}
