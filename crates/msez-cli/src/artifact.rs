//! # Artifact Subcommand
//!
//! Content-addressed storage operations: store, resolve, verify.

use std::path::PathBuf;

use clap::Args;
use msez_core::sha256_bytes;
use msez_crypto::CasStore;

/// Arguments for the artifact subcommand.
#[derive(Args, Debug)]
pub struct ArtifactArgs {
    /// Artifact operation to perform: store, resolve, verify.
    #[arg(long, default_value = "store")]
    pub operation: String,

    /// CAS store root. Defaults to `./dist/artifacts`.
    #[arg(long, default_value = "dist/artifacts")]
    pub store_root: PathBuf,

    /// Artifact type tag (e.g. `lawpack`, `licensepack`, `blob`).
    #[arg(long, default_value = "blob")]
    pub artifact_type: String,

    /// File to store, or whose digest to resolve/verify.
    pub file: PathBuf,
}

pub fn run(args: &ArtifactArgs) -> anyhow::Result<()> {
    let store = CasStore::new(args.store_root.clone());
    let bytes = std::fs::read(&args.file)?;
    let digest = sha256_bytes(&bytes);

    match args.operation.as_str() {
        "store" => {
            let suffix = args.file.extension().and_then(|e| e.to_str()).unwrap_or("bin");
            let path = store.store(&args.artifact_type, &digest, &bytes, suffix, false)?;
            println!("stored {} at {}", digest.to_hex(), path.display());
        }
        "resolve" => {
            let path = store.resolve(&args.artifact_type, &digest)?;
            println!("{}", path.display());
        }
        "verify" => {
            let path = store.resolve_strict(&args.artifact_type, &digest)?;
            println!("verified {} at {}", digest.to_hex(), path.display());
        }
        other => anyhow::bail!("unknown artifact operation: {other}"),
    }
    Ok(())
}
