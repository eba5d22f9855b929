//! # Sign Subcommand
//!
//! Ed25519 key generation, document signing, and signature verification.

use std::path::PathBuf;

use clap::Args;
use msez_core::CanonicalBytes;
use msez_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Arguments for the sign subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Signing operation to perform: keygen, sign, verify.
    #[arg(long, default_value = "keygen")]
    pub operation: String,

    /// JSON document to sign or verify.
    pub document: Option<PathBuf>,

    /// Hex-encoded signature (required for `verify`).
    #[arg(long)]
    pub signature: Option<String>,

    /// Hex-encoded public key (required for `verify`).
    #[arg(long)]
    pub public_key: Option<String>,
}

pub fn run(args: &SignArgs) -> anyhow::Result<()> {
    match args.operation.as_str() {
        "keygen" => {
            let keypair = Ed25519KeyPair::generate();
            println!("public_key: {}", keypair.public_key().to_hex());
        }
        "sign" => {
            let document = args.document.as_ref().ok_or_else(|| anyhow::anyhow!("sign requires a document path"))?;
            let value = load_json(document)?;
            let canonical = CanonicalBytes::new(&value)?;
            let keypair = Ed25519KeyPair::generate();
            let signature = keypair.sign(&canonical);
            println!("public_key: {}", keypair.public_key().to_hex());
            println!("signature: {}", signature.to_hex());
        }
        "verify" => {
            let document = args.document.as_ref().ok_or_else(|| anyhow::anyhow!("verify requires a document path"))?;
            let signature_hex = args.signature.as_deref().ok_or_else(|| anyhow::anyhow!("verify requires --signature"))?;
            let public_key_hex = args.public_key.as_deref().ok_or_else(|| anyhow::anyhow!("verify requires --public-key"))?;
            let value = load_json(document)?;
            let canonical = CanonicalBytes::new(&value)?;
            let signature = Ed25519Signature::from_hex(signature_hex)?;
            let public_key = Ed25519PublicKey::from_hex(public_key_hex)?;
            msez_crypto::ed25519::verify_with_public_key(&canonical, &signature, &public_key)?;
            println!("signature valid");
        }
        other => anyhow::bail!("unknown sign operation: {other}"),
    }
    Ok(())
}

fn load_json(path: &PathBuf) -> anyhow::Result<serde_json::Value> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
