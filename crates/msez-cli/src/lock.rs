//! # Lock Subcommand
//!
//! Lockfile generation and deterministic verification. A zone's lockfile
//! pins the content digests of every lawpack, regpack, and licensepack it
//! references, so a zone's effective legal/regulatory inputs cannot drift
//! silently between deployments.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;
use msez_core::{sha256_bytes, Timestamp};
use serde::{Deserialize, Serialize};

/// Arguments for the lock subcommand.
#[derive(Args, Debug)]
pub struct LockArgs {
    /// Path to the zone YAML file.
    pub zone_file: PathBuf,

    /// Verify the existing lockfile instead of regenerating it.
    #[arg(long)]
    pub check: bool,
}

/// A zone descriptor's pack references, read from the subset of zone YAML
/// fields the lock subcommand cares about.
#[derive(Debug, Deserialize)]
struct ZoneDescriptor {
    zone_id: String,
    #[serde(default)]
    lawpacks: Vec<PathBuf>,
    #[serde(default)]
    regpacks: Vec<PathBuf>,
    #[serde(default)]
    licensepacks: Vec<PathBuf>,
}

/// The generated lockfile content: a zone's identity plus the sorted,
/// deduplicated digest sets of every referenced pack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackLock {
    pub zone_id: String,
    pub generated_at: String,
    #[serde(default)]
    pub lawpack_digest_set: BTreeSet<String>,
    #[serde(default)]
    pub regpack_digest_set: BTreeSet<String>,
    #[serde(default)]
    pub licensepack_digest_set: BTreeSet<String>,
}

pub fn run(args: &LockArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.zone_file)?;
    let zone: ZoneDescriptor = serde_yaml::from_str(&content)?;
    let zone_dir = args.zone_file.parent().unwrap_or_else(|| Path::new("."));

    let lock = StackLock {
        zone_id: zone.zone_id.clone(),
        generated_at: Timestamp::now().to_string(),
        lawpack_digest_set: digest_set(zone_dir, &zone.lawpacks)?,
        regpack_digest_set: digest_set(zone_dir, &zone.regpacks)?,
        licensepack_digest_set: digest_set(zone_dir, &zone.licensepacks)?,
    };

    let lock_path = lock_file_path(&args.zone_file);

    if args.check {
        let existing: StackLock = serde_json::from_str(&std::fs::read_to_string(&lock_path)?)?;
        if existing.lawpack_digest_set != lock.lawpack_digest_set
            || existing.regpack_digest_set != lock.regpack_digest_set
            || existing.licensepack_digest_set != lock.licensepack_digest_set
        {
            anyhow::bail!("lockfile out of date: {}", lock_path.display());
        }
        println!("{} matches {}", lock_path.display(), args.zone_file.display());
        return Ok(());
    }

    let body = serde_json::to_string_pretty(&lock)?;
    std::fs::write(&lock_path, body)?;
    println!("wrote {}", lock_path.display());
    Ok(())
}

fn lock_file_path(zone_file: &Path) -> PathBuf {
    let mut path = zone_file.to_path_buf();
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("zone").to_string();
    path.set_file_name(format!("{name}.lock.json"));
    path
}

/// Digest every path in `paths` (resolved relative to `base`) and collect
/// the hex digests into a sorted set — sorting is what keeps the lockfile
/// byte-identical across regenerations regardless of YAML list order.
fn digest_set(base: &Path, paths: &[PathBuf]) -> anyhow::Result<BTreeSet<String>> {
    paths
        .iter()
        .map(|p| {
            let full = base.join(p);
            let bytes = std::fs::read(&full)?;
            Ok(sha256_bytes(&bytes).to_hex())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_file_path_appends_suffix() {
        assert_eq!(lock_file_path(Path::new("zones/pk.yaml")), PathBuf::from("zones/pk.yaml.lock.json"));
    }

    #[test]
    fn test_digest_set_is_sorted_and_deduplicated() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.bin"), b"alpha").unwrap();
        std::fs::write(tmp.path().join("b.bin"), b"beta").unwrap();
        let set = digest_set(
            tmp.path(),
            &[PathBuf::from("b.bin"), PathBuf::from("a.bin"), PathBuf::from("a.bin")],
        )
        .unwrap();
        assert_eq!(set.len(), 2);
    }
}
