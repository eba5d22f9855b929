//! # Validate Subcommand
//!
//! Zone, module, and profile validation commands.

use std::path::PathBuf;

use clap::Args;
use msez_schema::SchemaValidator;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validate every module under `--modules-dir`.
    #[arg(long)]
    pub all_modules: bool,

    /// Validate a single zone YAML file.
    #[arg(long)]
    pub zone: Option<PathBuf>,

    /// Validate a single profile YAML file.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Root directory containing `*.schema.json` files.
    #[arg(long, default_value = "schemas")]
    pub schema_dir: PathBuf,

    /// Root directory containing module subdirectories.
    #[arg(long, default_value = "modules")]
    pub modules_dir: PathBuf,
}

pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let validator = SchemaValidator::new(args.schema_dir.clone())?;

    if args.all_modules {
        let report = validator.validate_all_modules(&args.modules_dir);
        println!("{}/{} modules passed", report.passed, report.total);
        for failure in &report.failures {
            println!("  FAIL {}: {}", failure.module_dir.display(), failure.error);
        }
        if report.failed > 0 {
            anyhow::bail!("{} module(s) failed validation", report.failed);
        }
    }

    if let Some(zone) = &args.zone {
        validator.validate_zone(zone)?;
        println!("{} is valid", zone.display());
    }

    if let Some(profile) = &args.profile {
        validator.validate_profile(profile)?;
        println!("{} is valid", profile.display());
    }

    Ok(())
}
