//! # msez CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// SEZ Stack CLI — Sovereign Economic Zone toolchain.
///
/// Validates zone configurations, manages lockfiles, operates corridors,
/// and performs cryptographic signing for the SEZ Stack.
#[derive(Parser, Debug)]
#[command(name = "msez", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate zones, modules, and profiles.
    Validate(msez_cli::validate::ValidateArgs),
    /// Generate or verify lockfiles.
    Lock(msez_cli::lock::LockArgs),
    /// Corridor lifecycle management.
    Corridor(msez_cli::corridor::CorridorArgs),
    /// Content-addressed storage operations.
    Artifact(msez_cli::artifact::ArtifactArgs),
    /// Ed25519 and VC signing operations.
    Sign(msez_cli::signing::SignArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => msez_cli::validate::run(&args),
        Commands::Lock(args) => msez_cli::lock::run(&args),
        Commands::Corridor(args) => msez_cli::corridor::run(&args),
        Commands::Artifact(args) => msez_cli::artifact::run(&args),
        Commands::Sign(args) => msez_cli::signing::run(&args),
    }
}
