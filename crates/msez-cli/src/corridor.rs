//! # Corridor Subcommand
//!
//! Corridor lifecycle management: propose, activate, halt, suspend, resume.

use clap::Args;
use msez_core::{CorridorId, JurisdictionId};
use msez_state::corridor::{DynCorridor, DynCorridorState};
use msez_state::TransitionRecord;

/// Arguments for the corridor subcommand.
#[derive(Args, Debug)]
pub struct CorridorArgs {
    /// Corridor operation to perform: propose, activate, halt, suspend, resume, deprecate.
    #[arg(long, default_value = "propose")]
    pub operation: String,

    /// First jurisdiction.
    #[arg(long, default_value = "PK")]
    pub jurisdiction_a: String,

    /// Second jurisdiction.
    #[arg(long, default_value = "AE")]
    pub jurisdiction_b: String,

    /// Reason or evidence note attached to the final transition.
    #[arg(long)]
    pub reason: Option<String>,
}

/// Drive a corridor through the states that precede the requested
/// operation, starting from a fresh `Draft`, and print the resulting
/// state and transition log.
///
/// There is no persistence layer wired into the CLI — a real deployment
/// would load the corridor's current `DynCorridor` from storage before
/// transitioning it. This replays the path from `Draft` each invocation,
/// which is enough to exercise the transition rules end to end.
pub fn run(args: &CorridorArgs) -> anyhow::Result<()> {
    let mut corridor = DynCorridor {
        id: CorridorId::new(),
        jurisdiction_a: JurisdictionId::new(&args.jurisdiction_a),
        jurisdiction_b: JurisdictionId::new(&args.jurisdiction_b),
        created_at: msez_core::Timestamp::now(),
        state: DynCorridorState::Draft,
        transition_log: Vec::new(),
    };

    let path: &[DynCorridorState] = match args.operation.as_str() {
        "propose" => &[],
        "activate" => &[DynCorridorState::Pending, DynCorridorState::Active],
        "halt" => &[DynCorridorState::Pending, DynCorridorState::Active, DynCorridorState::Halted],
        "suspend" => &[DynCorridorState::Pending, DynCorridorState::Active, DynCorridorState::Suspended],
        "resume" => &[
            DynCorridorState::Pending,
            DynCorridorState::Active,
            DynCorridorState::Suspended,
            DynCorridorState::Active,
        ],
        "deprecate" => &[
            DynCorridorState::Pending,
            DynCorridorState::Active,
            DynCorridorState::Halted,
            DynCorridorState::Deprecated,
        ],
        other => anyhow::bail!("unknown corridor operation: {other}"),
    };

    for (i, &step) in path.iter().enumerate() {
        let reason = if i == path.len() - 1 { args.reason.clone() } else { None };
        corridor.try_transition(step, None, reason)?;
    }

    println!("corridor {} state={}", corridor.id, corridor.state_name());
    for record in &corridor.transition_log {
        print_record(record);
    }
    Ok(())
}

fn print_record(record: &TransitionRecord) {
    println!(
        "  {} -> {} at {}{}",
        record.from_state,
        record.to_state,
        record.timestamp,
        record.reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default(),
    );
}
