//! # msez-state — Typestate-Encoded State Machines
//!
//! Implements the state machines of the SEZ Stack using the typestate pattern.
//! Each state is a distinct Rust type, and transitions are methods that consume
//! the current state and produce the next state. Invalid transitions are
//! compile errors, not runtime checks.
//!
//! ## State Machines
//!
//! - **Corridor** (`corridor.rs`): `Draft → Pending → Active` with `Halted`,
//!   `Suspended`, and `Deprecated` branches. Implements spec §40.
//!
//! - **Migration** (`migration.rs`): cross-jurisdiction migration saga
//!   running `INITIATED → COMPLIANCE_CHECK → ATTESTATION_GATHERING →
//!   SOURCE_LOCK → TRANSIT → DESTINATION_VERIFICATION →
//!   DESTINATION_UNLOCK → COMPLETED`, with lateral terminals
//!   `COMPENSATED`, `DISPUTED`, `CANCELLED`. Phase is a runtime enum with
//!   a legality table rather than typestate; deadline presence is still
//!   typestate-enforced via `MigrationBuilder<NoDeadline>` /
//!   `MigrationBuilder<HasDeadline>`. Implements spec §4.8.
//!
//! - **Entity** (`entity.rs`): Entity lifecycle with 10-stage dissolution
//!   process. Implements spec §5.
//!
//! - **License** (`license.rs`): License lifecycle
//!   (Application → Review → Issued → Active → Suspended → Revoked/Expired/Rejected).
//!   Implements spec §15.
//!
//! - **Watcher** (`watcher.rs`): re-exports the watcher bonding, slashing,
//!   reputation, quorum selection, and equivocation detection types from
//!   the `msez-watcher` crate, where that logic now lives. Implements
//!   spec §4.10.
//!
//! - **Lifecycle** (`lifecycle.rs`): a data-driven counterpart to
//!   `corridor.rs` — states and transitions are a loaded rule table
//!   (evidence VC types + finality floor per edge) rather than compiled
//!   types, for deployments that configure their own lifecycle artifact.
//!
//! ## Design
//!
//! The typestate pattern prevents the corridor state machine divergence defect
//! (audit §2.3). There are no string-typed state names — the state is encoded
//! in the Rust type system. `Corridor<Draft>` has a `.submit()` method that
//! returns `Corridor<Pending>`. `Corridor<Draft>` has no `.halt()` method —
//! calling it is a compile error.

pub mod corridor;
pub mod entity;
pub mod license;
pub mod lifecycle;
pub mod migration;
pub mod watcher;

// ─── Corridor re-exports ────────────────────────────────────────────

pub use corridor::{
    Active, Corridor, CorridorError, CorridorState, Deprecated, Draft, DynCorridor,
    DynCorridorState, Halted, Pending, Suspended, TransitionRecord,
};

// ─── Corridor evidence re-exports ───────────────────────────────────

pub use corridor::{
    ActivationEvidence, DeprecationEvidence, HaltReason, ResumeEvidence, SubmissionEvidence,
    SuspendReason,
};

// ─── Migration re-exports ───────────────────────────────────────────

pub use migration::{
    CompensationAction, CompensationRecord, HasDeadline, MigrationBuilder, MigrationError,
    MigrationPhase, MigrationSaga, MigrationTimeoutError, MigrationTransition, NoDeadline,
};

// ─── Entity re-exports ──────────────────────────────────────────────

pub use entity::{
    DissolutionStage, Entity, EntityError, EntityLifecycleState, EntityTransitionEvidence,
    EntityTransitionRecord,
};

// ─── License re-exports ─────────────────────────────────────────────

pub use license::{License, LicenseError, LicenseId, LicenseState, LicenseTransitionEvidence, LicenseTransitionRecord};

// ─── Lifecycle (data-driven) re-exports ─────────────────────────────

pub use lifecycle::{
    CorridorLifecycle, EvidenceEntry, FinalityLevel, LifecycleError, LifecycleHistoryEntry,
    LifecycleStateMachine, TransitionRule,
};

// ─── Watcher re-exports ─────────────────────────────────────────────

pub use watcher::{
    AttestationClaim, BondStatus, EquivocationDetector, EquivocationEvidence, ReputationMetrics,
    SlashingCondition, SlashingEvidence, SlashingRecord, Watcher, WatcherBond, WatcherError,
    WatcherRegistry, WatcherTransitionRecord,
};
