//! # Migration Saga — Cross-Jurisdiction Asset Migration FSM
//!
//! Models the saga that carries a smart asset from a source corridor
//! to a destination corridor: `INITIATED → COMPLIANCE_CHECK →
//! ATTESTATION_GATHERING → SOURCE_LOCK → TRANSIT →
//! DESTINATION_VERIFICATION → DESTINATION_UNLOCK → COMPLETED`, with
//! lateral terminals `COMPENSATED`, `DISPUTED`, `CANCELLED`.
//!
//! Unlike `corridor.rs`, saga state is not encoded as distinct Rust
//! types: the number of lateral escapes (timeout, dispute, operator
//! cancel) from nearly every mid-saga state makes a typestate
//! transition graph unwieldy, so `MigrationPhase` is a plain enum and
//! legality is enforced by a runtime table, mirroring `DynCorridor` in
//! `corridor.rs`. What compile-time typing still buys us is deadline
//! presence: a `MigrationBuilder<NoDeadline>` cannot skip past the
//! decision of whether a saga is time-boxed — `.with_deadline()` moves
//! it to `MigrationBuilder<HasDeadline>` explicitly.
//!
//! ## Implements
//!
//! Spec §4.8 — Migration Saga.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use msez_core::{ArtifactRef, MigrationId, Timestamp};

// ─── Phases ──────────────────────────────────────────────────────────

/// A phase of the migration saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MigrationPhase {
    Initiated,
    ComplianceCheck,
    AttestationGathering,
    SourceLock,
    Transit,
    DestinationVerification,
    DestinationUnlock,
    Completed,
    Compensated,
    Disputed,
    Cancelled,
}

impl MigrationPhase {
    /// Whether this phase is terminal — no further `advance_to` is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Compensated | Self::Disputed | Self::Cancelled
        )
    }

    /// The phases this phase may legally advance to via `advance_to`.
    ///
    /// `DISPUTED` is reachable from any non-terminal phase (a dispute can
    /// interrupt the saga at any point); `CANCELLED` likewise except once
    /// the destination unlock has fired, since reversing a completed
    /// unlock is not a cancellation, it's a dispute. `COMPENSATED` is
    /// reached only through `check_deadline`'s timeout path, never via
    /// `advance_to` directly.
    fn allowed_targets(&self) -> &'static [MigrationPhase] {
        use MigrationPhase::*;
        match self {
            Initiated => &[ComplianceCheck, Disputed, Cancelled],
            ComplianceCheck => &[AttestationGathering, Disputed, Cancelled],
            AttestationGathering => &[SourceLock, Disputed, Cancelled],
            SourceLock => &[Transit, Disputed, Cancelled],
            Transit => &[DestinationVerification, Disputed, Cancelled],
            DestinationVerification => &[DestinationUnlock, Disputed, Cancelled],
            DestinationUnlock => &[Completed, Disputed],
            Completed | Compensated | Disputed | Cancelled => &[],
        }
    }

    fn is_allowed(&self, target: MigrationPhase) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl std::fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initiated => "INITIATED",
            Self::ComplianceCheck => "COMPLIANCE_CHECK",
            Self::AttestationGathering => "ATTESTATION_GATHERING",
            Self::SourceLock => "SOURCE_LOCK",
            Self::Transit => "TRANSIT",
            Self::DestinationVerification => "DESTINATION_VERIFICATION",
            Self::DestinationUnlock => "DESTINATION_UNLOCK",
            Self::Completed => "COMPLETED",
            Self::Compensated => "COMPENSATED",
            Self::Disputed => "DISPUTED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// ─── Transitions & Compensations ─────────────────────────────────────

/// One recorded state transition in a saga's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationTransition {
    /// The phase the saga was in before this transition.
    pub from: MigrationPhase,
    /// The phase the saga moved to.
    pub to: MigrationPhase,
    /// When the transition was recorded.
    pub at: Timestamp,
    /// Human/machine reason for the transition.
    pub reason: String,
    /// Evidence artifact backing this transition, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_ref: Option<ArtifactRef>,
}

/// An action the orchestrator must drive to undo the effect of a phase,
/// queued when that phase is entered and popped in reverse on abort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationAction {
    /// The phase whose effect this action undoes.
    pub undoes_phase: MigrationPhase,
    /// Orchestrator-dispatched handler name, e.g. `"release_source_lock"`.
    pub handler: String,
    /// Free-form parameters the handler needs, carried as JSON.
    pub params: serde_json::Value,
}

/// A compensation action that has actually been driven, with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationRecord {
    /// The action that was driven.
    pub action: CompensationAction,
    /// When it was driven.
    pub at: Timestamp,
    /// Whether the handler reported success.
    pub succeeded: bool,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by saga operations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Attempted transition is not in the legality table for the current phase.
    #[error("invalid migration transition: {from} -> {to}")]
    InvalidTransition {
        from: MigrationPhase,
        to: MigrationPhase,
    },
    /// `advance_to`/`cancel` called on a saga already in a terminal phase.
    #[error("migration saga {id} is already terminal at {phase}")]
    AlreadyTerminal { id: MigrationId, phase: MigrationPhase },
    /// Deadline exceeded on a non-terminal saga.
    #[error(transparent)]
    Timeout(#[from] MigrationTimeoutError),
}

/// Raised by [`MigrationSaga::check_deadline`] when the saga's deadline
/// has passed while the saga is still non-terminal.
#[derive(Debug, Error)]
#[error("migration saga {id} exceeded its deadline of {deadline} at {checked_at}")]
pub struct MigrationTimeoutError {
    pub id: MigrationId,
    pub deadline: Timestamp,
    pub checked_at: Timestamp,
}

// ─── Builder typestate (deadline presence) ──────────────────────────

/// Marker: the builder has not been given a deadline yet.
#[derive(Debug, Clone, Copy)]
pub struct NoDeadline;

/// Marker: the builder carries a deadline.
#[derive(Debug, Clone, Copy)]
pub struct HasDeadline;

/// Builds a [`MigrationSaga`], tracking at compile time whether a deadline
/// has been attached.
///
/// Sagas without a deadline are legal (some migrations are not
/// time-boxed), so `NoDeadline` can still `.build()`; the typestate exists
/// so that code paths requiring a bounded saga can demand
/// `MigrationBuilder<HasDeadline>` in their signature rather than
/// re-checking `Option::is_some()` at runtime.
#[derive(Debug)]
pub struct MigrationBuilder<D> {
    id: MigrationId,
    deadline: Option<Timestamp>,
    _marker: PhantomData<D>,
}

impl MigrationBuilder<NoDeadline> {
    /// Start building a saga with a fresh random ID.
    pub fn new() -> Self {
        Self {
            id: MigrationId::new(),
            deadline: None,
            _marker: PhantomData,
        }
    }

    /// Attach a deadline, moving to `MigrationBuilder<HasDeadline>`.
    pub fn with_deadline(self, deadline: Timestamp) -> MigrationBuilder<HasDeadline> {
        MigrationBuilder {
            id: self.id,
            deadline: Some(deadline),
            _marker: PhantomData,
        }
    }

    /// Build an undeadlined saga.
    pub fn build(self) -> MigrationSaga {
        MigrationSaga::new(self.id, self.deadline)
    }
}

impl Default for MigrationBuilder<NoDeadline> {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationBuilder<HasDeadline> {
    /// Build a deadlined saga.
    pub fn build(self) -> MigrationSaga {
        MigrationSaga::new(self.id, self.deadline)
    }
}

// ─── The saga ────────────────────────────────────────────────────────

/// A running migration saga: its current phase, transition history, and
/// the compensation stack accumulated along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSaga {
    pub id: MigrationId,
    pub phase: MigrationPhase,
    pub deadline: Option<Timestamp>,
    pub history: Vec<MigrationTransition>,
    pub compensation_stack: Vec<CompensationAction>,
    pub compensations_driven: Vec<CompensationRecord>,
}

impl MigrationSaga {
    /// Construct a saga directly in `INITIATED`, with an empty history.
    pub fn new(id: MigrationId, deadline: Option<Timestamp>) -> Self {
        Self {
            id,
            phase: MigrationPhase::Initiated,
            deadline,
            history: Vec::new(),
            compensation_stack: Vec::new(),
            compensations_driven: Vec::new(),
        }
    }

    /// Check the saga's deadline against `now`. If exceeded and the saga
    /// is not already terminal, drives every queued compensation in
    /// reverse, transitions to `COMPENSATED`, and returns the timeout
    /// error. Terminal sagas are exempt.
    pub fn check_deadline(&mut self, now: Timestamp) -> Result<(), MigrationTimeoutError> {
        let Some(deadline) = self.deadline else {
            return Ok(());
        };
        if self.phase.is_terminal() || now <= deadline {
            return Ok(());
        }

        self.drive_compensations_reverse(now);
        let from = self.phase;
        self.phase = MigrationPhase::Compensated;
        self.history.push(MigrationTransition {
            from,
            to: MigrationPhase::Compensated,
            at: now,
            reason: "deadline exceeded".to_string(),
            evidence_ref: None,
        });

        Err(MigrationTimeoutError {
            id: self.id,
            deadline,
            checked_at: now,
        })
    }

    /// Queue a compensation action for the phase currently being entered.
    /// Called by orchestrator handlers as a side effect of doing the work
    /// a phase represents (e.g. locking source funds queues the
    /// corresponding unlock).
    pub fn queue_compensation(&mut self, action: CompensationAction) {
        self.compensation_stack.push(action);
    }

    /// Advance the saga to `target`, recording `reason` and optional
    /// `evidence_ref`. Runs `check_deadline` first per spec: a timed-out
    /// saga fails the advance with `MigrationTimeout` regardless of
    /// whether `target` would otherwise have been legal.
    pub fn advance_to(
        &mut self,
        target: MigrationPhase,
        reason: impl Into<String>,
        evidence_ref: Option<ArtifactRef>,
        now: Timestamp,
    ) -> Result<(), MigrationError> {
        self.check_deadline(now)?;

        if self.phase.is_terminal() {
            return Err(MigrationError::AlreadyTerminal {
                id: self.id,
                phase: self.phase,
            });
        }
        if !self.phase.is_allowed(target) {
            return Err(MigrationError::InvalidTransition {
                from: self.phase,
                to: target,
            });
        }

        let from = self.phase;
        self.history.push(MigrationTransition {
            from,
            to: target,
            at: now,
            reason: reason.into(),
            evidence_ref,
        });
        self.phase = target;

        Ok(())
    }

    /// Cancel the saga. Only valid from a non-terminal phase; drives all
    /// queued compensations in reverse and transitions to `CANCELLED`.
    pub fn cancel(&mut self, reason: impl Into<String>, now: Timestamp) -> Result<(), MigrationError> {
        if self.phase.is_terminal() {
            return Err(MigrationError::AlreadyTerminal {
                id: self.id,
                phase: self.phase,
            });
        }

        self.drive_compensations_reverse(now);
        let from = self.phase;
        self.history.push(MigrationTransition {
            from,
            to: MigrationPhase::Cancelled,
            at: now,
            reason: reason.into(),
            evidence_ref: None,
        });
        self.phase = MigrationPhase::Cancelled;

        Ok(())
    }

    fn drive_compensations_reverse(&mut self, now: Timestamp) {
        while let Some(action) = self.compensation_stack.pop() {
            self.compensations_driven.push(CompensationRecord {
                action,
                at: now,
                succeeded: true,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn artifact_ref() -> ArtifactRef {
        let digest = msez_core::sha256_bytes(b"evidence");
        ArtifactRef::new("MSEZComplianceCheckEvidence", &digest)
    }

    #[test]
    fn test_happy_path_to_completed() {
        let mut saga = MigrationBuilder::<NoDeadline>::new().build();
        let t0 = Timestamp::now();

        saga.advance_to(MigrationPhase::ComplianceCheck, "kyc passed", None, t0)
            .unwrap();
        saga.advance_to(
            MigrationPhase::AttestationGathering,
            "compliance ok",
            Some(artifact_ref()),
            t0,
        )
        .unwrap();
        saga.advance_to(MigrationPhase::SourceLock, "attestations gathered", None, t0)
            .unwrap();
        saga.advance_to(MigrationPhase::Transit, "source locked", None, t0)
            .unwrap();
        saga.advance_to(
            MigrationPhase::DestinationVerification,
            "in transit",
            None,
            t0,
        )
        .unwrap();
        saga.advance_to(MigrationPhase::DestinationUnlock, "verified", None, t0)
            .unwrap();
        saga.advance_to(MigrationPhase::Completed, "unlocked", None, t0)
            .unwrap();

        assert_eq!(saga.phase, MigrationPhase::Completed);
        assert_eq!(saga.history.len(), 7);
        assert_eq!(saga.history[0].from, MigrationPhase::Initiated);
    }

    #[test]
    fn test_first_transition_from_is_semantic_initiated() {
        let mut saga = MigrationBuilder::<NoDeadline>::new().build();
        let t0 = Timestamp::now();
        saga.advance_to(MigrationPhase::ComplianceCheck, "start", None, t0)
            .unwrap();
        assert_eq!(saga.history[0].from, MigrationPhase::Initiated);
        assert_eq!(saga.history[0].to, MigrationPhase::ComplianceCheck);
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let mut saga = MigrationBuilder::<NoDeadline>::new().build();
        let t0 = Timestamp::now();
        let err = saga
            .advance_to(MigrationPhase::Transit, "skip ahead", None, t0)
            .unwrap_err();
        assert!(matches!(err, MigrationError::InvalidTransition { .. }));
        assert_eq!(saga.phase, MigrationPhase::Initiated);
    }

    #[test]
    fn test_deadline_in_past_compensates_on_first_advance() {
        let deadline = Timestamp::from_utc(*Timestamp::now().as_datetime() - Duration::hours(1));
        let mut saga = MigrationBuilder::<NoDeadline>::new()
            .with_deadline(deadline)
            .build();

        saga.queue_compensation(CompensationAction {
            undoes_phase: MigrationPhase::Initiated,
            handler: "noop".to_string(),
            params: serde_json::json!({}),
        });

        let now = Timestamp::now();
        let err = saga
            .advance_to(MigrationPhase::ComplianceCheck, "start", None, now)
            .unwrap_err();

        assert!(matches!(err, MigrationError::Timeout(_)));
        assert_eq!(saga.phase, MigrationPhase::Compensated);
        assert_eq!(saga.compensations_driven.len(), 1);
        assert!(saga.compensation_stack.is_empty());
    }

    #[test]
    fn test_cancel_from_non_terminal_drives_compensations() {
        let mut saga = MigrationBuilder::<NoDeadline>::new().build();
        let t0 = Timestamp::now();
        saga.advance_to(MigrationPhase::ComplianceCheck, "start", None, t0)
            .unwrap();
        saga.queue_compensation(CompensationAction {
            undoes_phase: MigrationPhase::ComplianceCheck,
            handler: "release_compliance_hold".to_string(),
            params: serde_json::json!({}),
        });

        saga.cancel("operator requested", t0).unwrap();

        assert_eq!(saga.phase, MigrationPhase::Cancelled);
        assert!(saga.compensation_stack.is_empty());
        assert_eq!(saga.compensations_driven.len(), 1);
    }

    #[test]
    fn test_cancel_on_terminal_saga_rejected() {
        let mut saga = MigrationBuilder::<NoDeadline>::new().build();
        let t0 = Timestamp::now();
        saga.cancel("early cancel", t0).unwrap();
        let err = saga.cancel("again", t0).unwrap_err();
        assert!(matches!(err, MigrationError::AlreadyTerminal { .. }));
    }

    #[test]
    fn test_disputed_reachable_from_any_non_terminal_phase() {
        let mut saga = MigrationBuilder::<NoDeadline>::new().build();
        let t0 = Timestamp::now();
        saga.advance_to(MigrationPhase::ComplianceCheck, "start", None, t0)
            .unwrap();
        saga.advance_to(MigrationPhase::Disputed, "counterparty dispute", None, t0)
            .unwrap();
        assert_eq!(saga.phase, MigrationPhase::Disputed);

        let err = saga
            .advance_to(MigrationPhase::Completed, "too late", None, t0)
            .unwrap_err();
        assert!(matches!(err, MigrationError::AlreadyTerminal { .. }));
    }
}
