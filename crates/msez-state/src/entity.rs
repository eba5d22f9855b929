//! # Entity Lifecycle State Machine
//!
//! Models the lifecycle of legal entities (companies, SPVs, trusts) that
//! act as `holder_id` on licenses and corridor jurisdiction endpoints.
//!
//! ## States
//!
//! `Formation → Active → Suspended → Dissolution(stage 1..=10) → Dissolved`
//!
//! Not one of the spec's own top-level components, but entities are
//! referenced throughout the license and corridor data model, so the
//! lifecycle is kept as a small supplemental FSM rather than an opaque ID.
//!
//! ## Implements
//!
//! Supplemental — grounded in entity formation/dissolution handling, not a
//! named spec module.

use msez_core::{ArtifactRef, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A dissolution stage number, `1..=EntityLifecycleState::MAX_DISSOLUTION_STAGE`.
pub type DissolutionStage = u8;

/// The lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLifecycleState {
    /// Entity is being formed (initial registration).
    Formation,
    /// Entity is active and operational.
    Active,
    /// Entity is temporarily suspended.
    Suspended,
    /// Entity is undergoing dissolution (stages 1 through 10).
    Dissolution(u8),
    /// Entity has been fully dissolved (terminal).
    Dissolved,
}

impl EntityLifecycleState {
    pub const MAX_DISSOLUTION_STAGE: u8 = 10;

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dissolved)
    }
}

impl std::fmt::Display for EntityLifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Formation => write!(f, "FORMATION"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
            Self::Dissolution(stage) => write!(f, "DISSOLUTION_STAGE_{stage}"),
            Self::Dissolved => write!(f, "DISSOLVED"),
        }
    }
}

/// Evidence accompanying an entity transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityTransitionEvidence {
    /// Formation documents (incorporation certificate, registration).
    FormationRecord(ArtifactRef),
    /// Reason a suspension was imposed, with optional supporting artifact.
    SuspensionReason {
        reason: String,
        evidence: Option<ArtifactRef>,
    },
    /// Evidence clearing a suspension.
    ResumptionRecord(ArtifactRef),
    /// Evidence that a dissolution stage's checklist item was satisfied.
    DissolutionStageRecord(ArtifactRef),
    /// No evidence was supplied for this transition.
    None,
}

/// One recorded transition in an entity's lifecycle history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTransitionRecord {
    pub from: EntityLifecycleState,
    pub to: EntityLifecycleState,
    pub at: Timestamp,
    pub evidence: EntityTransitionEvidence,
}

/// Errors raised by entity lifecycle transitions.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("invalid entity transition: {from} -> {to}")]
    InvalidTransition {
        from: EntityLifecycleState,
        to: EntityLifecycleState,
    },
    #[error("entity {id} is already dissolved")]
    AlreadyTerminal { id: EntityId },
    #[error("dissolution stage {stage} out of range (1..={max})", max = EntityLifecycleState::MAX_DISSOLUTION_STAGE)]
    DissolutionStageOutOfRange { stage: u8 },
}

/// An entity with its lifecycle state and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique entity identifier.
    pub id: EntityId,
    /// Current lifecycle state.
    pub state: EntityLifecycleState,
    /// Append-only transition history.
    pub history: Vec<EntityTransitionRecord>,
}

impl Entity {
    /// Register a new entity, starting in `Formation`.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            state: EntityLifecycleState::Formation,
            history: Vec::new(),
        }
    }

    fn record(&mut self, to: EntityLifecycleState, evidence: EntityTransitionEvidence, now: Timestamp) {
        self.history.push(EntityTransitionRecord {
            from: self.state,
            to,
            at: now,
            evidence,
        });
        self.state = to;
    }

    /// Complete formation: `Formation → Active`.
    pub fn activate(&mut self, formation_record: ArtifactRef, now: Timestamp) -> Result<(), EntityError> {
        self.require(EntityLifecycleState::Formation, EntityLifecycleState::Active)?;
        self.record(
            EntityLifecycleState::Active,
            EntityTransitionEvidence::FormationRecord(formation_record),
            now,
        );
        Ok(())
    }

    /// Suspend an active entity: `Active → Suspended`.
    pub fn suspend(
        &mut self,
        reason: impl Into<String>,
        evidence: Option<ArtifactRef>,
        now: Timestamp,
    ) -> Result<(), EntityError> {
        self.require(EntityLifecycleState::Active, EntityLifecycleState::Suspended)?;
        self.record(
            EntityLifecycleState::Suspended,
            EntityTransitionEvidence::SuspensionReason {
                reason: reason.into(),
                evidence,
            },
            now,
        );
        Ok(())
    }

    /// Resume a suspended entity: `Suspended → Active`.
    pub fn resume(&mut self, resumption_record: ArtifactRef, now: Timestamp) -> Result<(), EntityError> {
        self.require(EntityLifecycleState::Suspended, EntityLifecycleState::Active)?;
        self.record(
            EntityLifecycleState::Active,
            EntityTransitionEvidence::ResumptionRecord(resumption_record),
            now,
        );
        Ok(())
    }

    /// Begin or advance dissolution by one stage. From `Active` or
    /// `Suspended` this starts at stage 1; from `Dissolution(n)` it
    /// advances to `n + 1`, which must stay within `1..=MAX_DISSOLUTION_STAGE`.
    pub fn advance_dissolution(
        &mut self,
        stage_record: ArtifactRef,
        now: Timestamp,
    ) -> Result<(), EntityError> {
        let next_stage = match self.state {
            EntityLifecycleState::Active | EntityLifecycleState::Suspended => 1,
            EntityLifecycleState::Dissolution(stage) => stage + 1,
            other => {
                return Err(EntityError::InvalidTransition {
                    from: other,
                    to: EntityLifecycleState::Dissolution(1),
                })
            }
        };
        if next_stage > EntityLifecycleState::MAX_DISSOLUTION_STAGE {
            return Err(EntityError::DissolutionStageOutOfRange { stage: next_stage });
        }
        self.record(
            EntityLifecycleState::Dissolution(next_stage),
            EntityTransitionEvidence::DissolutionStageRecord(stage_record),
            now,
        );
        Ok(())
    }

    /// Complete dissolution: `Dissolution(MAX_DISSOLUTION_STAGE) → Dissolved`.
    pub fn dissolve(&mut self, closing_record: ArtifactRef, now: Timestamp) -> Result<(), EntityError> {
        match self.state {
            EntityLifecycleState::Dissolution(stage) if stage == EntityLifecycleState::MAX_DISSOLUTION_STAGE => {
                self.record(
                    EntityLifecycleState::Dissolved,
                    EntityTransitionEvidence::DissolutionStageRecord(closing_record),
                    now,
                );
                Ok(())
            }
            other => Err(EntityError::InvalidTransition {
                from: other,
                to: EntityLifecycleState::Dissolved,
            }),
        }
    }

    fn require(
        &self,
        expected: EntityLifecycleState,
        target: EntityLifecycleState,
    ) -> Result<(), EntityError> {
        if self.state.is_terminal() {
            return Err(EntityError::AlreadyTerminal { id: self.id.clone() });
        }
        if self.state != expected {
            return Err(EntityError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact_ref() -> ArtifactRef {
        let digest = msez_core::sha256_bytes(b"entity-evidence");
        ArtifactRef::new("MSEZEntityFormationRecord", &digest)
    }

    #[test]
    fn test_formation_to_active() {
        let mut entity = Entity::new(EntityId::new());
        entity.activate(artifact_ref(), Timestamp::now()).unwrap();
        assert_eq!(entity.state, EntityLifecycleState::Active);
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut entity = Entity::new(EntityId::new());
        let now = Timestamp::now();
        entity.activate(artifact_ref(), now).unwrap();
        entity.suspend("regulatory hold", None, now).unwrap();
        assert_eq!(entity.state, EntityLifecycleState::Suspended);
        entity.resume(artifact_ref(), now).unwrap();
        assert_eq!(entity.state, EntityLifecycleState::Active);
    }

    #[test]
    fn test_full_dissolution_path() {
        let mut entity = Entity::new(EntityId::new());
        let now = Timestamp::now();
        entity.activate(artifact_ref(), now).unwrap();
        for stage in 1..=EntityLifecycleState::MAX_DISSOLUTION_STAGE {
            entity.advance_dissolution(artifact_ref(), now).unwrap();
            assert_eq!(entity.state, EntityLifecycleState::Dissolution(stage));
        }
        entity.dissolve(artifact_ref(), now).unwrap();
        assert_eq!(entity.state, EntityLifecycleState::Dissolved);
    }

    #[test]
    fn test_dissolve_before_final_stage_rejected() {
        let mut entity = Entity::new(EntityId::new());
        let now = Timestamp::now();
        entity.activate(artifact_ref(), now).unwrap();
        entity.advance_dissolution(artifact_ref(), now).unwrap();
        let err = entity.dissolve(artifact_ref(), now).unwrap_err();
        assert!(matches!(err, EntityError::InvalidTransition { .. }));
    }

    #[test]
    fn test_transition_after_dissolved_rejected() {
        let mut entity = Entity::new(EntityId::new());
        let now = Timestamp::now();
        entity.activate(artifact_ref(), now).unwrap();
        for _ in 1..=EntityLifecycleState::MAX_DISSOLUTION_STAGE {
            entity.advance_dissolution(artifact_ref(), now).unwrap();
        }
        entity.dissolve(artifact_ref(), now).unwrap();

        let err = entity.suspend("too late", None, now).unwrap_err();
        assert!(matches!(err, EntityError::AlreadyTerminal { .. }));
    }
}
