//! # Corridor Lifecycle FSM (data-driven rule table)
//!
//! States and transitions are themselves a loaded artifact — a
//! `corridor.lifecycle.state-machine.v1.json` style rule table — rather
//! than compile-time types. This is the runtime-evaluated counterpart to
//! `corridor::DynCorridor`: it exists because the lifecycle's rules
//! (required evidence VC types, finality floor) are data the deployment
//! configures, not a fixed set the binary hardcodes.
//!
//! ## Implements
//!
//! Spec §4.5 — Lifecycle FSM: transition rules, finality floor, evidence
//! resolution and proof verification before a state advances.
//!
//! ## Design
//!
//! `CorridorState::name()` of the typestate module and this module's
//! `&str` state names deliberately diverge: the typestate module's states
//! are `ACTIVE`/`HALTED`/... (a fixed, compiled set) while rule tables
//! loaded here may name the equivalent operational state however the
//! deployment's state-machine artifact defines it — this module does not
//! hardcode a name for "the operational state", it only enforces the
//! rule graph the artifact declares.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use msez_core::{ArtifactRef, CorridorId, Timestamp};

/// Finality levels, strictly ordered 0..5 (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalityLevel {
    /// A transition has been proposed but carries no cryptographic finality.
    Proposed,
    /// A signed corridor receipt backs the transition.
    ReceiptSigned,
    /// A signed checkpoint backs the transition.
    CheckpointSigned,
    /// Watcher quorum attestation backs the transition.
    WatcherQuorum,
    /// The transition is anchored on an L1 chain.
    L1Anchored,
    /// The transition has legal recognition (highest finality).
    LegallyRecognized,
}

/// One allowed `from_state -> to_state` edge and its gating requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRule {
    /// The state this rule transitions from.
    pub from_state: String,
    /// The state this rule transitions to.
    pub to_state: String,
    /// VC types that must all appear in the evidence list for this
    /// transition to be legal.
    #[serde(default)]
    pub requires_evidence_vc_types: Vec<String>,
    /// The minimum finality level the supplied evidence must carry.
    pub requires_finality_level: FinalityLevel,
}

/// A loaded lifecycle state-machine artifact: the authoritative set of
/// states and the rule table governing transitions between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleStateMachine {
    /// All state names this machine recognizes.
    pub states: Vec<String>,
    /// The transition rule table.
    pub rules: Vec<TransitionRule>,
}

impl LifecycleStateMachine {
    /// Parse a state machine from its canonical JSON artifact form
    /// (`corridor.lifecycle.state-machine.v1.json`).
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    fn find_rule(&self, from: &str, to: &str) -> Option<&TransitionRule> {
        self.rules
            .iter()
            .find(|r| r.from_state == from && r.to_state == to)
    }

    /// The stock corridor lifecycle used when no deployment-specific
    /// artifact is loaded: `DRAFT -> PENDING -> OPERATIONAL`, with
    /// `HALTED`/`SUSPENDED` branches off `OPERATIONAL` and a terminal
    /// `DEPRECATED`.
    pub fn default_corridor_machine() -> Self {
        Self {
            states: vec![
                "DRAFT".to_string(),
                "PENDING".to_string(),
                "OPERATIONAL".to_string(),
                "HALTED".to_string(),
                "SUSPENDED".to_string(),
                "DEPRECATED".to_string(),
            ],
            rules: vec![
                TransitionRule {
                    from_state: "DRAFT".to_string(),
                    to_state: "PENDING".to_string(),
                    requires_evidence_vc_types: vec!["MSEZCorridorAgreementCredential".to_string()],
                    requires_finality_level: FinalityLevel::Proposed,
                },
                TransitionRule {
                    from_state: "PENDING".to_string(),
                    to_state: "OPERATIONAL".to_string(),
                    requires_evidence_vc_types: vec![
                        "MSEZRegulatoryApprovalCredential".to_string(),
                    ],
                    requires_finality_level: FinalityLevel::WatcherQuorum,
                },
                TransitionRule {
                    from_state: "OPERATIONAL".to_string(),
                    to_state: "HALTED".to_string(),
                    requires_evidence_vc_types: vec![
                        "MSEZCorridorForkAlarmCredential".to_string(),
                    ],
                    requires_finality_level: FinalityLevel::ReceiptSigned,
                },
                TransitionRule {
                    from_state: "OPERATIONAL".to_string(),
                    to_state: "SUSPENDED".to_string(),
                    requires_evidence_vc_types: vec![],
                    requires_finality_level: FinalityLevel::Proposed,
                },
                TransitionRule {
                    from_state: "SUSPENDED".to_string(),
                    to_state: "OPERATIONAL".to_string(),
                    requires_evidence_vc_types: vec![
                        "MSEZSuspensionResolutionCredential".to_string(),
                    ],
                    requires_finality_level: FinalityLevel::CheckpointSigned,
                },
                TransitionRule {
                    from_state: "HALTED".to_string(),
                    to_state: "DEPRECATED".to_string(),
                    requires_evidence_vc_types: vec![],
                    requires_finality_level: FinalityLevel::LegallyRecognized,
                },
            ],
        }
    }
}

/// One piece of evidence offered in support of a transition: the VC type
/// it claims to satisfy, plus a typed pointer to the VC artifact itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// The VC type this evidence is offered to satisfy.
    pub vc_type: String,
    /// The evidence artifact's typed pointer.
    pub artifact_ref: ArtifactRef,
}

/// Errors applying a lifecycle transition.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// No rule in the table permits this `(from, to)` pair.
    #[error("no transition rule from {from} to {to}")]
    NoSuchTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// One or more VC types the rule requires were not present in the
    /// evidence list.
    #[error("missing required evidence VC types: {0:?}")]
    MissingEvidence(Vec<String>),

    /// The evidence's finality level does not meet the rule's floor.
    #[error("finality floor not met: rule requires {required:?}, evidence provides {provided:?}")]
    FinalityFloorNotMet {
        /// The minimum finality level the rule requires.
        required: FinalityLevel,
        /// The finality level actually supplied.
        provided: FinalityLevel,
    },
}

/// One recorded transition in a corridor's lifecycle history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleHistoryEntry {
    /// State before the transition.
    pub from_state: String,
    /// State after the transition.
    pub to_state: String,
    /// When the transition was applied.
    pub at: Timestamp,
    /// The evidence offered in support of this transition.
    pub evidence: Vec<EvidenceEntry>,
    /// The finality level the evidence carried.
    pub finality_level: FinalityLevel,
}

/// A corridor's runtime lifecycle state, evaluated against a loaded
/// `LifecycleStateMachine`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorLifecycle {
    /// The corridor this lifecycle tracks.
    pub corridor_id: CorridorId,
    /// Current state name.
    pub state: String,
    /// Append-only transition history.
    pub history: Vec<LifecycleHistoryEntry>,
}

impl CorridorLifecycle {
    /// Start a new lifecycle for `corridor_id` in `initial_state`.
    pub fn new(corridor_id: CorridorId, initial_state: impl Into<String>) -> Self {
        Self {
            corridor_id,
            state: initial_state.into(),
            history: Vec::new(),
        }
    }

    /// Apply a transition: validate the rule exists, that the evidence
    /// list covers every required VC type, and that the supplied finality
    /// level meets the rule's floor; append to history and advance state.
    ///
    /// Evidence VC proof verification and schema validation are the
    /// caller's responsibility before evidence reaches this call — this
    /// function enforces the rule-table gating, not cryptographic
    /// correctness of the VCs themselves.
    pub fn apply_transition(
        &mut self,
        machine: &LifecycleStateMachine,
        to_state: &str,
        evidence: Vec<EvidenceEntry>,
        finality_level: FinalityLevel,
    ) -> Result<(), LifecycleError> {
        let rule = machine
            .find_rule(&self.state, to_state)
            .ok_or_else(|| LifecycleError::NoSuchTransition {
                from: self.state.clone(),
                to: to_state.to_string(),
            })?;

        let provided: HashSet<&str> = evidence.iter().map(|e| e.vc_type.as_str()).collect();
        let missing: Vec<String> = rule
            .requires_evidence_vc_types
            .iter()
            .filter(|t| !provided.contains(t.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(LifecycleError::MissingEvidence(missing));
        }

        if finality_level < rule.requires_finality_level {
            return Err(LifecycleError::FinalityFloorNotMet {
                required: rule.requires_finality_level,
                provided: finality_level,
            });
        }

        self.history.push(LifecycleHistoryEntry {
            from_state: self.state.clone(),
            to_state: to_state.to_string(),
            at: Timestamp::now(),
            evidence,
            finality_level,
        });
        self.state = to_state.to_string();
        Ok(())
    }
}
