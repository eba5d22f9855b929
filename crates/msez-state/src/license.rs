//! # License Lifecycle State Machine
//!
//! Models the lifecycle of business licenses within a jurisdiction,
//! covering the full spectrum from application through expiration or revocation.
//!
//! ## States
//!
//! ```text
//! Application ──▶ Review ──▶ Issued ──▶ Active ──▶ Suspended ──▶ Active (reinstatement)
//!                   │                     │            │
//!                   │                     │            └──▶ Revoked (terminal)
//!                   │                     │
//!                   └──▶ Rejected         └──▶ Expired (terminal)
//!                       (terminal)
//! ```
//!
//! ## License Categories
//!
//! Pakistan's deployment requires 15+ license categories. The state machine
//! is generic over license type — the same lifecycle applies to:
//! - Business incorporation licenses
//! - Professional certifications
//! - Import/export permits
//! - Financial services licenses
//! - Tax registrations
//!
//! ## Implements
//!
//! Spec §15 — License lifecycle management.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use msez_core::{sha256_bytes, ArtifactRef, Timestamp};

// ─── License Identifier ─────────────────────────────────────────────

/// Unique identifier for a license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseId(pub Uuid);

impl LicenseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LicenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LicenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "license:{}", self.0)
    }
}

// ─── License State ───────────────────────────────────────────────────

/// The lifecycle state of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseState {
    /// License application submitted, awaiting review.
    Application,
    /// Application is under regulatory review.
    Review,
    /// License has been issued but not yet activated.
    Issued,
    /// License is active and valid.
    Active,
    /// License has been temporarily suspended.
    Suspended,
    /// License has been permanently revoked (terminal).
    Revoked,
    /// License has expired (terminal).
    Expired,
    /// License application was rejected (terminal).
    Rejected,
}

impl LicenseState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked | Self::Expired | Self::Rejected)
    }

    /// Whether the license is currently valid for operations.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for LicenseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Application => "APPLICATION",
            Self::Review => "REVIEW",
            Self::Issued => "ISSUED",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Revoked => "REVOKED",
            Self::Expired => "EXPIRED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur during license lifecycle transitions.
#[derive(Error, Debug)]
pub enum LicenseError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid license transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// License is in a terminal state.
    #[error("license is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: String,
    },
}

// ─── Transition Evidence ─────────────────────────────────────────────

/// Evidence for a license lifecycle transition.
#[derive(Debug, Clone)]
pub struct LicenseTransitionEvidence {
    /// Reason for the transition.
    pub reason: String,
    /// Actor who initiated the transition (DID or authority ID).
    pub actor: Option<String>,
}

/// Record of a license state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseTransitionRecord {
    /// State before the transition.
    pub from_state: LicenseState,
    /// State after the transition.
    pub to_state: LicenseState,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Reason for the transition.
    pub reason: String,
}

// ─── License ─────────────────────────────────────────────────────────

/// A license with its lifecycle state and transition history.
///
/// Enforces valid state transitions with structured error reporting.
/// The license type and category are stored as metadata — the state
/// machine logic is the same regardless of license category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    /// Unique identifier, stable across the license's lifecycle.
    pub license_id: LicenseId,
    /// Current lifecycle state.
    pub state: LicenseState,
    /// License type/category (e.g., "business_incorporation", "import_export").
    pub license_type: String,
    /// The entity that holds this license.
    pub holder_id: String,
    /// When the license was created (application submitted).
    pub created_at: Timestamp,
    /// When the license expires (if set).
    pub expires_at: Option<Timestamp>,
    /// Ordered log of all state transitions.
    pub transitions: Vec<LicenseTransitionRecord>,
}

impl License {
    /// Create a new license application.
    pub fn new_application(license_type: String, holder_id: String) -> Self {
        Self {
            license_id: LicenseId::new(),
            state: LicenseState::Application,
            license_type,
            holder_id,
            created_at: Timestamp::now(),
            expires_at: None,
            transitions: Vec::new(),
        }
    }

    /// Submit application for review (APPLICATION → REVIEW).
    pub fn submit_for_review(
        &mut self,
        evidence: LicenseTransitionEvidence,
    ) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Application, "REVIEW")?;
        self.do_transition(LicenseState::Review, &evidence.reason);
        Ok(())
    }

    /// Issue the license after review (REVIEW → ISSUED).
    pub fn issue(
        &mut self,
        evidence: LicenseTransitionEvidence,
        expires_at: Option<Timestamp>,
    ) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Review, "ISSUED")?;
        self.expires_at = expires_at;
        self.do_transition(LicenseState::Issued, &evidence.reason);
        Ok(())
    }

    /// Reject the application (REVIEW → REJECTED).
    pub fn reject(&mut self, evidence: LicenseTransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Review, "REJECTED")?;
        self.do_transition(LicenseState::Rejected, &evidence.reason);
        Ok(())
    }

    /// Activate the license (ISSUED → ACTIVE).
    pub fn activate(&mut self, evidence: LicenseTransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Issued, "ACTIVE")?;
        self.do_transition(LicenseState::Active, &evidence.reason);
        Ok(())
    }

    /// Suspend the license (ACTIVE → SUSPENDED).
    pub fn suspend(&mut self, evidence: LicenseTransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Active, "SUSPENDED")?;
        self.do_transition(LicenseState::Suspended, &evidence.reason);
        Ok(())
    }

    /// Reinstate a suspended license (SUSPENDED → ACTIVE).
    pub fn reinstate(&mut self, evidence: LicenseTransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Suspended, "ACTIVE")?;
        self.do_transition(LicenseState::Active, &evidence.reason);
        Ok(())
    }

    /// Revoke the license permanently (ACTIVE or SUSPENDED → REVOKED).
    pub fn revoke(&mut self, evidence: LicenseTransitionEvidence) -> Result<(), LicenseError> {
        if self.state.is_terminal() {
            return Err(LicenseError::TerminalState {
                state: self.state.to_string(),
            });
        }
        if !matches!(self.state, LicenseState::Active | LicenseState::Suspended) {
            return Err(LicenseError::InvalidTransition {
                from: self.state.to_string(),
                to: "REVOKED".to_string(),
            });
        }
        self.do_transition(LicenseState::Revoked, &evidence.reason);
        Ok(())
    }

    /// Expire the license (ACTIVE → EXPIRED).
    ///
    /// Typically triggered by a deadline-based system check.
    pub fn expire(&mut self, evidence: LicenseTransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Active, "EXPIRED")?;
        self.do_transition(LicenseState::Expired, &evidence.reason);
        Ok(())
    }

    /// Whether the license is currently valid for operations.
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// Whether the license is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Content-addressed reference to this license record, for
    /// inclusion as a member artifact of a `licensepack`. Digested as
    /// `sha256(bytes)` over the serialized record — `licensepack` is an
    /// opaque byte container per spec §3's artifact-types table, not a
    /// JCS-canonicalized object.
    pub fn artifact_ref(&self) -> ArtifactRef {
        let bytes = serde_json::to_vec(self).expect("License always serializes");
        ArtifactRef::new("licensepack", &sha256_bytes(&bytes))
    }

    /// Validate that the license is in the expected state.
    fn require_state(&self, expected: LicenseState, target: &str) -> Result<(), LicenseError> {
        if self.state.is_terminal() {
            return Err(LicenseError::TerminalState {
                state: self.state.to_string(),
            });
        }
        if self.state != expected {
            return Err(LicenseError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    /// Record a state transition.
    fn do_transition(&mut self, to: LicenseState, reason: &str) {
        self.transitions.push(LicenseTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
