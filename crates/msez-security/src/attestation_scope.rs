//! # Scope-Bound Attestation Replay Prevention
//!
//! An attestation presented for one `(subject, domain, time_quantum)`
//! scope must not be replayable against a different scope. Presenting
//! the same attestation again for the *same* scope is a harmless retry
//! (idempotent), not an attack — only cross-scope reuse is rejected.
//!
//! ## Implements
//!
//! Grounded on `original_source/tools/phoenix/security.py`'s
//! "Attestation Replay Prevention - scope-bound attestations" primitive.

use std::collections::HashMap;

use msez_core::ComplianceDomain;
use serde::{Deserialize, Serialize};

use crate::error::SecurityError;

/// The scope an attestation is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttestationScope {
    pub subject: String,
    pub domain: ComplianceDomain,
    pub time_quantum: String,
}

/// Tracks which scope each attestation digest has been bound to.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    bindings: HashMap<String, AttestationScope>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `attestation_ref` to `scope`. The first presentation for a
    /// given attestation digest establishes its scope; any later
    /// presentation under a *different* scope is rejected as replay.
    pub fn bind(&mut self, attestation_ref: &str, scope: AttestationScope) -> Result<(), SecurityError> {
        match self.bindings.get(attestation_ref) {
            Some(existing) if existing != &scope => Err(SecurityError::ScopeMismatch {
                attestation_ref: attestation_ref.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.bindings.insert(attestation_ref.to_string(), scope);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(subject: &str, quantum: &str) -> AttestationScope {
        AttestationScope {
            subject: subject.to_string(),
            domain: ComplianceDomain::all_domains()[0],
            time_quantum: quantum.to_string(),
        }
    }

    #[test]
    fn test_first_binding_accepted() {
        let mut registry = ScopeRegistry::new();
        assert!(registry.bind("att-1", scope("asset-1", "2026-07")).is_ok());
    }

    #[test]
    fn test_same_scope_rebind_is_idempotent() {
        let mut registry = ScopeRegistry::new();
        registry.bind("att-1", scope("asset-1", "2026-07")).unwrap();
        assert!(registry.bind("att-1", scope("asset-1", "2026-07")).is_ok());
    }

    #[test]
    fn test_cross_scope_replay_rejected() {
        let mut registry = ScopeRegistry::new();
        registry.bind("att-1", scope("asset-1", "2026-07")).unwrap();
        let err = registry.bind("att-1", scope("asset-2", "2026-07")).unwrap_err();
        assert!(matches!(err, SecurityError::ScopeMismatch { .. }));
    }

    #[test]
    fn test_different_time_quantum_is_cross_scope() {
        let mut registry = ScopeRegistry::new();
        registry.bind("att-1", scope("asset-1", "2026-07")).unwrap();
        let err = registry.bind("att-1", scope("asset-1", "2026-08")).unwrap_err();
        assert!(matches!(err, SecurityError::ScopeMismatch { .. }));
    }
}
