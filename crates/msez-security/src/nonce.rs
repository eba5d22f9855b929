//! # Nonce Management
//!
//! Each principal (DID) presents a monotonically-unique nonce with every
//! state-changing request. A nonce seen twice for the same principal is
//! replay and is rejected outright.
//!
//! Grounded on `original_source/tools/phoenix/security.py`'s
//! "Nonce Management" primitive.

use std::collections::{HashMap, HashSet};

use msez_core::DID;

use crate::error::SecurityError;

#[derive(Debug, Clone, Default)]
pub struct NonceRegistry {
    used: HashMap<DID, HashSet<String>>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `nonce` for `principal`. Errors if this exact nonce was
    /// already consumed by this principal.
    pub fn consume(&mut self, principal: &DID, nonce: &str) -> Result<(), SecurityError> {
        let seen = self.used.entry(principal.clone()).or_default();
        if !seen.insert(nonce.to_string()) {
            return Err(SecurityError::NonceReplayed {
                principal: principal.as_str().to_string(),
                nonce: nonce.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn did(s: &str) -> DID {
        DID::parse(s).unwrap()
    }

    #[test]
    fn test_first_use_accepted() {
        let mut registry = NonceRegistry::new();
        assert!(registry.consume(&did("did:msez:alice"), "n1").is_ok());
    }

    #[test]
    fn test_replayed_nonce_rejected() {
        let mut registry = NonceRegistry::new();
        registry.consume(&did("did:msez:alice"), "n1").unwrap();
        let err = registry.consume(&did("did:msez:alice"), "n1").unwrap_err();
        assert!(matches!(err, SecurityError::NonceReplayed { .. }));
    }

    #[test]
    fn test_same_nonce_different_principal_is_not_replay() {
        let mut registry = NonceRegistry::new();
        registry.consume(&did("did:msez:alice"), "n1").unwrap();
        assert!(registry.consume(&did("did:msez:bob"), "n1").is_ok());
    }
}
