//! # Audit Logging
//!
//! A hash-chained audit log: each entry commits to the digest of the
//! entry before it, so the sequence cannot be reordered or have an
//! entry removed from the middle without breaking the chain.
//!
//! Grounded on `original_source/tools/phoenix/security.py`'s
//! "Audit Logging" primitive, elevating the placeholder previously
//! carried in `msez-agentic::audit`.

use msez_core::{sha256_bytes, ContentDigest, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor: String,
    pub action: String,
    pub detail: String,
    pub at: Timestamp,
    pub prev_digest: Option<ContentDigest>,
}

impl AuditEntry {
    fn canonical_bytes(&self) -> Vec<u8> {
        let prev = self
            .prev_digest
            .as_ref()
            .map(|d| d.to_hex())
            .unwrap_or_default();
        format!("{}|{}|{}|{}|{}", self.actor, self.action, self.detail, self.at.to_iso8601(), prev).into_bytes()
    }

    pub fn digest(&self) -> ContentDigest {
        sha256_bytes(&self.canonical_bytes())
    }
}

/// An append-only, hash-chained audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actor: impl Into<String>, action: impl Into<String>, detail: impl Into<String>, at: Timestamp) -> ContentDigest {
        let prev_digest = self.entries.last().map(|e| e.digest());
        let entry = AuditEntry {
            actor: actor.into(),
            action: action.into(),
            detail: detail.into(),
            at,
            prev_digest,
        };
        let digest = entry.digest();
        self.entries.push(entry);
        digest
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Verifies that every entry's `prev_digest` matches the digest of
    /// its predecessor, confirming the chain has not been tampered with.
    pub fn verify_chain(&self) -> bool {
        for (i, entry) in self.entries.iter().enumerate() {
            let expected_prev = if i == 0 { None } else { Some(self.entries[i - 1].digest()) };
            if entry.prev_digest != expected_prev {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_has_no_predecessor() {
        let mut log = AuditLog::new();
        log.record("alice", "bond.slash", "equivocation", Timestamp::now());
        assert!(log.entries()[0].prev_digest.is_none());
    }

    #[test]
    fn test_chain_links_successive_entries() {
        let mut log = AuditLog::new();
        log.record("alice", "bond.slash", "equivocation", Timestamp::now());
        log.record("bob", "bond.withdraw", "", Timestamp::now());
        assert!(log.verify_chain());
    }

    #[test]
    fn test_tampered_entry_breaks_chain() {
        let mut log = AuditLog::new();
        log.record("alice", "bond.slash", "equivocation", Timestamp::now());
        log.record("bob", "bond.withdraw", "", Timestamp::now());
        log.entries[1].detail = "tampered".to_string();
        assert!(!log.verify_chain());
    }
}
