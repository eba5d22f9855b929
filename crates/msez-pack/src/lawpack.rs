//! # Lawpack — Statute to Machine-Readable Rules
//!
//! Translates legislative statutes (e.g., Income Tax Ordinance 2001,
//! Sales Tax Act 1990) into a content-addressed, machine-readable
//! rule set. Unlike `regpack`, which snapshots state that changes
//! daily or weekly, a lawpack tracks a statute's amendment history:
//! a new version supersedes the last, chained by digest.
//!
//! ## Implements
//!
//! Spec §10 — Lawpack structure, compilation, and canonicalization.

use msez_core::sha256_bytes;
use serde::{Deserialize, Serialize};

/// A single machine-readable rule compiled from statute text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub rule_id: String,
    /// The statute section this rule was compiled from (e.g. "s.113C").
    pub source_section: String,
    pub description: String,
    /// A structured condition expression, opaque to this crate — the
    /// rule engine that evaluates compliance owns its grammar.
    pub condition: serde_json::Value,
}

/// Lawpack-level metadata, including the supersession chain pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawpackMetadata {
    pub lawpack_id: String,
    pub jurisdiction_id: String,
    pub statute_name: String,
    pub statute_version: String,
    pub effective_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes_digest: Option<String>,
}

/// A compiled, content-addressed bundle of machine-readable rules
/// derived from a jurisdiction's legislative statutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lawpack {
    pub metadata: LawpackMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ComplianceRule>,
}

impl Lawpack {
    pub fn new(metadata: LawpackMetadata) -> Self {
        Self { metadata, rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: ComplianceRule) {
        self.rules.push(rule);
    }

    pub fn get_rule(&self, rule_id: &str) -> Option<&ComplianceRule> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }

    /// Whether this lawpack is a direct amendment of `previous`: its
    /// `supersedes_digest` must name `previous`'s own digest.
    pub fn supersedes(&self, previous: &Lawpack) -> bool {
        self.metadata.supersedes_digest.as_deref() == Some(previous.compute_digest().as_str())
    }

    /// Deterministic `sha256(bytes)` digest of the pack's serialized
    /// form — `lawpack` is an opaque byte container per spec §3, not a
    /// JCS-canonicalized object.
    pub fn compute_digest(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("Lawpack always serializes");
        sha256_bytes(&bytes).to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pack(version: &str, supersedes: Option<String>) -> Lawpack {
        let mut pack = Lawpack::new(LawpackMetadata {
            lawpack_id: format!("lawpack:pk-income-tax:{version}"),
            jurisdiction_id: "pk".into(),
            statute_name: "Income Tax Ordinance 2001".into(),
            statute_version: version.into(),
            effective_date: "2024-07-01".into(),
            supersedes_digest: supersedes,
        });
        pack.add_rule(ComplianceRule {
            rule_id: "s113c-minimum-tax".into(),
            source_section: "s.113C".into(),
            description: "Minimum tax on turnover for specified companies".into(),
            condition: serde_json::json!({"op": ">=", "field": "turnover", "value": 0}),
        });
        pack
    }

    #[test]
    fn test_add_and_get_rule() {
        let pack = sample_pack("2024.1", None);
        assert!(pack.get_rule("s113c-minimum-tax").is_some());
        assert!(pack.get_rule("nonexistent").is_none());
    }

    #[test]
    fn test_compute_digest_deterministic() {
        let pack = sample_pack("2024.1", None);
        assert_eq!(pack.compute_digest(), pack.compute_digest());
    }

    #[test]
    fn test_compute_digest_changes_with_version() {
        let a = sample_pack("2024.1", None);
        let b = sample_pack("2024.2", None);
        assert_ne!(a.compute_digest(), b.compute_digest());
    }

    #[test]
    fn test_supersedes_chain() {
        let v1 = sample_pack("2024.1", None);
        let v2 = sample_pack("2024.2", Some(v1.compute_digest()));
        assert!(v2.supersedes(&v1));
    }

    #[test]
    fn test_does_not_supersede_unrelated_pack() {
        let v1 = sample_pack("2024.1", None);
        let unrelated = sample_pack("2024.2", Some("deadbeef".into()));
        assert!(!unrelated.supersedes(&v1));
    }
}
