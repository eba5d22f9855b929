//! # Regpack — Dynamic Regulatory State
//!
//! Captures regulatory state that changes too often for a `lawpack`
//! snapshot to be practical: sanctions lists, license-type catalogs,
//! reporting requirements, and upcoming compliance deadlines.
//!
//! ## Implements
//!
//! Spec §11 — Regpack structure and regulatory mapping.

use std::collections::BTreeMap;

use msez_core::sha256_bytes;
use serde::{Deserialize, Serialize};

/// A single entry in a consolidated sanctions list (OFAC/EU/UN/UK).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsEntry {
    pub entry_id: String,
    pub entry_type: String,
    pub source_lists: Vec<String>,
    pub primary_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nationalities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub programs: Vec<String>,
}

/// A regulatory authority profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorProfile {
    pub regulator_id: String,
    pub name: String,
    pub jurisdiction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_authority: Option<String>,
    pub timezone: String,
}

/// A periodic reporting obligation a regulator imposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingRequirement {
    pub report_type_id: String,
    pub name: String,
    pub regulator_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applicable_to: Vec<String>,
    pub frequency: String,
}

/// A scheduled compliance deadline: a report, filing, renewal, or payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceDeadline {
    pub deadline_id: String,
    pub regulator_id: String,
    pub deadline_type: String,
    pub description: String,
    pub due_date: String,
    #[serde(default)]
    pub grace_period_days: u32,
}

/// Regpack-level metadata, including the lineage pointer to the prior
/// snapshot's digest for delta computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegpackMetadata {
    pub regpack_id: String,
    pub jurisdiction_id: String,
    pub domain: String,
    pub as_of_date: String,
    pub snapshot_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_regpack_digest: Option<String>,
}

/// The result of checking a name (and optional identifiers) against a
/// regpack's consolidated sanctions entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SanctionsMatch {
    pub entry_id: String,
    pub match_type: SanctionsMatchType,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanctionsMatchType {
    ExactName,
    FuzzyName,
    Identifier,
}

/// Normalize for matching: lowercase, strip punctuation, collapse
/// whitespace — mirrors the regulator screening normalization rule
/// every sanctions source applies before comparison.
fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Token-overlap fuzzy score in `[0.0, 1.0]`: 1.0 for an exact
/// normalized match, 0.9 for a substring containment, otherwise the
/// Jaccard index of whitespace-split tokens.
fn fuzzy_score(query: &str, target: &str) -> f64 {
    let query = normalize(query);
    let target = normalize(target);
    if query == target {
        return 1.0;
    }
    if target.contains(&query) || query.contains(&target) {
        return 0.9;
    }
    let q_tokens: std::collections::BTreeSet<&str> = query.split_whitespace().collect();
    let t_tokens: std::collections::BTreeSet<&str> = target.split_whitespace().collect();
    if q_tokens.is_empty() || t_tokens.is_empty() {
        return 0.0;
    }
    let overlap = q_tokens.intersection(&t_tokens).count();
    let union = q_tokens.union(&t_tokens).count();
    overlap as f64 / union as f64
}

/// A content-addressed snapshot of dynamic regulatory state for a
/// jurisdiction/domain pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regpack {
    pub metadata: RegpackMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sanctions_entries: Vec<SanctionsEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub regulators: BTreeMap<String, RegulatorProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reporting_requirements: Vec<ReportingRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deadlines: Vec<ComplianceDeadline>,
}

impl Regpack {
    pub fn new(metadata: RegpackMetadata) -> Self {
        Self {
            metadata,
            sanctions_entries: Vec::new(),
            regulators: BTreeMap::new(),
            reporting_requirements: Vec::new(),
            deadlines: Vec::new(),
        }
    }

    pub fn add_sanctions_entry(&mut self, entry: SanctionsEntry) {
        self.sanctions_entries.push(entry);
    }

    pub fn add_regulator(&mut self, regulator: RegulatorProfile) {
        self.regulators.insert(regulator.regulator_id.clone(), regulator);
    }

    /// Screen `name` (and any known identifiers) against this pack's
    /// consolidated sanctions entries, returning all matches at or
    /// above `threshold`, deduplicated by entry and ranked highest
    /// score first.
    pub fn check_sanctions(&self, name: &str, identifiers: &[&str], threshold: f64) -> Vec<SanctionsMatch> {
        let mut matches: BTreeMap<String, SanctionsMatch> = BTreeMap::new();
        for entry in &self.sanctions_entries {
            let mut best: Option<SanctionsMatch> = None;
            if normalize(&entry.primary_name) == normalize(name) {
                best = Some(SanctionsMatch { entry_id: entry.entry_id.clone(), match_type: SanctionsMatchType::ExactName, score: 1.0 });
            } else {
                let score = entry
                    .aliases
                    .iter()
                    .chain(std::iter::once(&entry.primary_name))
                    .map(|candidate| fuzzy_score(name, candidate))
                    .fold(0.0_f64, f64::max);
                if score >= threshold {
                    best = Some(SanctionsMatch { entry_id: entry.entry_id.clone(), match_type: SanctionsMatchType::FuzzyName, score });
                }
            }
            if identifiers.iter().any(|id| entry.identifiers.iter().any(|known| known.eq_ignore_ascii_case(id))) {
                best = Some(SanctionsMatch { entry_id: entry.entry_id.clone(), match_type: SanctionsMatchType::Identifier, score: 1.0 });
            }
            if let Some(m) = best {
                matches
                    .entry(entry.entry_id.clone())
                    .and_modify(|existing| if m.score > existing.score { *existing = m.clone() })
                    .or_insert(m);
            }
        }
        let mut results: Vec<SanctionsMatch> = matches.into_values().collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        results
    }

    /// Deterministic `sha256(bytes)` digest of the pack's serialized
    /// form — `regpack` is an opaque byte container per spec §3, not a
    /// JCS-canonicalized object.
    pub fn compute_digest(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("Regpack always serializes");
        sha256_bytes(&bytes).to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pack() -> Regpack {
        let mut pack = Regpack::new(RegpackMetadata {
            regpack_id: "regpack:uae-adgm:financial:2024-01-15".into(),
            jurisdiction_id: "uae-adgm".into(),
            domain: "financial".into(),
            as_of_date: "2024-01-15".into(),
            snapshot_type: "on_demand".into(),
            previous_regpack_digest: None,
        });
        pack.add_sanctions_entry(SanctionsEntry {
            entry_id: "OFAC-001".into(),
            entry_type: "entity".into(),
            source_lists: vec!["ofac_sdn".into()],
            primary_name: "Acme Shell Corp".into(),
            aliases: vec!["Acme Shell Co".into()],
            identifiers: vec!["REG-123".into()],
            nationalities: Vec::new(),
            programs: vec!["SDGT".into()],
        });
        pack
    }

    #[test]
    fn test_exact_name_match() {
        let pack = sample_pack();
        let matches = pack.check_sanctions("Acme Shell Corp", &[], 0.7);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, SanctionsMatchType::ExactName);
        assert_eq!(matches[0].score, 1.0);
    }

    #[test]
    fn test_fuzzy_alias_match_above_threshold() {
        let pack = sample_pack();
        let matches = pack.check_sanctions("acme shell co", &[], 0.7);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_no_match_below_threshold() {
        let pack = sample_pack();
        let matches = pack.check_sanctions("Totally Different Entity", &[], 0.7);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_identifier_match_overrides_low_name_score() {
        let pack = sample_pack();
        let matches = pack.check_sanctions("Unrelated Name", &["reg-123"], 0.7);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, SanctionsMatchType::Identifier);
    }

    #[test]
    fn test_compute_digest_deterministic() {
        let pack = sample_pack();
        assert_eq!(pack.compute_digest(), pack.compute_digest());
    }

    #[test]
    fn test_compute_digest_changes_with_new_entry() {
        let mut pack = sample_pack();
        let before = pack.compute_digest();
        pack.add_sanctions_entry(SanctionsEntry {
            entry_id: "OFAC-002".into(),
            entry_type: "individual".into(),
            source_lists: vec!["ofac_sdn".into()],
            primary_name: "Jane Doe".into(),
            aliases: Vec::new(),
            identifiers: Vec::new(),
            nationalities: Vec::new(),
            programs: Vec::new(),
        });
        assert_ne!(before, pack.compute_digest());
    }
}
