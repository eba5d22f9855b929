//! # Licensepack — Content-Addressed License Registry Snapshot
//!
//! Completes the pack trilogy alongside `lawpack` (static law) and
//! `regpack` (dynamic guidance): a `licensepack` is a content-addressed
//! snapshot of a jurisdiction's live licensing state, built from the
//! member [`msez_state::License`] lifecycle records it references.
//!
//! ## Implements
//!
//! Spec §15 — Licensepack structure and license lifecycle.

use std::collections::BTreeMap;

use msez_core::{sha256_bytes, ArtifactRef};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a license as recorded in a licensepack entry.
/// Distinct from `msez_state::LicenseState`: this is the compliance-
/// facing summary a licensepack consumer queries, while the FSM in
/// `msez-state` is the authoritative transition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Suspended,
    Revoked,
    Expired,
    Pending,
    Surrendered,
}

/// The regulatory domain a licensepack covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseDomain {
    Financial,
    Corporate,
    Professional,
    Trade,
    Insurance,
    Mixed,
}

/// The outcome of a compliance check against a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceState {
    Compliant,
    NonCompliant,
    Pending,
    Suspended,
    Unknown,
}

/// A permission granted by a license, scoping which activities the
/// holder may carry out and under what limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensePermission {
    pub permission_id: String,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `(limit_key, minor-unit threshold)`. Empty means unlimited.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: BTreeMap<String, i64>,
}

impl LicensePermission {
    /// Whether this permission covers `activity` and is currently active.
    pub fn permits_activity(&self, activity: &str) -> bool {
        self.activity == activity && self.status.as_deref().unwrap_or("active") == "active"
    }

    /// Whether `amount_minor_units` stays within this permission's limit
    /// for `limit_key`, if one is set.
    pub fn within_limits(&self, limit_key: &str, amount_minor_units: i64) -> bool {
        match self.limits.get(limit_key) {
            Some(&max) => amount_minor_units <= max,
            None => true,
        }
    }
}

/// A restriction narrowing where or how a license may be exercised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseRestriction {
    pub restriction_id: String,
    pub restriction_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_jurisdictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_jurisdictions: Vec<String>,
}

impl LicenseRestriction {
    pub fn blocks_activity(&self, activity: &str) -> bool {
        self.blocked_activities.iter().any(|a| a == activity)
    }

    /// A wildcard (`"*"`) block is lifted by an explicit entry in
    /// `allowed_jurisdictions`; an explicit block always applies.
    pub fn blocks_jurisdiction(&self, jurisdiction_id: &str) -> bool {
        if self.blocked_jurisdictions.iter().any(|j| j == jurisdiction_id) {
            return true;
        }
        if self.blocked_jurisdictions.iter().any(|j| j == "*") {
            return !self.allowed_jurisdictions.iter().any(|j| j == jurisdiction_id);
        }
        false
    }
}

/// The entity a license is issued to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseHolder {
    pub holder_id: String,
    pub entity_type: String,
    pub legal_name: String,
    pub registration_number: String,
    pub jurisdiction_of_incorporation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
}

/// A category of license a regulator issues, with its permitted
/// activities, independent of any specific holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseType {
    pub license_type_id: String,
    pub name: String,
    pub description: String,
    pub regulator_id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permitted_activities: Vec<String>,
}

/// The authority that issues and supervises a class of licenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regulator {
    pub regulator_id: String,
    pub name: String,
    pub jurisdiction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
}

/// A single license entry in a licensepack: the compliance-facing view
/// of a `msez_state::License`, keyed by its `license_id` and anchored
/// to that record's content digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub license_id: String,
    pub license_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    pub holder_id: String,
    pub holder_legal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_did: Option<String>,
    pub status: LicenseStatus,
    pub issued_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub regulator_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<LicensePermission>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<LicenseRestriction>,
    /// Content-addressed pointer to the authoritative `msez_state::License`
    /// lifecycle record this entry summarizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_ref: Option<ArtifactRef>,
}

impl License {
    pub fn is_active(&self) -> bool {
        self.status == LicenseStatus::Active
    }

    pub fn is_expired(&self, as_of: &str) -> bool {
        matches!(&self.expiry_date, Some(expiry) if expiry.as_str() < as_of)
    }

    pub fn permits_activity(&self, activity: &str) -> bool {
        self.permissions.iter().any(|p| p.permits_activity(activity))
    }
}

/// Licensepack-level metadata: jurisdiction, domain, and the snapshot
/// provenance that makes the pack's content addressing meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensepackMetadata {
    pub licensepack_id: String,
    pub jurisdiction_id: String,
    pub domain: LicenseDomain,
    pub as_of_date: String,
    pub snapshot_timestamp: String,
    pub snapshot_type: String,
    pub regulator: Regulator,
    pub license: String,
}

/// A content-addressed snapshot of a jurisdiction's license registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Licensepack {
    pub metadata: LicensepackMetadata,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub license_types: BTreeMap<String, LicenseType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub licenses: BTreeMap<String, License>,
}

impl Licensepack {
    pub fn new(metadata: LicensepackMetadata) -> Self {
        Self { metadata, license_types: BTreeMap::new(), licenses: BTreeMap::new() }
    }

    pub fn jurisdiction_id(&self) -> &str {
        &self.metadata.jurisdiction_id
    }

    pub fn add_license_type(&mut self, license_type: LicenseType) {
        self.license_types.insert(license_type.license_type_id.clone(), license_type);
    }

    pub fn add_license(&mut self, license: License) {
        self.licenses.insert(license.license_id.clone(), license);
    }

    pub fn get_license(&self, license_id: &str) -> Option<&License> {
        self.licenses.get(license_id)
    }

    pub fn licenses_by_holder_did(&self, did: &str) -> Vec<&License> {
        self.licenses.values().filter(|l| l.holder_did.as_deref() == Some(did)).collect()
    }

    pub fn active_licenses(&self) -> Vec<&License> {
        self.licenses.values().filter(|l| l.is_active()).collect()
    }

    /// Check whether `holder_did` holds an active, unrestricted license
    /// permitting `activity`.
    pub fn verify_license(&self, holder_did: &str, activity: &str) -> (bool, ComplianceState, Option<&License>) {
        let Some(license) = self.licenses_by_holder_did(holder_did).into_iter().find(|l| l.permits_activity(activity)) else {
            return (false, ComplianceState::NonCompliant, None);
        };
        if !license.is_active() {
            return (false, ComplianceState::Suspended, Some(license));
        }
        if license.restrictions.iter().any(|r| r.blocks_activity(activity)) {
            return (false, ComplianceState::NonCompliant, Some(license));
        }
        (true, ComplianceState::Compliant, Some(license))
    }

    /// Deterministic `sha256(bytes)` digest of the pack's serialized
    /// form — `licensepack` is an opaque byte container per spec §3,
    /// not a JCS-canonicalized object.
    pub fn compute_digest(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("Licensepack always serializes");
        sha256_bytes(&bytes).to_hex()
    }
}
