//! # Dispute Lifecycle
//!
//! Models the lifecycle of a dispute between corridor participants,
//! from filing through a tribunal's ruling.
//!
//! ## States
//!
//! `FILED -> RESPONSE -> HEARING -> RESOLVED | DISMISSED`
//!
//! ## Implements
//!
//! Spec §4.15 — Arbitration & Escrow: dispute request, evidence
//! package, ruling VC, enforcement receipt.

use msez_core::{CorridorId, DID};
use msez_vc::VerifiableCredential;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::money::Money;

/// Unique identifier for a dispute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId(pub Uuid);

impl DisputeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DisputeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispute:{}", self.0)
    }
}

/// An arbitration institution a dispute may be filed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Institution {
    DifcLcia,
    Siac,
    Icc,
    AifcIac,
}

impl Institution {
    /// Jurisdiction that seats this institution's tribunal.
    pub fn jurisdiction_id(&self) -> &'static str {
        match self {
            Institution::DifcLcia => "uae-difc",
            Institution::Siac => "sg",
            Institution::Icc => "fr-paris",
            Institution::AifcIac => "kaz-aifc",
        }
    }

    /// Institution's filing fee for a new case.
    pub fn filing_fee(&self) -> Money {
        match self {
            Institution::DifcLcia => Money::new(300_000, "USD"),
            Institution::Siac => Money::new(200_000, "SGD"),
            Institution::Icc => Money::new(500_000, "USD"),
            Institution::AifcIac => Money::new(250_000, "USD"),
        }
    }

    /// Whether awards from this institution are enforceable under the
    /// New York Convention (true for all four reference institutions).
    pub fn new_york_convention(&self) -> bool {
        true
    }
}

impl std::fmt::Display for Institution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Institution::DifcLcia => "difc-lcia",
            Institution::Siac => "siac",
            Institution::Icc => "icc",
            Institution::AifcIac => "aifc-iac",
        };
        f.write_str(name)
    }
}

/// The nature of the dispute being filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeType {
    BreachOfContract,
    NonConformingGoods,
    PaymentDefault,
    DeliveryFailure,
    QualityDefect,
    DocumentaryDiscrepancy,
    ForceMajeure,
    FraudulentMisrepresentation,
}

/// A party to a dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub party_id: DID,
    pub legal_name: String,
    pub jurisdiction_id: Option<String>,
}

/// A claim asserted by the claimant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub claim_type: DisputeType,
    pub description: String,
    pub amount: Option<Money>,
}

/// The state of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeState {
    /// Dispute has been filed.
    Filed,
    /// Respondent has been notified and may respond.
    Response,
    /// Hearing is in progress.
    Hearing,
    /// Dispute has been resolved with an award (terminal).
    Resolved,
    /// Dispute has been dismissed (terminal).
    Dismissed,
}

impl DisputeState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }
}

/// Raised when a dispute transition is attempted from a state that
/// does not permit it.
#[derive(Error, Debug)]
#[error("cannot {action} a dispute in state {from:?}")]
pub struct InvalidDisputeTransition {
    pub from: DisputeState,
    pub action: &'static str,
}

/// A dispute between corridor participants filed with an arbitration
/// institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub dispute_id: DisputeId,
    pub institution: Institution,
    pub corridor_id: CorridorId,
    pub claimant: Party,
    pub respondent: Party,
    pub dispute_type: DisputeType,
    pub claims: Vec<Claim>,
    pub state: DisputeState,
}

impl Dispute {
    /// File a new dispute, starting in `Filed`.
    pub fn file(
        institution: Institution,
        corridor_id: CorridorId,
        claimant: Party,
        respondent: Party,
        dispute_type: DisputeType,
        claims: Vec<Claim>,
    ) -> Self {
        Self {
            dispute_id: DisputeId::new(),
            institution,
            corridor_id,
            claimant,
            respondent,
            dispute_type,
            claims,
            state: DisputeState::Filed,
        }
    }

    /// Respondent has been notified and answers the claims: `Filed -> Response`.
    pub fn respond(&mut self) -> Result<(), InvalidDisputeTransition> {
        self.transition(DisputeState::Filed, DisputeState::Response, "respond to")
    }

    /// Tribunal opens the hearing: `Response -> Hearing`.
    pub fn open_hearing(&mut self) -> Result<(), InvalidDisputeTransition> {
        self.transition(DisputeState::Response, DisputeState::Hearing, "open a hearing on")
    }

    /// Tribunal issues a ruling, closing the dispute: `Hearing -> Resolved`.
    pub fn resolve(&mut self) -> Result<(), InvalidDisputeTransition> {
        self.transition(DisputeState::Hearing, DisputeState::Resolved, "resolve")
    }

    /// Dismiss the dispute from any non-terminal state.
    pub fn dismiss(&mut self) -> Result<(), InvalidDisputeTransition> {
        if self.state.is_terminal() {
            return Err(InvalidDisputeTransition { from: self.state, action: "dismiss" });
        }
        self.state = DisputeState::Dismissed;
        Ok(())
    }

    fn transition(
        &mut self,
        expected: DisputeState,
        next: DisputeState,
        action: &'static str,
    ) -> Result<(), InvalidDisputeTransition> {
        if self.state != expected {
            return Err(InvalidDisputeTransition { from: self.state, action });
        }
        self.state = next;
        Ok(())
    }
}

/// The disposition of a ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    InFavorOfClaimant,
    InFavorOfRespondent,
    PartiallyInFavorOfClaimant,
    PartiallyInFavorOfRespondent,
    Dismissed,
    Settled,
}

/// The type of award a ruling represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulingType {
    FinalAward,
    PartialAward,
    InterimAward,
    EmergencyOrder,
    ConsentAward,
}

/// The relief a tribunal order grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    MonetaryDamages,
    SpecificPerformance,
    Declaratory,
    Injunction,
    Costs,
    Interest,
}

/// How an order is to be realized once due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnforcementMethod {
    SmartAssetStateTransition,
    EscrowRelease,
    Manual,
    CourtEnforcement,
}

/// One obligation imposed by a ruling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub order_type: OrderType,
    pub obligor: DID,
    pub obligee: DID,
    pub amount: Option<Money>,
    pub enforcement_method: EnforcementMethod,
}

/// A tribunal's ruling on a dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruling {
    pub ruling_type: RulingType,
    pub disposition: Disposition,
    pub orders: Vec<Order>,
}

/// Render a ruling as a signable `MSEZArbitrationRulingCredential`.
///
/// The tribunal's DID is the issuer; the dispute and ruling are
/// serialized as-is into `credentialSubject`, the same open-subject
/// pattern `msez-vc`'s other credential builders use.
pub fn ruling_vc(dispute: &Dispute, ruling: &Ruling, case_reference: &str, tribunal_did: &DID) -> VerifiableCredential {
    let subject = serde_json::json!({
        "dispute_id": dispute.dispute_id.to_string(),
        "institution_id": dispute.institution.to_string(),
        "case_reference": case_reference,
        "corridor_id": dispute.corridor_id.to_string(),
        "parties": {
            "claimant": dispute.claimant,
            "respondent": dispute.respondent,
        },
        "ruling": ruling,
    });
    VerifiableCredential::new("MSEZArbitrationRulingCredential", tribunal_did.to_string(), subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> (Party, Party) {
        (
            Party { party_id: DID::parse("did:key:claimant").unwrap(), legal_name: "Acme Trading".into(), jurisdiction_id: None },
            Party { party_id: DID::parse("did:key:respondent").unwrap(), legal_name: "Globex Corp".into(), jurisdiction_id: None },
        )
    }

    fn filed_dispute() -> Dispute {
        let (claimant, respondent) = parties();
        Dispute::file(
            Institution::DifcLcia,
            CorridorId::new(),
            claimant,
            respondent,
            DisputeType::PaymentDefault,
            vec![Claim {
                claim_id: "claim-1".into(),
                claim_type: DisputeType::PaymentDefault,
                description: "unpaid invoice".into(),
                amount: Some(Money::new(100_000, "USD")),
            }],
        )
    }

    #[test]
    fn test_file_starts_in_filed_state() {
        assert_eq!(filed_dispute().state, DisputeState::Filed);
    }

    #[test]
    fn test_full_lifecycle_to_resolved() {
        let mut dispute = filed_dispute();
        dispute.respond().unwrap();
        dispute.open_hearing().unwrap();
        dispute.resolve().unwrap();
        assert_eq!(dispute.state, DisputeState::Resolved);
    }

    #[test]
    fn test_resolve_before_hearing_rejected() {
        let mut dispute = filed_dispute();
        assert!(dispute.resolve().is_err());
    }

    #[test]
    fn test_dismiss_from_response_allowed() {
        let mut dispute = filed_dispute();
        dispute.respond().unwrap();
        dispute.dismiss().unwrap();
        assert_eq!(dispute.state, DisputeState::Dismissed);
    }

    #[test]
    fn test_dismiss_after_resolved_rejected() {
        let mut dispute = filed_dispute();
        dispute.respond().unwrap();
        dispute.open_hearing().unwrap();
        dispute.resolve().unwrap();
        assert!(dispute.dismiss().is_err());
    }

    #[test]
    fn test_ruling_vc_carries_dispute_id() {
        let mut dispute = filed_dispute();
        dispute.respond().unwrap();
        dispute.open_hearing().unwrap();
        let ruling = Ruling {
            ruling_type: RulingType::FinalAward,
            disposition: Disposition::InFavorOfClaimant,
            orders: vec![],
        };
        let tribunal = DID::parse("did:key:tribunal").unwrap();
        let vc = ruling_vc(&dispute, &ruling, "DIFC-LCIA/2026/001", &tribunal);
        assert_eq!(vc.credential_subject["dispute_id"], dispute.dispute_id.to_string());
    }
}
