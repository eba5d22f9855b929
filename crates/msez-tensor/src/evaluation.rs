//! # Domain Evaluation
//!
//! Maps raw rule outcomes to a `ComplianceState` per `ComplianceDomain`,
//! and evaluates a full tensor row (all domains for one asset/jurisdiction/
//! time_quantum) in one pass so that no domain is silently skipped.
//!
//! ## Implements
//!
//! Spec §4.6 — Compliance tensor cell evaluation.

use msez_core::{ArtifactRef, ComplianceDomain};

use crate::tensor::{ComplianceCell, ComplianceState};

/// The raw facts an evaluator needs to decide one domain's state.
#[derive(Debug, Clone, Default)]
pub struct DomainEvaluationInput {
    /// The domain has an explicit jurisdictional exemption on file.
    pub exempt: bool,
    /// At least one attestation covering this domain has been presented.
    pub attestation_present: bool,
    /// The most recent attestation covering this domain has expired.
    pub attestation_expired: bool,
    /// Attestations backing the current state, carried into the cell.
    pub attestations: Vec<ArtifactRef>,
    /// Machine reason code, if the state isn't simply COMPLIANT.
    pub reason_code: Option<String>,
}

/// Evaluate one domain's compliance state from raw facts.
///
/// `EXEMPT` wins outright (a jurisdiction exemption overrides missing or
/// expired evidence). Otherwise: no attestation ever presented → `UNKNOWN`
/// (fail-safe, per spec §8 property 8); an expired attestation → `EXPIRED`;
/// a present, unexpired attestation → `COMPLIANT`.
pub fn evaluate_domain(input: &DomainEvaluationInput) -> ComplianceState {
    if input.exempt {
        ComplianceState::Exempt
    } else if !input.attestation_present {
        ComplianceState::Unknown
    } else if input.attestation_expired {
        ComplianceState::Expired
    } else {
        ComplianceState::Compliant
    }
}

/// Evaluate every one of the 20 compliance domains for a single
/// `(asset, jurisdiction, time_quantum)` coordinate, returning one cell
/// per domain. Iterating `ComplianceDomain::all_domains()` rather than a
/// hand-written match keeps this exhaustive even as domains are added.
pub fn evaluate_all_domains(
    inputs: impl Fn(ComplianceDomain) -> DomainEvaluationInput,
    last_update: msez_core::Timestamp,
) -> Vec<(ComplianceDomain, ComplianceCell)> {
    ComplianceDomain::all_domains()
        .iter()
        .map(|&domain| {
            let input = inputs(domain);
            let state = evaluate_domain(&input);
            (
                domain,
                ComplianceCell {
                    state,
                    reason_code: input.reason_code,
                    attestations: input.attestations,
                    last_update,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::Timestamp;

    #[test]
    fn test_no_attestation_is_unknown_not_compliant() {
        let input = DomainEvaluationInput::default();
        assert_eq!(evaluate_domain(&input), ComplianceState::Unknown);
    }

    #[test]
    fn test_exemption_overrides_everything() {
        let input = DomainEvaluationInput {
            exempt: true,
            attestation_expired: true,
            ..Default::default()
        };
        assert_eq!(evaluate_domain(&input), ComplianceState::Exempt);
    }

    #[test]
    fn test_expired_attestation() {
        let input = DomainEvaluationInput {
            attestation_present: true,
            attestation_expired: true,
            ..Default::default()
        };
        assert_eq!(evaluate_domain(&input), ComplianceState::Expired);
    }

    #[test]
    fn test_present_unexpired_is_compliant() {
        let input = DomainEvaluationInput {
            attestation_present: true,
            ..Default::default()
        };
        assert_eq!(evaluate_domain(&input), ComplianceState::Compliant);
    }

    #[test]
    fn test_evaluate_all_domains_covers_every_domain() {
        let results = evaluate_all_domains(|_| DomainEvaluationInput::default(), Timestamp::now());
        assert_eq!(results.len(), ComplianceDomain::all_domains().len());
    }
}
