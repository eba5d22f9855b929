//! # Compliance Manifold
//!
//! A directed multigraph over jurisdiction profiles: nodes are
//! jurisdictions, edges are corridors carrying `{fee_schedule,
//! required_attestations, latency, capacity, active}`. Finds the
//! least-cost migration path with Dijkstra, weighting missing
//! attestations far above monetary fees so that a compliant-but-slower
//! route always beats a cheap-but-non-compliant one.
//!
//! ## Implements
//!
//! Spec §4.7 — Compliance Manifold.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use msez_core::{CorridorId, JurisdictionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Monetary cost of traversing a corridor, expressed in integer USD cents
/// so the canonical codec's float ban never bites the weight computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fee_usd_cents: u64,
}

/// One edge of the manifold: a corridor connecting two jurisdictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorEdge {
    pub corridor_id: CorridorId,
    pub from: JurisdictionId,
    pub to: JurisdictionId,
    pub fee_schedule: FeeSchedule,
    pub required_attestations: Vec<String>,
    pub latency_s: u64,
    pub capacity: u64,
    pub active: bool,
}

/// A required attestation type an asset does not yet hold, with a hint
/// for how to obtain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationGap {
    pub attestation_type: String,
    pub acquisition_hint: String,
}

/// Weights for the path-cost function `w = α·fee + β·gap_count + γ·latency`.
///
/// Defaults set `beta` orders of magnitude above `alpha`/`gamma` so that
/// even one missing attestation outweighs any realistic fee or latency
/// difference between routes.
#[derive(Debug, Clone, Copy)]
pub struct PathWeights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for PathWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1_000_000.0,
            gamma: 0.01,
        }
    }
}

/// Raised by `find_path` when no corridor sequence connects the endpoints.
#[derive(Debug, Error)]
#[error("no path from {from} to {to}")]
pub struct NoPathError {
    pub from: JurisdictionId,
    pub to: JurisdictionId,
}

/// A least-cost route through the manifold.
#[derive(Debug, Clone)]
pub struct Path {
    pub hops: Vec<CorridorId>,
    pub total_weight: f64,
}

fn acquisition_hint(attestation_type: &str) -> String {
    format!("obtain a {attestation_type} attestation from an accredited issuer")
}

/// A min-heap entry; ties break on lex-ordered `corridor_id` per spec.
struct Frontier {
    cost: f64,
    node: JurisdictionId,
    via_corridor: Option<CorridorId>,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.via_corridor == other.via_corridor
    }
}
impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse cost so the smallest cost pops first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.via_corridor.cmp(&self.via_corridor))
    }
}

/// Directed multigraph of jurisdictions connected by corridors.
#[derive(Debug, Clone, Default)]
pub struct ComplianceManifold {
    jurisdictions: HashSet<JurisdictionId>,
    edges: Vec<CorridorEdge>,
}

impl ComplianceManifold {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_jurisdiction(&mut self, id: JurisdictionId) {
        self.jurisdictions.insert(id);
    }

    pub fn add_corridor(&mut self, edge: CorridorEdge) {
        self.jurisdictions.insert(edge.from.clone());
        self.jurisdictions.insert(edge.to.clone());
        self.edges.push(edge);
    }

    /// Required attestation types on `edge` the asset doesn't already hold.
    pub fn attestation_gap(
        &self,
        edge: &CorridorEdge,
        asset_attestations: &HashSet<String>,
    ) -> Vec<AttestationGap> {
        edge.required_attestations
            .iter()
            .filter(|req| !asset_attestations.contains(*req))
            .map(|req| AttestationGap {
                attestation_type: req.clone(),
                acquisition_hint: acquisition_hint(req),
            })
            .collect()
    }

    fn edge_weight(
        &self,
        edge: &CorridorEdge,
        asset_attestations: &HashSet<String>,
        weights: &PathWeights,
    ) -> f64 {
        let fee = edge.fee_schedule.fee_usd_cents as f64 / 100.0;
        let gap_count = self.attestation_gap(edge, asset_attestations).len() as f64;
        weights.alpha * fee + weights.beta * gap_count + weights.gamma * edge.latency_s as f64
    }

    fn edges_from<'a>(&'a self, jurisdiction: &'a JurisdictionId) -> impl Iterator<Item = &'a CorridorEdge> {
        self.edges
            .iter()
            .filter(move |e| e.active && &e.from == jurisdiction)
    }

    /// Dijkstra's algorithm over the manifold. `None` distances (unvisited
    /// nodes) never participate in arithmetic — only popped frontier costs
    /// do, and the heap never holds an unreachable node.
    pub fn find_path(
        &self,
        from: &JurisdictionId,
        to: &JurisdictionId,
        asset_attestations: &HashSet<String>,
        weights: &PathWeights,
    ) -> Result<Path, NoPathError> {
        let mut best_cost: HashMap<JurisdictionId, f64> = HashMap::new();
        let mut came_from: HashMap<JurisdictionId, (JurisdictionId, CorridorId)> = HashMap::new();
        let mut heap = BinaryHeap::new();

        best_cost.insert(from.clone(), 0.0);
        heap.push(Frontier {
            cost: 0.0,
            node: from.clone(),
            via_corridor: None,
        });

        while let Some(Frontier { cost, node, .. }) = heap.pop() {
            if &node == to {
                let mut hops = Vec::new();
                let mut cursor = node.clone();
                while let Some((prev, corridor_id)) = came_from.get(&cursor) {
                    hops.push(corridor_id.clone());
                    cursor = prev.clone();
                }
                hops.reverse();
                return Ok(Path {
                    hops,
                    total_weight: cost,
                });
            }
            if cost > *best_cost.get(&node).unwrap_or(&f64::INFINITY) {
                continue;
            }

            for edge in self.edges_from(&node) {
                let next_cost = cost + self.edge_weight(edge, asset_attestations, weights);
                let improves = best_cost
                    .get(&edge.to)
                    .map(|&existing| next_cost < existing)
                    .unwrap_or(true);
                if improves {
                    best_cost.insert(edge.to.clone(), next_cost);
                    came_from.insert(edge.to.clone(), (node.clone(), edge.corridor_id.clone()));
                    heap.push(Frontier {
                        cost: next_cost,
                        node: edge.to.clone(),
                        via_corridor: Some(edge.corridor_id.clone()),
                    });
                }
            }
        }

        Err(NoPathError {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(_id: &str, from: &str, to: &str, fee_cents: u64, latency_s: u64, reqs: &[&str]) -> CorridorEdge {
        CorridorEdge {
            corridor_id: CorridorId::new(),
            from: JurisdictionId::new(from),
            to: JurisdictionId::new(to),
            fee_schedule: FeeSchedule { fee_usd_cents: fee_cents },
            required_attestations: reqs.iter().map(|s| s.to_string()).collect(),
            latency_s,
            capacity: 1_000_000,
            active: true,
        }
    }

    #[test]
    fn test_direct_path_found() {
        let mut manifold = ComplianceManifold::new();
        manifold.add_corridor(edge("a-b", "A", "B", 100, 10, &[]));
        let path = manifold
            .find_path(
                &JurisdictionId::new("A"),
                &JurisdictionId::new("B"),
                &HashSet::new(),
                &PathWeights::default(),
            )
            .unwrap();
        assert_eq!(path.hops.len(), 1);
    }

    #[test]
    fn test_missing_attestation_dominates_cheap_fee() {
        let mut manifold = ComplianceManifold::new();
        // Direct route is cheap but missing a required attestation.
        manifold.add_corridor(edge("a-b-direct", "A", "B", 1, 1, &["kyc-vc"]));
        // Longer route through C costs more in fees/latency but needs nothing.
        manifold.add_corridor(edge("a-c", "A", "C", 10_000, 500, &[]));
        manifold.add_corridor(edge("c-b", "C", "B", 10_000, 500, &[]));

        let path = manifold
            .find_path(
                &JurisdictionId::new("A"),
                &JurisdictionId::new("B"),
                &HashSet::new(),
                &PathWeights::default(),
            )
            .unwrap();
        assert_eq!(path.hops.len(), 2, "should route around the gated direct hop");
    }

    #[test]
    fn test_satisfied_attestation_allows_direct_route() {
        let mut manifold = ComplianceManifold::new();
        manifold.add_corridor(edge("a-b-direct", "A", "B", 1, 1, &["kyc-vc"]));
        manifold.add_corridor(edge("a-c", "A", "C", 10_000, 500, &[]));
        manifold.add_corridor(edge("c-b", "C", "B", 10_000, 500, &[]));

        let mut held = HashSet::new();
        held.insert("kyc-vc".to_string());

        let path = manifold
            .find_path(
                &JurisdictionId::new("A"),
                &JurisdictionId::new("B"),
                &held,
                &PathWeights::default(),
            )
            .unwrap();
        assert_eq!(path.hops.len(), 1);
    }

    #[test]
    fn test_unreachable_returns_no_path_error() {
        let mut manifold = ComplianceManifold::new();
        manifold.add_jurisdiction(JurisdictionId::new("A"));
        manifold.add_jurisdiction(JurisdictionId::new("Z"));
        let err = manifold
            .find_path(
                &JurisdictionId::new("A"),
                &JurisdictionId::new("Z"),
                &HashSet::new(),
                &PathWeights::default(),
            )
            .unwrap_err();
        assert_eq!(err.to.as_str(), "Z");
    }

    #[test]
    fn test_attestation_gap_reports_only_missing() {
        let manifold = ComplianceManifold::new();
        let e = edge("a-b", "A", "B", 0, 0, &["kyc-vc", "sanctions-vc"]);
        let mut held = HashSet::new();
        held.insert("kyc-vc".to_string());
        let gaps = manifold.attestation_gap(&e, &held);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].attestation_type, "sanctions-vc");
    }
}
