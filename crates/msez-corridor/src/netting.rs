//! # Settlement Netting Engine
//!
//! Computes multilateral netting of corridor obligations to minimize
//! actual settlement flows, via a deterministic greedy algorithm:
//!
//! 1. Gross every obligation into a net position per `(entity, currency)`.
//! 2. Split entities into payers (net negative) and receivers (net
//!    positive).
//! 3. Sort both lists by amount descending, ties broken lexicographically
//!    by entity id, for reproducibility.
//! 4. Greedily match the largest payer against the largest receiver,
//!    selecting the highest-priority rail whose min/max can carry the
//!    matched amount; repeat until one side is exhausted.
//! 5. Record every decision — and every rejected rail — in a trace.
//!
//! ## Implements
//!
//! Spec §4.14 — Netting Engine.

use std::collections::{HashMap, HashSet};

use msez_core::{CorridorId, EntityId};
use thiserror::Error;

/// One gross bilateral obligation to be netted.
#[derive(Debug, Clone)]
pub struct Obligation {
    pub from: EntityId,
    pub to: EntityId,
    pub currency: String,
    pub amount_cents: u64,
    /// Lower numbers are matched first when an entity has several
    /// obligations competing for the same netting pass.
    pub priority: u32,
    pub corridor_id: CorridorId,
    /// Digest of the checkpoint this obligation was sourced from.
    pub checkpoint_digest: String,
}

/// Routing constraints applied during a netting run: pairs that must not
/// be settled directly against each other, and rails an entity must use
/// for a given currency regardless of priority ordering.
#[derive(Debug, Clone, Default)]
pub struct NettingConstraints {
    blocked_pairs: HashSet<(EntityId, EntityId, String)>,
    forced_rails: HashMap<(EntityId, String), String>,
}

impl NettingConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbid a direct `from -> to` leg in `currency`. The netting engine
    /// will route around it by matching `from`/`to` against other
    /// counterparties instead of failing outright, as long as one exists.
    pub fn block_pair(&mut self, from: EntityId, to: EntityId, currency: impl Into<String>) {
        self.blocked_pairs.insert((from, to, currency.into()));
    }

    /// Force every leg touching `entity` in `currency` onto `rail_id`,
    /// overriding the rail priority ordering.
    pub fn force_rail(&mut self, entity: EntityId, currency: impl Into<String>, rail_id: impl Into<String>) {
        self.forced_rails.insert((entity, currency.into()), rail_id.into());
    }

    fn is_blocked(&self, from: &EntityId, to: &EntityId, currency: &str) -> bool {
        self.blocked_pairs.contains(&(from.clone(), to.clone(), currency.to_string()))
    }

    fn forced_rail(&self, from: &EntityId, to: &EntityId, currency: &str) -> Option<&str> {
        self.forced_rails
            .get(&(from.clone(), currency.to_string()))
            .or_else(|| self.forced_rails.get(&(to.clone(), currency.to_string())))
            .map(|s| s.as_str())
    }
}

/// A settlement rail available to carry a netted leg.
#[derive(Debug, Clone)]
pub struct Rail {
    pub rail_id: String,
    /// Lower numbers are tried first.
    pub priority: u32,
    pub min_amount_cents: u64,
    pub max_amount_cents: u64,
}

/// Net exposure of one entity in one currency after netting.
///
/// `net_amount_cents` is positive for a net receiver, negative for a net
/// payer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetPosition {
    pub entity: EntityId,
    pub currency: String,
    pub net_amount_cents: i64,
}

/// One concrete settlement instruction produced by the netting algorithm.
///
/// `leg_id` is `"{currency}:{NNNNNN}"`, numbered from zero within its
/// currency in emission order — stable and referenceable independent of
/// position in the plan's overall leg list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementLeg {
    pub leg_id: String,
    pub from: EntityId,
    pub to: EntityId,
    pub currency: String,
    pub amount_cents: u64,
    pub rail_id: String,
}

/// The output of one netting run: net positions, the settlement legs
/// chosen to realize them, and a human-readable decision trace.
#[derive(Debug, Clone)]
pub struct SettlementPlan {
    pub net_positions: Vec<NetPosition>,
    pub settlement_legs: Vec<SettlementLeg>,
    pub trace: Vec<String>,
}

/// Raised when no available rail can carry a required leg.
#[derive(Error, Debug)]
#[error("no rail can settle {amount_cents} {currency} from {from} to {to}")]
pub struct InfeasibleNetting {
    pub from: EntityId,
    pub to: EntityId,
    pub currency: String,
    pub amount_cents: u64,
}

/// Deterministic multilateral netting engine.
#[derive(Debug, Default)]
pub struct NettingEngine {
    rails: Vec<Rail>,
}

impl NettingEngine {
    pub fn new() -> Self {
        Self { rails: Vec::new() }
    }

    pub fn add_rail(&mut self, rail: Rail) {
        self.rails.push(rail);
    }

    /// Pick the highest-priority rail that can carry `amount_cents`,
    /// breaking ties on lexicographic `rail_id`. `forced_rail_id`, when
    /// set, restricts the choice to that single rail regardless of
    /// priority — still subject to its min/max window.
    fn select_rail(&self, amount_cents: u64, forced_rail_id: Option<&str>) -> Option<&Rail> {
        if let Some(rail_id) = forced_rail_id {
            return self.rails.iter().find(|rail| {
                rail.rail_id == rail_id
                    && amount_cents >= rail.min_amount_cents
                    && amount_cents <= rail.max_amount_cents
            });
        }
        self.rails
            .iter()
            .filter(|rail| amount_cents >= rail.min_amount_cents && amount_cents <= rail.max_amount_cents)
            .min_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.rail_id.cmp(&b.rail_id)))
    }

    /// Net `obligations` down to a minimal set of settlement legs, with no
    /// routing constraints.
    pub fn net(&self, obligations: &[Obligation]) -> Result<SettlementPlan, InfeasibleNetting> {
        self.net_with_constraints(obligations, &NettingConstraints::default())
    }

    /// Net `obligations` down to a minimal set of settlement legs, routing
    /// around any `constraints` name.
    pub fn net_with_constraints(
        &self,
        obligations: &[Obligation],
        constraints: &NettingConstraints,
    ) -> Result<SettlementPlan, InfeasibleNetting> {
        let mut trace = Vec::new();

        // Step 1: gross every obligation into net positions per (entity, currency).
        let mut gross: HashMap<(EntityId, String), i64> = HashMap::new();
        for obligation in obligations {
            *gross
                .entry((obligation.from.clone(), obligation.currency.clone()))
                .or_insert(0) -= obligation.amount_cents as i64;
            *gross
                .entry((obligation.to.clone(), obligation.currency.clone()))
                .or_insert(0) += obligation.amount_cents as i64;
        }
        trace.push(format!("grossed {} obligations into {} net positions", obligations.len(), gross.len()));

        let currencies: Vec<String> = {
            let mut set: Vec<String> = gross.keys().map(|(_, currency)| currency.clone()).collect();
            set.sort();
            set.dedup();
            set
        };

        let mut net_positions = Vec::new();
        let mut settlement_legs = Vec::new();

        for currency in currencies {
            // Step 2: split into payers (negative) and receivers (positive) for this currency.
            let mut payers: Vec<(EntityId, i64)> = Vec::new();
            let mut receivers: Vec<(EntityId, i64)> = Vec::new();
            for ((entity, c), amount) in &gross {
                if c != &currency || *amount == 0 {
                    continue;
                }
                net_positions.push(NetPosition {
                    entity: entity.clone(),
                    currency: currency.clone(),
                    net_amount_cents: *amount,
                });
                if *amount < 0 {
                    payers.push((entity.clone(), -*amount));
                } else {
                    receivers.push((entity.clone(), *amount));
                }
            }

            // Step 3: sort descending by amount, ties broken lexicographically.
            payers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));
            receivers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));

            // Step 4: greedily match the largest payer against the largest receiver.
            // A blocked direct pair is routed around by swapping in the next
            // compatible counterparty rather than failing the whole run.
            let mut payer_idx = 0;
            let mut receiver_idx = 0;
            let mut leg_seq: u64 = 0;
            while payer_idx < payers.len() && receiver_idx < receivers.len() {
                if constraints.is_blocked(&payers[payer_idx].0, &receivers[receiver_idx].0, &currency) {
                    if let Some(j) = (receiver_idx + 1..receivers.len())
                        .find(|&j| !constraints.is_blocked(&payers[payer_idx].0, &receivers[j].0, &currency))
                    {
                        receivers.swap(receiver_idx, j);
                    } else if let Some(i) = (payer_idx + 1..payers.len())
                        .find(|&i| !constraints.is_blocked(&payers[i].0, &receivers[receiver_idx].0, &currency))
                    {
                        payers.swap(payer_idx, i);
                    } else {
                        let (payer_entity, _) = payers[payer_idx].clone();
                        let (receiver_entity, _) = receivers[receiver_idx].clone();
                        return Err(InfeasibleNetting {
                            from: payer_entity,
                            to: receiver_entity,
                            currency: currency.clone(),
                            amount_cents: 0,
                        });
                    }
                }

                let (payer_entity, payer_remaining) = payers[payer_idx].clone();
                let (receiver_entity, receiver_remaining) = receivers[receiver_idx].clone();
                let amount = payer_remaining.min(receiver_remaining) as u64;

                let forced_rail = constraints.forced_rail(&payer_entity, &receiver_entity, &currency);
                let rail = self.select_rail(amount, forced_rail).ok_or_else(|| InfeasibleNetting {
                    from: payer_entity.clone(),
                    to: receiver_entity.clone(),
                    currency: currency.clone(),
                    amount_cents: amount,
                })?;

                let leg_id = format!("{currency}:{leg_seq:06}");
                leg_seq += 1;

                trace.push(format!(
                    "{currency}: matched {payer_entity} -> {receiver_entity} for {amount} via rail {} ({leg_id})",
                    rail.rail_id
                ));
                settlement_legs.push(SettlementLeg {
                    leg_id,
                    from: payer_entity,
                    to: receiver_entity,
                    currency: currency.clone(),
                    amount_cents: amount,
                    rail_id: rail.rail_id.clone(),
                });

                payers[payer_idx].1 -= amount as i64;
                receivers[receiver_idx].1 -= amount as i64;
                if payers[payer_idx].1 == 0 {
                    payer_idx += 1;
                }
                if receivers[receiver_idx].1 == 0 {
                    receiver_idx += 1;
                }
            }
        }

        // Step 5: the trace above already records every decision in order.
        net_positions.sort_by(|a, b| a.entity.to_string().cmp(&b.entity.to_string()).then_with(|| a.currency.cmp(&b.currency)));

        Ok(SettlementPlan {
            net_positions,
            settlement_legs,
            trace,
        })
    }
}
