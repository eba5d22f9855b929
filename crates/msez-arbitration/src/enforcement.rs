//! # Award Enforcement
//!
//! Realizes a ruling's orders: either by scheduling a smart-asset
//! state transition (via the corridor bridge/saga layer) or by
//! releasing/forfeiting escrow. This module only derives which
//! mechanism an order resolves to and records the resulting receipt;
//! driving the bridge or saga orchestrator is the caller's job.
//!
//! ## Implements
//!
//! Spec §4.15 — Arbitration & Escrow: enforcement receipt.

use msez_core::{CorridorId, Timestamp};
use msez_vc::{VcError, VerifiableCredential};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dispute::{EnforcementMethod, Order, OrderType};
use crate::money::Money;

/// The concrete action an order's enforcement resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnforcementAction {
    /// Transfer funds from `from` to `to` via a smart-asset transition.
    Transfer { from: String, to: String, amount_cents: i64, currency: String },
    /// Halt further transitions on the obligor's asset.
    Halt,
    /// Release or forfeit the named escrow account.
    EscrowAction { escrow_id: Uuid },
    /// No automated mechanism; enforced outside the stack.
    Manual,
}

impl EnforcementAction {
    /// Derive the enforcement action implied by `order`: an
    /// escrow-backed order always resolves to an escrow action
    /// regardless of order type; otherwise monetary damages become a
    /// transfer, injunctions a halt, and everything else manual.
    pub fn from_order(order: &Order, escrow_id: Option<Uuid>) -> Self {
        if matches!(order.enforcement_method, EnforcementMethod::EscrowRelease) {
            return EnforcementAction::EscrowAction { escrow_id: escrow_id.unwrap_or_else(Uuid::nil) };
        }
        if !matches!(order.enforcement_method, EnforcementMethod::SmartAssetStateTransition) {
            return EnforcementAction::Manual;
        }
        match order.order_type {
            OrderType::MonetaryDamages => {
                let amount = order.amount.clone().unwrap_or_else(|| Money::zero("USD"));
                EnforcementAction::Transfer {
                    from: order.obligor.to_string(),
                    to: order.obligee.to_string(),
                    amount_cents: amount.amount_cents(),
                    currency: amount.currency().to_string(),
                }
            }
            OrderType::Injunction => EnforcementAction::Halt,
            _ => EnforcementAction::Manual,
        }
    }
}

/// Errors raised computing a ruling VC's digest for an enforcement receipt.
#[derive(Error, Debug)]
pub enum EnforcementError {
    #[error(transparent)]
    Vc(#[from] VcError),
}

/// Receipt recording that one order from a ruling has been enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementReceipt {
    pub enforcement_id: Uuid,
    pub ruling_vc_digest: String,
    pub order_id: String,
    pub corridor_id: CorridorId,
    pub action: EnforcementAction,
    pub enforcement_timestamp: Timestamp,
}

/// Build the enforcement receipt for `order`, which is assumed to
/// belong to `ruling_vc`.
pub fn enforce_order(
    ruling_vc: &VerifiableCredential,
    order: &Order,
    corridor_id: CorridorId,
    escrow_id: Option<Uuid>,
) -> Result<EnforcementReceipt, EnforcementError> {
    let ruling_vc_digest = ruling_vc.digest()?.to_hex();
    Ok(EnforcementReceipt {
        enforcement_id: Uuid::new_v4(),
        ruling_vc_digest,
        order_id: order.order_id.clone(),
        corridor_id,
        action: EnforcementAction::from_order(order, escrow_id),
        enforcement_timestamp: Timestamp::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_core::DID;

    fn vc() -> VerifiableCredential {
        VerifiableCredential::new(
            "MSEZArbitrationRulingCredential",
            "did:key:tribunal",
            serde_json::json!({"dispute_id": "dispute:1"}),
        )
    }

    fn order(order_type: OrderType, method: EnforcementMethod) -> Order {
        Order {
            order_id: "order-1".into(),
            order_type,
            obligor: DID::parse("did:key:obligor").unwrap(),
            obligee: DID::parse("did:key:obligee").unwrap(),
            amount: Some(Money::new(50_000, "USD")),
            enforcement_method: method,
        }
    }

    #[test]
    fn test_monetary_damages_resolves_to_transfer() {
        let order = order(OrderType::MonetaryDamages, EnforcementMethod::SmartAssetStateTransition);
        let action = EnforcementAction::from_order(&order, None);
        assert!(matches!(action, EnforcementAction::Transfer { amount_cents: 50_000, .. }));
    }

    #[test]
    fn test_injunction_resolves_to_halt() {
        let order = order(OrderType::Injunction, EnforcementMethod::SmartAssetStateTransition);
        assert!(matches!(EnforcementAction::from_order(&order, None), EnforcementAction::Halt));
    }

    #[test]
    fn test_escrow_release_method_resolves_to_escrow_action_regardless_of_order_type() {
        let order = order(OrderType::Costs, EnforcementMethod::EscrowRelease);
        let escrow_id = Uuid::new_v4();
        let action = EnforcementAction::from_order(&order, Some(escrow_id));
        assert!(matches!(action, EnforcementAction::EscrowAction { escrow_id: id } if id == escrow_id));
    }

    #[test]
    fn test_manual_method_resolves_to_manual() {
        let order = order(OrderType::Costs, EnforcementMethod::Manual);
        assert!(matches!(EnforcementAction::from_order(&order, None), EnforcementAction::Manual));
    }

    #[test]
    fn test_enforce_order_carries_ruling_digest() {
        let ruling_vc = vc();
        let order = order(OrderType::MonetaryDamages, EnforcementMethod::SmartAssetStateTransition);
        let receipt = enforce_order(&ruling_vc, &order, CorridorId::new(), None).unwrap();
        assert_eq!(receipt.ruling_vc_digest, ruling_vc.digest().unwrap().to_hex());
    }
}
