//! # SWIFT pacs.008 Adapter
//!
//! Minimal adapter for traditional banking settlement rails: renders a
//! [`crate::netting::SettlementLeg`] as an ISO 20022 pacs.008 (FI to FI
//! Customer Credit Transfer) message and tracks its acknowledgment state.
//! Corridors that settle over SWIFT rather than a corridor receipt chain
//! use this as their [`crate::netting::Rail`] executor.
//!
//! ## Implements
//!
//! Spec §4.9/§4.14 — settlement rail adapters (SWIFT pacs.008 is the
//! reference legacy-rail adapter named alongside the corridor bridge).

use msez_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::netting::SettlementLeg;

/// Acknowledgment state of a submitted pacs.008 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for AckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AckStatus::Pending => "PENDING",
            AckStatus::Accepted => "ACCEPTED",
            AckStatus::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}

/// A minimal pacs.008 Credit Transfer message, carrying only the fields
/// the netting engine's settlement legs actually populate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pacs008Message {
    pub message_id: String,
    pub creation_datetime: Timestamp,
    pub debtor: String,
    pub creditor: String,
    pub currency: String,
    pub amount_cents: u64,
    pub status: AckStatus,
}

/// Errors produced while rendering or acknowledging a pacs.008 message.
#[derive(Debug, thiserror::Error)]
pub enum SwiftError {
    #[error("message {0} was already acknowledged")]
    AlreadyAcknowledged(String),
}

/// Adapter translating settlement legs into pacs.008 messages and back.
#[derive(Debug, Default)]
pub struct SwiftAdapter {
    messages: std::collections::HashMap<String, Pacs008Message>,
    next_id: u64,
}

impl SwiftAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `leg` as a pending pacs.008 message and register it.
    pub fn submit(&mut self, leg: &SettlementLeg) -> Pacs008Message {
        let message_id = format!("PACS008-{:010}", self.next_id);
        self.next_id += 1;
        let message = Pacs008Message {
            message_id: message_id.clone(),
            creation_datetime: Timestamp::now(),
            debtor: leg.from.to_string(),
            creditor: leg.to.to_string(),
            currency: leg.currency.clone(),
            amount_cents: leg.amount_cents,
            status: AckStatus::Pending,
        };
        self.messages.insert(message_id, message.clone());
        message
    }

    /// Record a counterparty acknowledgment for a previously submitted message.
    pub fn acknowledge(&mut self, message_id: &str, accepted: bool) -> Result<&Pacs008Message, SwiftError> {
        let message = self
            .messages
            .get_mut(message_id)
            .ok_or_else(|| SwiftError::AlreadyAcknowledged(message_id.to_string()))?;
        if message.status != AckStatus::Pending {
            return Err(SwiftError::AlreadyAcknowledged(message_id.to_string()));
        }
        message.status = if accepted { AckStatus::Accepted } else { AckStatus::Rejected };
        Ok(message)
    }

    pub fn message(&self, message_id: &str) -> Option<&Pacs008Message> {
        self.messages.get(message_id)
    }
}
