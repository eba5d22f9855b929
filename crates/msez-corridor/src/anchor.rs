//! # L1 Anchoring
//!
//! Optional L1 blockchain anchoring for corridor receipt chains. The SEZ
//! Stack is L1-optional by design — corridors function without
//! blockchain finality but can opt into anchoring a checkpoint root for
//! an additional, publicly verifiable finality guarantee.
//!
//! Anchoring is pluggable per chain via [`ChainAdapter`]; [`MockChainAdapter`]
//! is the deterministic reference implementation used in tests and in
//! environments with no real RPC endpoint configured.
//!
//! ## Implements
//!
//! Spec §4.11 — Anchor Layer.

use std::collections::HashMap;
use std::sync::Mutex;

use msez_core::Timestamp;
use thiserror::Error;

/// The chains an anchor record may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Chain {
    Ethereum,
    Arbitrum,
    Base,
    Polygon,
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Chain::Ethereum => "ethereum",
            Chain::Arbitrum => "arbitrum",
            Chain::Base => "base",
            Chain::Polygon => "polygon",
        };
        f.write_str(name)
    }
}

/// The lifecycle state of an anchor submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnchorStatus {
    Submitted,
    Pending,
    Confirmed,
    Failed,
    Reorged,
}

impl std::fmt::Display for AnchorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnchorStatus::Submitted => "SUBMITTED",
            AnchorStatus::Pending => "PENDING",
            AnchorStatus::Confirmed => "CONFIRMED",
            AnchorStatus::Failed => "FAILED",
            AnchorStatus::Reorged => "REORGED",
        };
        f.write_str(name)
    }
}

/// Errors raised by anchor adapters or the anchor service.
#[derive(Error, Debug)]
pub enum AnchorError {
    #[error("no adapter registered for chain {0}")]
    NoAdapter(Chain),

    #[error("no anchor record for tx_id {0}")]
    UnknownTxId(String),

    #[error("adapter submission failed: {0}")]
    SubmissionFailed(String),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: AnchorStatus, to: AnchorStatus },
}

/// One anchor submission and its current confirmation state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnchorRecord {
    pub digest: String,
    pub chain: Chain,
    pub tx_id: String,
    pub block_height: Option<u64>,
    pub status: AnchorStatus,
    pub submitted_at: Timestamp,
    pub confirmed_at: Option<Timestamp>,
}

/// A confirmation observation returned by an adapter's status check.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub block_height: u64,
    pub confirmations: u64,
}

/// A pluggable per-chain anchoring port.
pub trait ChainAdapter {
    /// Submit `digest` to the chain, returning its transaction id.
    fn submit(&self, digest: &str) -> Result<String, AnchorError>;

    /// Check the current on-chain confirmation state of `tx_id`, if any.
    fn check_status(&self, tx_id: &str) -> Result<Option<Confirmation>, AnchorError>;

    /// Verify an inclusion proof for `tx_id` at `block_height` against
    /// this chain's current canonical history. `false` signals a
    /// re-org: the transaction no longer sits where it was confirmed.
    fn verify_inclusion(&self, tx_id: &str, block_height: u64) -> Result<bool, AnchorError>;
}

const CONFIRMATIONS_REQUIRED: u64 = 6;

/// Deterministic in-memory reference adapter. Each `submit` call assigns
/// a synthetic tx_id; `check_status` and `verify_inclusion` consult a
/// fixed confirmation schedule set by the test/caller via
/// [`MockChainAdapter::advance`] rather than real wall-clock time.
#[derive(Default)]
pub struct MockChainAdapter {
    ledger: Mutex<HashMap<String, MockEntry>>,
    next_id: Mutex<u64>,
}

struct MockEntry {
    digest: String,
    block_height: Option<u64>,
    confirmations: u64,
    reorged: bool,
}

impl MockChainAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance `tx_id` to `block_height` with `confirmations` confirmations.
    pub fn advance(&self, tx_id: &str, block_height: u64, confirmations: u64) {
        if let Some(entry) = self.ledger.lock().expect("mock ledger lock").get_mut(tx_id) {
            entry.block_height = Some(block_height);
            entry.confirmations = confirmations;
        }
    }

    /// Mark `tx_id` as having been re-orged out of the canonical chain.
    pub fn mark_reorged(&self, tx_id: &str) {
        if let Some(entry) = self.ledger.lock().expect("mock ledger lock").get_mut(tx_id) {
            entry.reorged = true;
        }
    }
}

impl ChainAdapter for MockChainAdapter {
    fn submit(&self, digest: &str) -> Result<String, AnchorError> {
        let mut next_id = self.next_id.lock().expect("mock id lock");
        let tx_id = format!("mock-tx-{:08x}", *next_id);
        *next_id += 1;
        self.ledger.lock().expect("mock ledger lock").insert(
            tx_id.clone(),
            MockEntry {
                digest: digest.to_string(),
                block_height: None,
                confirmations: 0,
                reorged: false,
            },
        );
        Ok(tx_id)
    }

    fn check_status(&self, tx_id: &str) -> Result<Option<Confirmation>, AnchorError> {
        let ledger = self.ledger.lock().expect("mock ledger lock");
        let entry = ledger.get(tx_id).ok_or_else(|| AnchorError::UnknownTxId(tx_id.to_string()))?;
        if entry.reorged {
            return Ok(None);
        }
        Ok(entry.block_height.map(|height| Confirmation {
            block_height: height,
            confirmations: entry.confirmations,
        }))
    }

    fn verify_inclusion(&self, tx_id: &str, block_height: u64) -> Result<bool, AnchorError> {
        let ledger = self.ledger.lock().expect("mock ledger lock");
        let entry = ledger.get(tx_id).ok_or_else(|| AnchorError::UnknownTxId(tx_id.to_string()))?;
        Ok(!entry.reorged && entry.block_height == Some(block_height))
    }
}

/// Coordinates anchoring across registered chain adapters, tracking each
/// submission's status machine: `SUBMITTED -> PENDING -> CONFIRMED |
/// FAILED | REORGED`.
pub struct AnchorService {
    adapters: HashMap<Chain, Box<dyn ChainAdapter + Send + Sync>>,
    records: HashMap<String, AnchorRecord>,
}

impl AnchorService {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            records: HashMap::new(),
        }
    }

    pub fn register_adapter(&mut self, chain: Chain, adapter: impl ChainAdapter + Send + Sync + 'static) {
        self.adapters.insert(chain, Box::new(adapter));
    }

    /// Submit `digest` for anchoring on `chain`, recording a `SUBMITTED`
    /// anchor record keyed by the resulting tx_id.
    pub fn anchor(&mut self, digest: &str, chain: Chain) -> Result<AnchorRecord, AnchorError> {
        let adapter = self.adapters.get(&chain).ok_or(AnchorError::NoAdapter(chain))?;
        let tx_id = adapter.submit(digest).map_err(|e| AnchorError::SubmissionFailed(e.to_string()))?;
        let record = AnchorRecord {
            digest: digest.to_string(),
            chain,
            tx_id: tx_id.clone(),
            block_height: None,
            status: AnchorStatus::Submitted,
            submitted_at: Timestamp::now(),
            confirmed_at: None,
        };
        self.records.insert(tx_id, record.clone());
        Ok(record)
    }

    /// Poll the adapter for `tx_id` and advance its status machine.
    /// `SUBMITTED`/`PENDING` records with fewer than the required
    /// confirmations move to (or stay at) `PENDING`; enough
    /// confirmations moves to `CONFIRMED`; a vanished block moves a
    /// previously `CONFIRMED` record to `REORGED` rather than back to
    /// an earlier state.
    pub fn poll(&mut self, tx_id: &str) -> Result<&AnchorRecord, AnchorError> {
        let record = self.records.get(tx_id).ok_or_else(|| AnchorError::UnknownTxId(tx_id.to_string()))?;
        let chain = record.chain;
        let was_confirmed = record.status == AnchorStatus::Confirmed;
        let adapter = self.adapters.get(&chain).ok_or(AnchorError::NoAdapter(chain))?;
        let observation = adapter.check_status(tx_id)?;

        let record = self.records.get_mut(tx_id).expect("checked above");
        match observation {
            None if was_confirmed => {
                record.status = AnchorStatus::Reorged;
            }
            None => {
                record.status = AnchorStatus::Pending;
            }
            Some(confirmation) => {
                record.block_height = Some(confirmation.block_height);
                if confirmation.confirmations >= CONFIRMATIONS_REQUIRED {
                    record.status = AnchorStatus::Confirmed;
                    if record.confirmed_at.is_none() {
                        record.confirmed_at = Some(Timestamp::now());
                    }
                } else {
                    record.status = AnchorStatus::Pending;
                }
            }
        }
        Ok(record)
    }

    /// Verify a previously confirmed anchor still sits at its recorded
    /// block height on-chain, demoting it to `REORGED` if not.
    pub fn verify_and_demote_if_reorged(&mut self, tx_id: &str) -> Result<bool, AnchorError> {
        let record = self.records.get(tx_id).ok_or_else(|| AnchorError::UnknownTxId(tx_id.to_string()))?;
        let Some(block_height) = record.block_height else {
            return Ok(true);
        };
        let chain = record.chain;
        let adapter = self.adapters.get(&chain).ok_or(AnchorError::NoAdapter(chain))?;
        let still_included = adapter.verify_inclusion(tx_id, block_height)?;
        if !still_included {
            let record = self.records.get_mut(tx_id).expect("checked above");
            record.status = AnchorStatus::Reorged;
        }
        Ok(still_included)
    }

    pub fn record(&self, tx_id: &str) -> Option<&AnchorRecord> {
        self.records.get(tx_id)
    }
}

impl Default for AnchorService {
    fn default() -> Self {
        Self::new()
    }
}
