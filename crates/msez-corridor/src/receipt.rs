//! # Receipt Chain Engine
//!
//! A per-corridor append-only chain of settlement receipts, backed by the
//! Merkle Mountain Range from `msez-crypto`. Each receipt freezes a
//! `next_root` digest — computed over the receipt minus `{proof,
//! next_root}` — before it is optionally signed, and that digest becomes
//! the chain's next MMR leaf.
//!
//! ## Security Invariant
//!
//! All receipt hashes are computed from `CanonicalBytes`. The MMR provides
//! efficient inclusion proofs for any historical receipt.
//!
//! ## Implements
//!
//! Spec §4.4 — Receipt Chain Engine: genesis, append, fork detection,
//! checkpoint.

use std::collections::{BTreeSet, HashMap};

use msez_core::{
    sha256_digest, strict_digest, ArtifactRef, CanonicalBytes, CanonicalizationError,
    ContentDigest, CorridorId, CryptoError, DigestAlgorithm, Timestamp,
};
use msez_crypto::cas::CasStore;
use msez_crypto::MerkleMountainRange;
use msez_pack::validation::{validate_digest_set_covers_expected, PackValidationError};
use msez_vc::{Proof, ProofPurpose, VcError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or auditing a receipt chain.
#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("sequence {got} does not continue the chain (expected {expected})")]
    SequenceMismatch { expected: u64, got: u64 },

    #[error("prev_root {got} does not match the chain's current root {expected}")]
    PrevRootMismatch { expected: String, got: String },

    #[error("lawpack digest set is missing required digests: {0:?}")]
    MissingLawpackDigests(Vec<String>),

    #[error("ruleset digest set is missing required digests: {0:?}")]
    MissingRulesetDigests(Vec<String>),

    #[error("artifact ref not found in CAS: {artifact_type}/{digest}")]
    ArtifactMissing { artifact_type: String, digest: String },

    #[error("receipt has no attached proof")]
    ProofMissing,

    #[error("{0}")]
    Canonicalization(#[from] CanonicalizationError),

    #[error("{0}")]
    Vc(#[from] VcError),

    #[error("{0}")]
    Crypto(#[from] CryptoError),

    #[error(
        "fork at (sequence={sequence}, prev_root={prev_root}): {observed} competing next_roots; \
         a fork-resolution VC naming this key is required"
    )]
    UnresolvedFork {
        sequence: u64,
        prev_root: String,
        observed: usize,
    },
}

/// A fork-resolution VC's decision: which `next_root` wins at a given
/// `(sequence, prev_root)` fork point.
#[derive(Debug, Clone)]
pub struct ForkResolution {
    pub sequence: u64,
    pub prev_root: String,
    pub chosen_next_root: String,
}

/// One corridor settlement receipt.
///
/// `next_root` is `None` until [`Receipt::freeze`] computes and fills it;
/// a receipt cannot be appended to a chain or signed before that happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub corridor_id: CorridorId,
    pub sequence: u64,
    pub prev_root: String,
    #[serde(default)]
    pub lawpack_digest_set: Vec<String>,
    #[serde(default)]
    pub ruleset_digest_set: Vec<String>,
    #[serde(default)]
    pub artifact_refs: Vec<ArtifactRef>,
    pub payload: serde_json::Value,
    pub issued_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl Receipt {
    /// Build an unfrozen draft receipt extending `prev_root` at `sequence`.
    pub fn draft(
        corridor_id: CorridorId,
        sequence: u64,
        prev_root: impl Into<String>,
        lawpack_digest_set: Vec<String>,
        ruleset_digest_set: Vec<String>,
        artifact_refs: Vec<ArtifactRef>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            corridor_id,
            sequence,
            prev_root: prev_root.into(),
            lawpack_digest_set,
            ruleset_digest_set,
            artifact_refs,
            payload,
            issued_at: Timestamp::now(),
            next_root: None,
            proof: None,
        }
    }

    /// Compute the strict digest this receipt would freeze as `next_root`:
    /// `sha256(JCS(self \ {"proof", "next_root"}))`.
    pub fn compute_next_root(&self) -> Result<ContentDigest, CanonicalizationError> {
        strict_digest(self, &["proof", "next_root"])
    }

    /// Freeze `next_root`, consuming and returning `self`. Idempotent: a
    /// receipt whose `next_root` is already set is returned unchanged.
    pub fn freeze(mut self) -> Result<Self, CanonicalizationError> {
        if self.next_root.is_none() {
            self.next_root = Some(self.compute_next_root()?.to_hex());
        }
        Ok(self)
    }

    fn signing_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(ref mut map) = value {
            map.remove("proof");
        }
        CanonicalBytes::new(&value)
    }

    /// Sign a frozen receipt, freezing it first if necessary — an
    /// unfrozen receipt's signature would not cover the `next_root` it is
    /// meant to attest to.
    pub fn sign(
        mut self,
        keypair: &msez_crypto::Ed25519KeyPair,
        verification_method: impl Into<String>,
    ) -> Result<Self, ReceiptError> {
        if self.next_root.is_none() {
            self = self.freeze()?;
        }
        let canonical = self.signing_bytes()?;
        let signature = keypair.sign(&canonical);
        self.proof = Some(Proof::new(verification_method, ProofPurpose::AssertionMethod, &signature));
        Ok(self)
    }

    /// Verify the attached proof, if any.
    pub fn verify_proof(&self, public_key: &msez_crypto::Ed25519PublicKey) -> Result<(), ReceiptError> {
        let proof = self.proof.as_ref().ok_or(ReceiptError::ProofMissing)?;
        let canonical = self.signing_bytes()?;
        let signature = proof.signature()?;
        msez_crypto::ed25519::verify_with_public_key(&canonical, &signature, public_key)?;
        Ok(())
    }
}

/// `genesis_root = sha256(JCS({"corridor_id": id, "definition_vc_digest": digest_of(def_vc)}))`.
pub fn genesis_root(
    corridor_id: &CorridorId,
    definition_vc_digest: &ContentDigest,
) -> Result<ContentDigest, CanonicalizationError> {
    let value = serde_json::json!({
        "corridor_id": corridor_id,
        "definition_vc_digest": definition_vc_digest.to_hex(),
    });
    Ok(sha256_digest(&CanonicalBytes::new(&value)?))
}

/// Canonical snapshot signed as a checkpoint VC (spec §4.4 Checkpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub corridor_id: CorridorId,
    pub receipt_count: u64,
    pub final_state_root: String,
    pub lawpack_digest_set: Vec<String>,
    pub ruleset_digest_set: Vec<String>,
    pub timestamp: Timestamp,
}

/// Append-only receipt chain for one corridor, with fork detection.
///
/// Indexes receipts by `(sequence, prev_root)`; a second receipt landing
/// on the same index with a different `next_root` is a fork — it is held
/// back as an orphan candidate until a [`ForkResolution`] names a winner.
pub struct ReceiptChain {
    corridor_id: CorridorId,
    genesis_root: String,
    mmr: MerkleMountainRange,
    receipts: Vec<Receipt>,
    fork_index: HashMap<(u64, String), Vec<Receipt>>,
    orphans: Vec<Receipt>,
}

impl ReceiptChain {
    /// Start a chain at its genesis root.
    pub fn genesis(
        corridor_id: CorridorId,
        definition_vc_digest: &ContentDigest,
    ) -> Result<Self, CanonicalizationError> {
        let root = genesis_root(&corridor_id, definition_vc_digest)?;
        Ok(Self {
            corridor_id,
            genesis_root: root.to_hex(),
            mmr: MerkleMountainRange::new(),
            receipts: Vec::new(),
            fork_index: HashMap::new(),
            orphans: Vec::new(),
        })
    }

    pub fn corridor_id(&self) -> &CorridorId {
        &self.corridor_id
    }

    pub fn genesis_root(&self) -> &str {
        &self.genesis_root
    }

    /// The root a receipt at the next sequence must name as its `prev_root`.
    pub fn current_root(&self) -> &str {
        self.receipts
            .last()
            .and_then(|r| r.next_root.as_deref())
            .unwrap_or(&self.genesis_root)
    }

    pub fn receipt_count(&self) -> u64 {
        self.receipts.len() as u64
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn orphans(&self) -> &[Receipt] {
        &self.orphans
    }

    /// Append a receipt, validating sequence continuity, digest-set
    /// supersets, artifact existence, and (if present) the VC proof.
    ///
    /// `expected_lawpack_digests`/`expected_ruleset_digests` are the sets
    /// the receipt's own sets must be supersets of. `cas`, when given,
    /// checks every `artifact_refs` entry resolves under its artifact
    /// type; pass `None` to skip existence checks entirely.
    pub fn append(
        &mut self,
        mut receipt: Receipt,
        expected_lawpack_digests: &[String],
        expected_ruleset_digests: &[String],
        cas: Option<&CasStore>,
        signer_public_key: Option<&msez_crypto::Ed25519PublicKey>,
    ) -> Result<&Receipt, ReceiptError> {
        let expected_sequence = self.receipt_count();
        if receipt.sequence != expected_sequence {
            return Err(ReceiptError::SequenceMismatch {
                expected: expected_sequence,
                got: receipt.sequence,
            });
        }
        let current_root = self.current_root().to_string();
        if receipt.prev_root != current_root {
            return Err(ReceiptError::PrevRootMismatch {
                expected: current_root,
                got: receipt.prev_root,
            });
        }

        let lawpack_set: BTreeSet<String> = receipt.lawpack_digest_set.iter().cloned().collect();
        let expected_lawpack: BTreeSet<String> = expected_lawpack_digests.iter().cloned().collect();
        if let Err(PackValidationError::MissingExpectedDigest { missing }) =
            validate_digest_set_covers_expected(&lawpack_set, &expected_lawpack)
        {
            return Err(ReceiptError::MissingLawpackDigests(vec![missing]));
        }
        let ruleset_set: BTreeSet<String> = receipt.ruleset_digest_set.iter().cloned().collect();
        let expected_ruleset: BTreeSet<String> = expected_ruleset_digests.iter().cloned().collect();
        if let Err(PackValidationError::MissingExpectedDigest { missing }) =
            validate_digest_set_covers_expected(&ruleset_set, &expected_ruleset)
        {
            return Err(ReceiptError::MissingRulesetDigests(vec![missing]));
        }

        receipt = receipt.freeze()?;

        if let Some(store) = cas {
            for artifact_ref in &receipt.artifact_refs {
                let digest = hex_to_digest(&artifact_ref.digest_sha256, &artifact_ref.artifact_type)?;
                store
                    .resolve(&artifact_ref.artifact_type, &digest)
                    .map_err(|_| ReceiptError::ArtifactMissing {
                        artifact_type: artifact_ref.artifact_type.clone(),
                        digest: artifact_ref.digest_sha256.clone(),
                    })?;
            }
        }

        if receipt.proof.is_some() {
            if let Some(public_key) = signer_public_key {
                receipt.verify_proof(public_key)?;
            }
        }

        let key = (receipt.sequence, receipt.prev_root.clone());
        let siblings = self.fork_index.entry(key.clone()).or_default();
        let conflicting = siblings
            .iter()
            .any(|existing| existing.next_root != receipt.next_root);
        if conflicting {
            siblings.push(receipt.clone());
            return Err(ReceiptError::UnresolvedFork {
                sequence: key.0,
                prev_root: key.1,
                observed: siblings.len(),
            });
        }
        siblings.push(receipt.clone());

        self.mmr.append(receipt.next_root.as_ref().expect("frozen above"))?;
        self.receipts.push(receipt);
        Ok(self.receipts.last().expect("just pushed"))
    }

    /// Resolve a fork by retaining the receipt naming `resolution`'s chosen
    /// `next_root` at the given `(sequence, prev_root)` key, demoting every
    /// other competing receipt to an orphan.
    pub fn resolve_fork(&mut self, resolution: &ForkResolution) {
        let key = (resolution.sequence, resolution.prev_root.clone());
        let Some(siblings) = self.fork_index.get_mut(&key) else {
            return;
        };
        let mut winner = None;
        for candidate in siblings.drain(..) {
            if winner.is_none() && candidate.next_root.as_deref() == Some(resolution.chosen_next_root.as_str()) {
                winner = Some(candidate);
            } else {
                self.orphans.push(candidate);
            }
        }
        if let Some(winner) = winner {
            siblings.push(winner);
        }
    }

    /// Produce a checkpoint snapshot of the chain's current state.
    pub fn checkpoint(&self, lawpack_digest_set: Vec<String>, ruleset_digest_set: Vec<String>) -> Checkpoint {
        Checkpoint {
            corridor_id: self.corridor_id.clone(),
            receipt_count: self.receipt_count(),
            final_state_root: self.current_root().to_string(),
            lawpack_digest_set,
            ruleset_digest_set,
            timestamp: Timestamp::now(),
        }
    }

    /// Audit a checkpoint against this chain: the chain must terminate at
    /// `final_state_root` with a matching receipt count.
    pub fn verify_checkpoint(&self, checkpoint: &Checkpoint) -> bool {
        checkpoint.corridor_id == self.corridor_id
            && checkpoint.receipt_count == self.receipt_count()
            && checkpoint.final_state_root == self.current_root()
    }
}

fn hex_to_digest(hex: &str, artifact_type: &str) -> Result<ContentDigest, ReceiptError> {
    let bad = || ReceiptError::ArtifactMissing {
        artifact_type: artifact_type.to_string(),
        digest: hex.to_string(),
    };
    if hex.len() != 64 {
        return Err(bad());
    }
    let mut bytes = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let s = std::str::from_utf8(chunk).map_err(|_| bad())?;
        bytes[i] = u8::from_str_radix(s, 16).map_err(|_| bad())?;
    }
    Ok(ContentDigest::new(DigestAlgorithm::Sha256, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def_vc_digest() -> ContentDigest {
        msez_core::sha256_bytes(b"corridor definition vc")
    }

    fn next_draft(chain: &ReceiptChain, sequence: u64) -> Receipt {
        Receipt::draft(
            chain.corridor_id().clone(),
            sequence,
            chain.current_root().to_string(),
            vec!["lawpack-a".to_string()],
            vec!["ruleset-a".to_string()],
            vec![],
            serde_json::json!({"amount": "100"}),
        )
    }

    #[test]
    fn test_genesis_root_deterministic() {
        let id = CorridorId::new();
        let digest = def_vc_digest();
        let a = genesis_root(&id, &digest).unwrap();
        let b = genesis_root(&id, &digest).unwrap();
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn test_append_first_receipt() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let draft = next_draft(&chain, 0);
        let expected = vec!["lawpack-a".to_string()];
        chain.append(draft, &expected, &expected, None, None).unwrap();
        assert_eq!(chain.receipt_count(), 1);
    }

    #[test]
    fn test_sequence_must_continue() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let mut draft = next_draft(&chain, 0);
        draft.sequence = 5;
        let result = chain.append(draft, &[], &[], None, None);
        assert!(matches!(result, Err(ReceiptError::SequenceMismatch { .. })));
    }

    #[test]
    fn test_prev_root_must_match_chain_tip() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let mut draft = next_draft(&chain, 0);
        draft.prev_root = "not-the-real-root".to_string();
        let result = chain.append(draft, &[], &[], None, None);
        assert!(matches!(result, Err(ReceiptError::PrevRootMismatch { .. })));
    }

    #[test]
    fn test_missing_lawpack_digest_rejected() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let draft = next_draft(&chain, 0);
        let result = chain.append(draft, &["lawpack-required".to_string()], &[], None, None);
        assert!(matches!(result, Err(ReceiptError::MissingLawpackDigests(_))));
    }

    #[test]
    fn test_chain_grows_root_each_append() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let root0 = chain.current_root().to_string();
        let draft0 = next_draft(&chain, 0);
        chain.append(draft0, &[], &[], None, None).unwrap();
        let root1 = chain.current_root().to_string();
        assert_ne!(root0, root1);

        let draft1 = next_draft(&chain, 1);
        chain.append(draft1, &[], &[], None, None).unwrap();
        let root2 = chain.current_root().to_string();
        assert_ne!(root1, root2);
    }

    #[test]
    fn test_fork_detected_on_conflicting_next_root() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let genesis = chain.genesis_root().to_string();

        let draft_a = Receipt::draft(
            chain.corridor_id().clone(),
            0,
            genesis.clone(),
            vec![],
            vec![],
            vec![],
            serde_json::json!({"amount": "100"}),
        );
        let draft_b = Receipt::draft(
            chain.corridor_id().clone(),
            0,
            genesis,
            vec![],
            vec![],
            vec![],
            serde_json::json!({"amount": "999"}),
        );

        chain.append(draft_a, &[], &[], None, None).unwrap();
        let result = chain.append(draft_b, &[], &[], None, None);
        assert!(matches!(result, Err(ReceiptError::UnresolvedFork { .. })));
    }

    #[test]
    fn test_fork_resolution_retains_chosen_side() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let genesis = chain.genesis_root().to_string();

        let draft_a = Receipt::draft(
            chain.corridor_id().clone(),
            0,
            genesis.clone(),
            vec![],
            vec![],
            vec![],
            serde_json::json!({"amount": "100"}),
        )
        .freeze()
        .unwrap();
        let next_root_a = draft_a.next_root.clone().unwrap();

        let draft_b = Receipt::draft(
            chain.corridor_id().clone(),
            0,
            genesis.clone(),
            vec![],
            vec![],
            vec![],
            serde_json::json!({"amount": "200"}),
        );

        chain.append(draft_a, &[], &[], None, None).unwrap();
        let fork_result = chain.append(draft_b, &[], &[], None, None);
        assert!(fork_result.is_err());

        chain.resolve_fork(&ForkResolution {
            sequence: 0,
            prev_root: genesis,
            chosen_next_root: next_root_a,
        });
        assert_eq!(chain.orphans().len(), 1);
    }

    #[test]
    fn test_sign_and_verify_receipt() {
        let kp = msez_crypto::Ed25519KeyPair::generate();
        let chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let draft = next_draft(&chain, 0).freeze().unwrap();
        let signed = draft.sign(&kp, "did:key:zIssuer#key-1").unwrap();
        signed.verify_proof(&kp.public_key()).expect("should verify");
    }

    #[test]
    fn test_tamper_after_signing_fails_verification() {
        let kp = msez_crypto::Ed25519KeyPair::generate();
        let chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let draft = next_draft(&chain, 0).freeze().unwrap();
        let mut signed = draft.sign(&kp, "did:key:zIssuer#key-1").unwrap();
        signed.payload = serde_json::json!({"amount": "999999"});
        assert!(signed.verify_proof(&kp.public_key()).is_err());
    }

    #[test]
    fn test_checkpoint_round_trips() {
        let mut chain = ReceiptChain::genesis(CorridorId::new(), &def_vc_digest()).unwrap();
        let draft = next_draft(&chain, 0);
        chain.append(draft, &[], &[], None, None).unwrap();
        let checkpoint = chain.checkpoint(vec![], vec![]);
        assert!(chain.verify_checkpoint(&checkpoint));
    }
}
