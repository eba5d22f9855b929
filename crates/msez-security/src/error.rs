//! # Security Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("attestation {attestation_ref} was already bound to a different scope")]
    ScopeMismatch { attestation_ref: String },
    #[error("nonce {nonce} already consumed for principal {principal}")]
    NonceReplayed { principal: String, nonce: String },
    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("action {action_id} is still time-locked until {unlock_at}")]
    StillLocked { action_id: String, unlock_at: String },
    #[error("action {action_id} was already executed")]
    AlreadyExecuted { action_id: String },
    #[error("rate limit exceeded: {limit} per {window_s}s")]
    RateLimited { limit: u64, window_s: u64 },
}
