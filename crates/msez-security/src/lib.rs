//! # msez-security
//!
//! Security hardening primitives shared across the SEZ Stack: scoped
//! attestation replay prevention, nonce management, optimistic
//! concurrency control, time-locked actions, rate limiting, and
//! hash-chained audit logging.
//!
//! ## Implements
//!
//! Ambient security concerns named in `original_source/tools/phoenix/security.py`.

mod attestation_scope;
mod audit;
mod error;
mod nonce;
mod rate_limiter;
mod timelock;
mod versioned;

pub use attestation_scope::{AttestationScope, ScopeRegistry};
pub use audit::{AuditEntry, AuditLog};
pub use error::SecurityError;
pub use nonce::NonceRegistry;
pub use rate_limiter::RateLimiter;
pub use timelock::TimeLockedAction;
pub use versioned::Versioned;
