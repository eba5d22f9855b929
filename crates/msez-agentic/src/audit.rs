//! # Policy Audit Trail
//!
//! Content-addressed audit trail for policy evaluations and action
//! executions. Every policy decision is recorded with its evidence.
//!
//! The hash-chained log itself lives in `msez-security`, which is
//! shared across the stack; this module re-exports it under the
//! agentic engine's own vocabulary.

pub use msez_security::{AuditEntry, AuditLog};
