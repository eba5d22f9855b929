//! # SHA-256 Digest Computation
//!
//! Re-exports the canonical digest functions from `msez-core`, which owns
//! the `CanonicalBytes` type and therefore the only correct digest path.
//! Kept as its own module (rather than inlined) so call sites that already
//! `use msez_crypto::sha256::*` continue to resolve.
//!
//! ## Security Invariant
//!
//! The function signature `sha256_digest(data: &CanonicalBytes) -> ContentDigest`
//! makes it a compile error to pass raw bytes. This prevents the canonicalization
//! split defect by construction.

pub use msez_core::{sha256_bytes, sha256_digest, sha256_hex};
