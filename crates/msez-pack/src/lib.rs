//! # msez-pack — Pack Trilogy
//!
//! Implements the three foundational pack types that encode jurisdictional
//! configuration as content-addressed artifacts:
//!
//! - **Lawpack** (`lawpack.rs`): legislative statutes compiled into
//!   machine-readable compliance rules, chained across amendments by
//!   digest.
//!
//! - **Regpack** (`regpack.rs`): regulatory state that changes too
//!   often for a lawpack snapshot — sanctions lists, reporting
//!   requirements, compliance deadlines.
//!
//! - **Licensepack** (`licensepack.rs`): a content-addressed snapshot
//!   of a jurisdiction's live license registry, anchored to the
//!   member `msez_state::License` lifecycle records it references.
//!
//! All three pack types are opaque byte containers per spec §3: their
//! digest is `sha256(bytes)` over the serialized pack, not a
//! JCS-canonicalized object.
//!
//! ## Crate Policy
//!
//! - Depends only on `msez-core` internally.

pub mod lawpack;
pub mod licensepack;
pub mod regpack;
pub mod validation;

pub use lawpack::Lawpack;
pub use licensepack::Licensepack;
pub use regpack::Regpack;
pub use validation::{
    validate_digest_set_covers_expected, validate_lawpack, validate_licensepack, validate_regpack,
    PackValidationError,
};
