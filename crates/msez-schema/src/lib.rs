//! # msez-schema — Schema Validation & Code Generation
//!
//! Provides runtime JSON Schema validation for zone, module, and profile
//! YAML descriptors.
//!
//! ## Runtime Validation
//!
//! The `validate` module validates JSON/YAML documents against JSON
//! Schema (Draft 2020-12) definitions loaded from a `schemas/` directory.
//!
//! ## Crate Policy
//!
//! - Depends only on `msez-core` internally.
//! - Schema `$id` and `$ref` URIs must never be changed without verifying
//!   all references across the repository.

pub mod validate;

pub use validate::{
    ModuleFailure, ModuleValidationReport, SchemaValidationDetail, SchemaValidationError,
    SchemaValidator,
};
