//! # Runtime Schema Validation
//!
//! Validates JSON/YAML documents against JSON Schema (Draft 2020-12) definitions
//! from a `schemas/` directory. Resolves `$ref` URIs internally by mapping
//! `https://schemas.msez.dev/msez/{name}` to local schema files.
//!
//! ## Design
//!
//! [`SchemaValidator`] loads all schema files at construction time, builds a
//! URI → schema map for `$ref` resolution, and compiles a validator per
//! call — this corpus of schemas is small enough that recompiling per call
//! is not a bottleneck.
//!
//! ## Security Invariant
//!
//! Schema validation is a trust boundary. Documents that fail validation
//! are rejected with structured error information: the schema `$id`, the
//! JSON Pointer to the violating field, and a human-readable message.
//!
//! ## Implements
//!
//! Spec §6 — Schema contract validation rules.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

const SCHEMA_URI_PREFIX: &str = "https://schemas.msez.dev/msez/";

/// Structured validation error with diagnostic context.
#[derive(Debug, Clone)]
pub struct SchemaValidationDetail {
    /// The JSON Schema `$id` or file path that was violated.
    pub schema_path: String,
    /// The JSON Pointer to the field that failed validation.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for SchemaValidationDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema={}, path={}: {}", self.schema_path, self.instance_path, self.message)
    }
}

/// Errors returned by schema validation operations.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError { path: String, reason: String },

    #[error("failed to load document {path}: {reason}")]
    DocumentLoadError { path: String, reason: String },

    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompileError { schema_id: String, reason: String },

    #[error("{count} validation error(s) against {schema_id}")]
    ValidationFailed { schema_id: String, count: usize, details: Vec<SchemaValidationDetail> },

    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves `$ref` URIs by looking up pre-loaded schemas.
struct LocalSchemaRetriever {
    schemas: HashMap<String, Value>,
}

impl jsonschema::Retrieve for LocalSchemaRetriever {
    fn retrieve(&self, uri: &jsonschema::Uri<&str>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas.get(uri_str).cloned().ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

/// A schema registry that validates documents against JSON Schema
/// definitions loaded from a directory.
pub struct SchemaValidator {
    schema_dir: PathBuf,
    schema_map: HashMap<String, Value>,
    filename_to_id: HashMap<String, String>,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_dir", &self.schema_dir)
            .field("schema_count", &self.schema_map.len())
            .finish()
    }
}

impl SchemaValidator {
    /// Load all `*.schema.json` files under `schema_dir`, recursively.
    /// A missing directory yields an empty registry rather than an error.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.into();
        let mut schema_map = HashMap::new();
        let mut filename_to_id = HashMap::new();

        if !schema_dir.is_dir() {
            return Ok(Self { schema_dir, schema_map, filename_to_id });
        }

        for path in Self::glob_schemas(&schema_dir)? {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| SchemaValidationError::SchemaLoadError { path: path.display().to_string(), reason: e.to_string() })?;
            let schema: Value = serde_json::from_str(&content)
                .map_err(|e| SchemaValidationError::SchemaLoadError { path: path.display().to_string(), reason: e.to_string() })?;

            let schema_id = if let Some(id) = schema.get("$id").and_then(|v| v.as_str()) {
                id.to_string()
            } else {
                let rel = path.strip_prefix(&schema_dir).unwrap_or(&path);
                format!("{SCHEMA_URI_PREFIX}{}", rel.display())
            };

            if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
                filename_to_id.insert(filename.to_string(), schema_id.clone());
            }
            schema_map.insert(schema_id, schema);
        }

        Ok(Self { schema_dir, schema_map, filename_to_id })
    }

    pub fn schema_count(&self) -> usize {
        self.schema_map.len()
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn schema_ids(&self) -> Vec<&str> {
        self.schema_map.keys().map(|s| s.as_str()).collect()
    }

    pub fn get_schema(&self, schema_id: &str) -> Option<&Value> {
        self.schema_map.get(schema_id)
    }

    pub fn get_schema_by_filename(&self, filename: &str) -> Option<&Value> {
        self.filename_to_id.get(filename).and_then(|id| self.schema_map.get(id))
    }

    /// Validate `value` against the schema registered under `schema_id`.
    pub fn validate_value(&self, value: &Value, schema_id: &str) -> Result<(), SchemaValidationError> {
        let schema = self.schema_map.get(schema_id).ok_or_else(|| SchemaValidationError::SchemaNotFound(schema_id.to_string()))?;

        let retriever = LocalSchemaRetriever { schemas: self.schema_map.clone() };
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(retriever)
            .build(schema)
            .map_err(|e| SchemaValidationError::SchemaCompileError { schema_id: schema_id.to_string(), reason: e.to_string() })?;

        let errors: Vec<SchemaValidationDetail> = validator
            .iter_errors(value)
            .map(|err| SchemaValidationDetail {
                schema_path: schema_id.to_string(),
                instance_path: err.instance_path.to_string(),
                message: err.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed { schema_id: schema_id.to_string(), count: errors.len(), details: errors })
        }
    }

    /// Validate `value` against the schema registered under `filename`
    /// (e.g. `"zone.schema.json"`).
    pub fn validate_value_by_filename(&self, value: &Value, filename: &str) -> Result<(), SchemaValidationError> {
        let schema_id = self.filename_to_id.get(filename).ok_or_else(|| SchemaValidationError::SchemaNotFound(filename.to_string()))?;
        self.validate_value(value, schema_id)
    }

    /// Validate a module descriptor. `path` may point directly at a
    /// `module.yaml` or at the directory containing one.
    pub fn validate_module(&self, path: &Path) -> Result<(), SchemaValidationError> {
        let module_yaml = if path.is_dir() { path.join("module.yaml") } else { path.to_path_buf() };
        self.validate_yaml_file(&module_yaml, "module.schema.json")
    }

    /// Validate a zone YAML descriptor against `zone.schema.json`.
    pub fn validate_zone(&self, path: &Path) -> Result<(), SchemaValidationError> {
        self.validate_yaml_file(path, "zone.schema.json")
    }

    /// Validate a compliance profile YAML descriptor against `profile.schema.json`.
    pub fn validate_profile(&self, path: &Path) -> Result<(), SchemaValidationError> {
        self.validate_yaml_file(path, "profile.schema.json")
    }

    fn validate_yaml_file(&self, path: &Path, schema_filename: &str) -> Result<(), SchemaValidationError> {
        if !path.exists() {
            return Err(SchemaValidationError::DocumentLoadError { path: path.display().to_string(), reason: "file does not exist".to_string() });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| SchemaValidationError::DocumentLoadError { path: path.display().to_string(), reason: e.to_string() })?;
        let value: Value = serde_yaml::from_str(&content)
            .map_err(|e| SchemaValidationError::DocumentLoadError { path: path.display().to_string(), reason: format!("YAML parse error: {e}") })?;
        let schema_id = format!("{SCHEMA_URI_PREFIX}{schema_filename}");
        self.validate_value(&value, &schema_id)
    }

    /// Recursively find directories under `modules_dir` containing a `module.yaml`.
    pub fn find_all_modules(modules_dir: &Path) -> Vec<PathBuf> {
        if !modules_dir.is_dir() {
            return Vec::new();
        }
        let mut result = Vec::new();
        Self::walk_for_modules(modules_dir, &mut result);
        result.sort();
        result
    }

    /// Validate every module descriptor found under `modules_dir`, returning
    /// a pass/fail summary rather than stopping at the first failure.
    pub fn validate_all_modules(&self, modules_dir: &Path) -> ModuleValidationReport {
        let module_dirs = Self::find_all_modules(modules_dir);
        let total = module_dirs.len();
        let mut passed = 0usize;
        let mut failures = Vec::new();

        for dir in &module_dirs {
            match self.validate_module(dir) {
                Ok(()) => passed += 1,
                Err(error) => failures.push(ModuleFailure { module_dir: dir.clone(), error }),
            }
        }

        ModuleValidationReport { total, passed, failed: failures.len(), failures }
    }

    fn glob_schemas(dir: &Path) -> Result<Vec<PathBuf>, SchemaValidationError> {
        let mut results = Vec::new();
        Self::walk_for_schemas(dir, &mut results)?;
        results.sort();
        Ok(results)
    }

    fn walk_for_schemas(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), SchemaValidationError> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::walk_for_schemas(&path, acc)?;
            } else if path.file_name().and_then(|f| f.to_str()).is_some_and(|n| n.ends_with(".schema.json")) {
                acc.push(path);
            }
        }
        Ok(())
    }

    fn walk_for_modules(dir: &Path, acc: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else { return };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if path.join("module.yaml").exists() {
                    acc.push(path.clone());
                }
                Self::walk_for_modules(&path, acc);
            }
        }
    }
}

/// Result of validating every module descriptor under a directory.
#[derive(Debug)]
pub struct ModuleValidationReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<ModuleFailure>,
}

/// A single module validation failure.
#[derive(Debug)]
pub struct ModuleFailure {
    pub module_dir: PathBuf,
    pub error: SchemaValidationError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_with_id(id: &str, body: &str) -> String {
        format!(r#"{{"$id": "{id}", {body}}}"#)
    }

    fn validator_with_module_schema() -> (tempfile::TempDir, SchemaValidator) {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("module.schema.json"),
            schema_with_id(
                &format!("{SCHEMA_URI_PREFIX}module.schema.json"),
                r#""type": "object", "required": ["module_id", "version"], "properties": {"module_id": {"type": "string"}, "version": {"type": "string", "pattern": "^\\d+\\.\\d+\\.\\d+$"}}"#,
            ),
        )
        .unwrap();
        let validator = SchemaValidator::new(tmp.path()).expect("load schemas");
        (tmp, validator)
    }

    #[test]
    fn test_validate_valid_module_data() {
        let (_tmp, validator) = validator_with_module_schema();
        let value = json!({"module_id": "org.example.test", "version": "0.1.0"});
        let schema_id = format!("{SCHEMA_URI_PREFIX}module.schema.json");
        assert!(validator.validate_value(&value, &schema_id).is_ok());
    }

    #[test]
    fn test_validate_invalid_module_missing_required() {
        let (_tmp, validator) = validator_with_module_schema();
        let value = json!({"module_id": "org.example.broken"});
        let schema_id = format!("{SCHEMA_URI_PREFIX}module.schema.json");
        let result = validator.validate_value(&value, &schema_id);
        assert!(matches!(result, Err(SchemaValidationError::ValidationFailed { .. })));
    }

    #[test]
    fn test_validate_bad_version_format() {
        let (_tmp, validator) = validator_with_module_schema();
        let value = json!({"module_id": "org.example.badver", "version": "not-a-semver"});
        let schema_id = format!("{SCHEMA_URI_PREFIX}module.schema.json");
        assert!(validator.validate_value(&value, &schema_id).is_err());
    }

    #[test]
    fn test_schema_not_found() {
        let (_tmp, validator) = validator_with_module_schema();
        let result = validator.validate_value(&json!({}), "https://nonexistent.example/schema.json");
        assert!(matches!(result, Err(SchemaValidationError::SchemaNotFound(_))));
    }

    #[test]
    fn test_validate_by_filename() {
        let (_tmp, validator) = validator_with_module_schema();
        let value = json!({"module_id": "org.example.test", "version": "0.1.0"});
        assert!(validator.validate_value_by_filename(&value, "module.schema.json").is_ok());
    }

    #[test]
    fn test_schema_validator_from_nonexistent_dir() {
        let validator = SchemaValidator::new("/tmp/definitely-not-a-real-dir-msez-test").unwrap();
        assert_eq!(validator.schema_count(), 0);
    }

    #[test]
    fn test_schema_without_id_derives_uri() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("custom.schema.json"), r#"{"type": "object"}"#).unwrap();
        let validator = SchemaValidator::new(tmp.path()).expect("load schemas");
        assert_eq!(validator.schema_count(), 1);
        assert!(validator.schema_ids()[0].contains("custom.schema.json"));
    }

    #[test]
    fn test_schema_load_error_invalid_json() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bad.schema.json"), "not valid json").unwrap();
        assert!(matches!(SchemaValidator::new(tmp.path()), Err(SchemaValidationError::SchemaLoadError { .. })));
    }

    #[test]
    fn test_validate_module_nonexistent_path() {
        let (_tmp, validator) = validator_with_module_schema();
        let result = validator.validate_module(Path::new("/tmp/no-such-module-dir-msez"));
        assert!(matches!(result, Err(SchemaValidationError::DocumentLoadError { .. })));
    }

    #[test]
    fn test_validate_all_modules_report() {
        let (tmp, validator) = validator_with_module_schema();
        let modules_dir = tmp.path().join("modules");
        let good = modules_dir.join("a");
        let bad = modules_dir.join("b");
        std::fs::create_dir_all(&good).unwrap();
        std::fs::create_dir_all(&bad).unwrap();
        std::fs::write(good.join("module.yaml"), "module_id: org.example.a\nversion: 1.0.0\n").unwrap();
        std::fs::write(bad.join("module.yaml"), "module_id: org.example.b\n").unwrap();

        let report = validator.validate_all_modules(&modules_dir);
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_find_all_modules_nonexistent_dir() {
        assert!(SchemaValidator::find_all_modules(Path::new("/tmp/no-such-modules-dir")).is_empty());
    }

    #[test]
    fn test_io_error_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SchemaValidationError = io_err.into();
        assert!(format!("{err}").contains("io error"));
    }
}
