//! # msez-config
//!
//! Typed configuration tree for the SEZ Stack, loaded from defaults,
//! YAML files, runtime overrides, and environment variables, in that
//! precedence order (lowest to highest).
//!
//! ## Implements
//!
//! Grounded on `original_source/tools/phoenix/config.py`'s documented
//! five-source precedence model, reimplemented with `serde`/
//! `serde_yaml` typed structs instead of a runtime `ConfigValue`
//! wrapper — Rust's type system gives per-field defaults and
//! coercion for free through `#[serde(default)]` and `Deserialize`,
//! so there's no need for the original's reflective `ConfigValue[T]`
//! container. The runtime-override layer is a `clap::Args` struct, in
//! the same derive style as `msez-cli`'s subcommand arguments.

mod config;
mod error;
mod loader;
mod overrides;
mod sections;

pub use config::Config;
pub use error::ConfigError;
pub use loader::{default_user_config_path, load};
pub use overrides::RuntimeOverrides;
pub use sections::{
    AnchorConfig, MigrationConfig, ObservabilityConfig, SecurityConfig, TensorConfig, VmConfig,
    WatcherConfig,
};
