//! # Root Configuration and Validation

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sections::{
    AnchorConfig, MigrationConfig, ObservabilityConfig, SecurityConfig, TensorConfig, VmConfig,
    WatcherConfig,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tensor: TensorConfig,
    pub vm: VmConfig,
    pub watcher: WatcherConfig,
    pub anchor: AnchorConfig,
    pub migration: MigrationConfig,
    pub security: SecurityConfig,
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Validate cross-cutting invariants not already enforced by the
    /// field types themselves (matching `config.py`'s `validate()`,
    /// which re-runs each `ConfigValue`'s validator).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.vm.stack_depth_max == 0 || self.vm.stack_depth_max > 4096 {
            errors.push(format!(
                "vm.stack_depth_max must be in 1..=4096, got {}",
                self.vm.stack_depth_max
            ));
        }
        if self.watcher.slash_percentage_default_bps > 10_000 {
            errors.push(format!(
                "watcher.slash_percentage_default_bps must be 0..=10000, got {}",
                self.watcher.slash_percentage_default_bps
            ));
        }
        if self.watcher.quorum_percentage_bps == 0 || self.watcher.quorum_percentage_bps > 10_000 {
            errors.push(format!(
                "watcher.quorum_percentage_bps must be 1..=10000, got {}",
                self.watcher.quorum_percentage_bps
            ));
        }
        if self.anchor.gas_price_multiplier_bps < 10_000 {
            errors.push(format!(
                "anchor.gas_price_multiplier_bps must be >= 10000, got {}",
                self.anchor.gas_price_multiplier_bps
            ));
        }
        if !matches!(self.observability.log_level.as_str(), "debug" | "info" | "warning" | "error" | "critical") {
            errors.push(format!("observability.log_level invalid: {}", self.observability.log_level));
        }
        if !matches!(self.observability.log_format.as_str(), "json" | "text") {
            errors.push(format!("observability.log_format invalid: {}", self.observability.log_format));
        }
        if !(1024..=65535).contains(&self.observability.metrics_port) {
            errors.push(format!("observability.metrics_port must be 1024..=65535, got {}", self.observability.metrics_port));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
