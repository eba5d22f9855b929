//! # Runtime Overrides
//!
//! CLI flags that sit above file-based configuration but below
//! environment variables in precedence, using the same `clap` derive
//! style as `msez-cli`'s subcommand arguments.

use clap::Args;

use crate::config::Config;

#[derive(Debug, Clone, Default, Args)]
pub struct RuntimeOverrides {
    /// Override `vm.gas_limit_default`.
    #[arg(long)]
    pub vm_gas_limit: Option<u64>,
    /// Override `watcher.min_collateral_usd`.
    #[arg(long)]
    pub watcher_min_collateral: Option<u64>,
    /// Override `observability.log_level`.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl RuntimeOverrides {
    /// Apply these overrides onto an already-loaded `Config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(v) = self.vm_gas_limit {
            config.vm.gas_limit_default = v;
        }
        if let Some(v) = self.watcher_min_collateral {
            config.watcher.min_collateral_usd = v;
        }
        if let Some(ref v) = self.log_level {
            config.observability.log_level = v.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overrides_is_identity() {
        let base = Config::default();
        let overrides = RuntimeOverrides::default();
        assert_eq!(overrides.apply(base.clone()), base);
    }

    #[test]
    fn test_override_applies_single_field() {
        let base = Config::default();
        let overrides = RuntimeOverrides {
            vm_gas_limit: Some(123),
            ..Default::default()
        };
        let result = overrides.apply(base);
        assert_eq!(result.vm.gas_limit_default, 123);
    }
}
