//! # Configuration Loading
//!
//! Layers configuration sources by precedence, lowest to highest:
//!
//! 1. Defaults (`Config::default()`, via `serde(default)` on every field)
//! 2. Project config file (`./msez.yaml`)
//! 3. User config file (`~/.msez/config.yaml`)
//! 4. Runtime overrides (CLI flags, applied by the caller via `clap`)
//! 5. Environment variables (`MSEZ_*`)
//!
//! Mirrors `original_source/tools/phoenix/config.py`'s documented
//! precedence order, adapted to Rust's static-typing: instead of a
//! `ConfigValue.get()` that checks the environment on every read, env
//! vars are applied once at load time and baked into the resulting
//! `Config`.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ConfigError;
use crate::overrides::RuntimeOverrides;

/// Merge YAML document `overlay` on top of `base`, recursively — a key
/// present in `overlay` replaces the same key in `base`; maps merge
/// key-by-key; any other type replaces wholesale.
fn merge_yaml(base: serde_yaml::Value, overlay: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_yaml(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

fn load_yaml_file(path: &Path) -> Result<serde_yaml::Value, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A single `MSEZ_*` environment variable override, applied after file
/// loading and runtime overrides — the highest-precedence layer.
struct EnvBinding {
    var: &'static str,
    apply: fn(&mut Config, &str) -> Result<(), ConfigError>,
}

fn parse_u64(var: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
        reason: "expected an integer".to_string(),
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

const ENV_BINDINGS: &[EnvBinding] = &[
    EnvBinding {
        var: "MSEZ_TENSOR_CACHE_TTL",
        apply: |c, v| {
            c.tensor.cache_ttl_seconds = parse_u64("MSEZ_TENSOR_CACHE_TTL", v)?;
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_VM_GAS_LIMIT",
        apply: |c, v| {
            c.vm.gas_limit_default = parse_u64("MSEZ_VM_GAS_LIMIT", v)?;
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_VM_STACK_DEPTH",
        apply: |c, v| {
            c.vm.stack_depth_max = parse_u64("MSEZ_VM_STACK_DEPTH", v)?;
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_VM_DEBUG",
        apply: |c, v| {
            c.vm.enable_debug_opcodes = parse_bool("MSEZ_VM_DEBUG", v)?;
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_WATCHER_MIN_COLLATERAL",
        apply: |c, v| {
            c.watcher.min_collateral_usd = parse_u64("MSEZ_WATCHER_MIN_COLLATERAL", v)?;
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_SECURITY_RATE_LIMIT",
        apply: |c, v| {
            c.security.rate_limit_requests_per_second = parse_u64("MSEZ_SECURITY_RATE_LIMIT", v)?;
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_LOG_LEVEL",
        apply: |c, v| {
            c.observability.log_level = v.to_string();
            Ok(())
        },
    },
    EnvBinding {
        var: "MSEZ_METRICS_PORT",
        apply: |c, v| {
            c.observability.metrics_port = parse_u64("MSEZ_METRICS_PORT", v)?.try_into().map_err(|_| ConfigError::InvalidEnv {
                var: "MSEZ_METRICS_PORT".to_string(),
                value: v.to_string(),
                reason: "must fit in a u16".to_string(),
            })?;
            Ok(())
        },
    },
];

fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    for binding in ENV_BINDINGS {
        if let Ok(value) = std::env::var(binding.var) {
            (binding.apply)(config, &value)?;
        }
    }
    Ok(())
}

/// Load configuration from the documented sources, in precedence order.
/// `runtime_overrides`, when given, is applied after the project/user
/// files and before environment variables.
pub fn load(
    project_path: Option<&Path>,
    user_path: Option<&Path>,
    runtime_overrides: Option<&RuntimeOverrides>,
) -> Result<Config, ConfigError> {
    let mut merged = serde_yaml::to_value(Config::default()).expect("Config serializes");

    if let Some(path) = project_path {
        if path.exists() {
            merged = merge_yaml(merged, load_yaml_file(path)?);
        }
    }
    if let Some(path) = user_path {
        if path.exists() {
            merged = merge_yaml(merged, load_yaml_file(path)?);
        }
    }

    let mut config: Config = serde_yaml::from_value(merged).map_err(|source| ConfigError::Parse {
        path: PathBuf::from("<merged>"),
        source,
    })?;

    if let Some(overrides) = runtime_overrides {
        config = overrides.apply(config);
    }

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// The default user config file location, `~/.msez/config.yaml`.
pub fn default_user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(".msez").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_with_no_files_returns_defaults() {
        let config = load(None, None, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msez.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "vm:\n  gas_limit_default: 42").unwrap();

        let config = load(Some(&path), None, None).unwrap();
        assert_eq!(config.vm.gas_limit_default, 42);
        assert_eq!(config.vm.stack_depth_max, Config::default().vm.stack_depth_max);
    }

    #[test]
    fn test_user_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("msez.yaml");
        std::fs::write(&project_path, "vm:\n  gas_limit_default: 42\n").unwrap();
        let user_path = dir.path().join("user.yaml");
        std::fs::write(&user_path, "vm:\n  gas_limit_default: 99\n").unwrap();

        let config = load(Some(&project_path), Some(&user_path), None).unwrap();
        assert_eq!(config.vm.gas_limit_default, 99);
    }

    #[test]
    fn test_env_var_overrides_everything() {
        std::env::set_var("MSEZ_VM_GAS_LIMIT", "7");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msez.yaml");
        std::fs::write(&path, "vm:\n  gas_limit_default: 42\n").unwrap();

        let config = load(Some(&path), None, None).unwrap();
        std::env::remove_var("MSEZ_VM_GAS_LIMIT");
        assert_eq!(config.vm.gas_limit_default, 7);
    }

    #[test]
    fn test_invalid_env_var_is_an_error() {
        std::env::set_var("MSEZ_VM_GAS_LIMIT", "not-a-number");
        let err = load(None, None, None);
        std::env::remove_var("MSEZ_VM_GAS_LIMIT");
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = load(Some(Path::new("/nonexistent/msez.yaml")), None, None).unwrap();
        assert_eq!(config, Config::default());
    }
}
