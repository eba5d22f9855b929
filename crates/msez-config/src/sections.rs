//! # Per-Component Configuration Sections
//!
//! One struct per subsystem, mirroring the component configs in
//! `original_source/tools/phoenix/config.py` (`TensorConfig`,
//! `VMConfig`, `WatcherConfig`, `AnchorConfig`, `MigrationConfig`,
//! `SecurityConfig`, `ObservabilityConfig`). `serde(default)` on every
//! field gives the "default values" precedence layer for free: a
//! partial YAML document deserializes with the rest filled in from
//! `Default`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensorConfig {
    pub cache_ttl_seconds: u64,
    pub max_sparse_cells: u64,
    pub merkle_batch_size: u64,
}

impl Default for TensorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 300,
            max_sparse_cells: 1_000_000,
            merkle_batch_size: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    pub gas_limit_default: u64,
    pub stack_depth_max: u64,
    pub memory_limit_bytes: u64,
    pub enable_debug_opcodes: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            gas_limit_default: 10_000_000,
            stack_depth_max: 1024,
            memory_limit_bytes: 1024 * 1024,
            enable_debug_opcodes: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub min_collateral_usd: u64,
    /// Basis points, 0-10000, so the type can stay an integer.
    pub slash_percentage_default_bps: u32,
    pub attestation_timeout_seconds: u64,
    pub quorum_percentage_bps: u32,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            min_collateral_usd: 1_000,
            slash_percentage_default_bps: 1_000,
            attestation_timeout_seconds: 300,
            quorum_percentage_bps: 6_700,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub confirmation_blocks_ethereum: u64,
    pub confirmation_blocks_arbitrum: u64,
    pub gas_price_multiplier_bps: u32,
    pub max_retry_attempts: u32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            confirmation_blocks_ethereum: 12,
            confirmation_blocks_arbitrum: 1,
            gas_price_multiplier_bps: 12_000,
            max_retry_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub timeout_seconds: u64,
    pub max_concurrent_migrations: u32,
    pub compensation_retry_limit: u32,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 3_600,
            max_concurrent_migrations: 100,
            compensation_retry_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub nonce_ttl_seconds: u64,
    pub rate_limit_requests_per_second: u64,
    pub time_lock_min_seconds: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            nonce_ttl_seconds: 300,
            rate_limit_requests_per_second: 100,
            time_lock_min_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
    pub enable_tracing: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "json".to_string(),
            enable_tracing: true,
            metrics_port: 9090,
        }
    }
}
