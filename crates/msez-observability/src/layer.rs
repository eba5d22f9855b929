//! # Stack Layers
//!
//! Tags a span or metric with the subsystem that produced it, so a
//! single correlation ID can be traced across crate boundaries.

use serde::{Deserialize, Serialize};

/// A subsystem within the SEZ Stack, used to tag spans and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackLayer {
    Tensor,
    Vm,
    Zk,
    Manifold,
    Migration,
    Bridge,
    Anchor,
    Watcher,
    Security,
    Config,
    Api,
    Cli,
}

impl StackLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            StackLayer::Tensor => "tensor",
            StackLayer::Vm => "vm",
            StackLayer::Zk => "zk",
            StackLayer::Manifold => "manifold",
            StackLayer::Migration => "migration",
            StackLayer::Bridge => "bridge",
            StackLayer::Anchor => "anchor",
            StackLayer::Watcher => "watcher",
            StackLayer::Security => "security",
            StackLayer::Config => "config",
            StackLayer::Api => "api",
            StackLayer::Cli => "cli",
        }
    }
}

impl std::fmt::Display for StackLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_rename() {
        assert_eq!(StackLayer::Watcher.to_string(), "watcher");
        assert_eq!(StackLayer::Vm.to_string(), "vm");
    }
}
