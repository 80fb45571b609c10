//! Antiflood configuration.

use serde::Deserialize;
use shardline_storage::CacheConfig;

/// Message and byte budget for one interval.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuotaLimitConfig {
    /// Messages allowed per reset interval.
    #[serde(default = "default_messages_per_interval")]
    pub messages_per_interval: u32,

    /// Bytes allowed per reset interval.
    #[serde(default = "default_total_size_per_interval")]
    pub total_size_per_interval: u64,
}

fn default_messages_per_interval() -> u32 {
    400
}

fn default_total_size_per_interval() -> u64 {
    // 10 MiB
    10 * 1024 * 1024
}

impl Default for QuotaLimitConfig {
    fn default() -> Self {
        Self {
            messages_per_interval: default_messages_per_interval(),
            total_size_per_interval: default_total_size_per_interval(),
        }
    }
}

/// Antiflood configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AntifloodConfig {
    /// When false, the factory returns the always-admit handler.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Quota cache bounds.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Per-peer budget for inbound traffic.
    #[serde(default)]
    pub peer_max_input: QuotaLimitConfig,

    /// Node-global budget for inbound traffic.
    #[serde(default = "default_network_max_input")]
    pub network_max_input: QuotaLimitConfig,

    /// Per-peer budget for outbound traffic. The output direction carries no
    /// global budget.
    #[serde(default = "default_peer_max_output")]
    pub peer_max_output: QuotaLimitConfig,

    /// Messages one peer may publish on a single topic per interval.
    #[serde(default = "default_max_messages_per_topic")]
    pub max_messages_per_topic: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_network_max_input() -> QuotaLimitConfig {
    QuotaLimitConfig {
        messages_per_interval: 10_000,
        total_size_per_interval: 250 * 1024 * 1024,
    }
}

fn default_peer_max_output() -> QuotaLimitConfig {
    QuotaLimitConfig {
        messages_per_interval: 75,
        total_size_per_interval: 2 * 1024 * 1024,
    }
}

fn default_max_messages_per_topic() -> u32 {
    1000
}

impl Default for AntifloodConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            cache: CacheConfig::default(),
            peer_max_input: QuotaLimitConfig::default(),
            network_max_input: default_network_max_input(),
            peer_max_output: default_peer_max_output(),
            max_messages_per_topic: default_max_messages_per_topic(),
        }
    }
}
