//! Cache configuration.

use serde::Deserialize;

/// Supported cache kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CacheKind {
    #[default]
    #[serde(rename = "LRU")]
    Lru,
}

/// Configuration for one bounded cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Eviction policy.
    #[serde(default)]
    pub kind: CacheKind,

    /// Maximum number of entries.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Internal shard count for sharded cache kinds. Unused by the LRU
    /// implementation, kept so configurations stay forward compatible.
    #[serde(default = "default_shards")]
    pub shards: u32,
}

fn default_capacity() -> usize {
    10_000
}

fn default_shards() -> u32 {
    1
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            kind: CacheKind::Lru,
            capacity: default_capacity(),
            shards: default_shards(),
        }
    }
}
