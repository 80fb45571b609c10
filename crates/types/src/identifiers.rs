//! Identifier newtypes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A shard identifier.
///
/// Shards partition the address space; [`ShardId::METACHAIN`] is the
/// distinguished shard coordinating cross-shard operations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShardId(pub u32);

impl ShardId {
    /// The metachain shard sentinel.
    pub const METACHAIN: Self = Self(u32::MAX);

    /// Whether this is the metachain shard.
    pub fn is_metachain(&self) -> bool {
        *self == Self::METACHAIN
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_metachain() {
            write!(f, "META")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShardId({self})")
    }
}

/// Monotonic consensus round index produced by the external round clock.
pub type RoundIndex = i64;

/// An opaque peer identity assigned by the transport layer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(Vec<u8>);

impl PeerId {
    /// Wrap raw transport-level identity bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw identity bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({self})")
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metachain_sentinel() {
        assert!(ShardId::METACHAIN.is_metachain());
        assert!(!ShardId(0).is_metachain());
        assert_eq!(ShardId::METACHAIN.to_string(), "META");
        assert_eq!(ShardId(3).to_string(), "3");
    }

    #[test]
    fn test_peer_id_display_is_hex() {
        let peer = PeerId::from_bytes(vec![0xab, 0xcd]);
        assert_eq!(peer.to_string(), "abcd");
    }
}
