//! Account addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account address.
///
/// Addresses are opaque byte strings whose expected length is dictated by the
/// configured address scheme. An address that is zero-length or all zero
/// bytes is "empty" and resolves to the local shard wherever a shard id is
/// derived from it.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address(Vec<u8>);

impl Address {
    /// Wrap raw address bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length of the address.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the address is empty (zero-length or all zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty() || self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0))
    }
}
