//! State-trie node payloads.

use serde::{Deserialize, Serialize};

/// A serialized trie node requested during state sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNodePayload {
    /// The node's key in the trie.
    pub key: Vec<u8>,
    /// The serialized node content.
    pub value: Vec<u8>,
}
