//! State-trie node interception.

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use shardline_core::{Codec, Hasher, ProcessError};
use shardline_types::{Hash, TrieNodePayload};
use std::sync::Arc;

/// A decoded trie node.
#[derive(Debug, Clone)]
pub struct InterceptedTrieNode {
    pub node: TrieNodePayload,
    hash: Hash,
}

impl InterceptedPayload for InterceptedTrieNode {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        // Trie nodes are only delivered on topics this node requested.
        true
    }

    fn payload_type(&self) -> &'static str {
        "trie node"
    }
}

/// Decodes and validates trie nodes.
pub struct TrieNodeFactory<C: Codec> {
    codec: Arc<C>,
    hasher: Arc<dyn Hasher>,
}

impl<C: Codec> TrieNodeFactory<C> {
    pub fn new(codec: Arc<C>, hasher: Arc<dyn Hasher>) -> Self {
        Self { codec, hasher }
    }
}

impl<C: Codec> PayloadFactory<InterceptedTrieNode> for TrieNodeFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedTrieNode, ProcessError> {
        let node: TrieNodePayload = self.codec.decode(raw)?;
        let hash = self.hasher.compute(raw);
        Ok(InterceptedTrieNode { node, hash })
    }

    fn check_validity(&self, payload: &InterceptedTrieNode) -> Result<(), ProcessError> {
        if payload.node.key.is_empty() {
            return Err(ProcessError::EmptyField("key"));
        }
        if payload.node.value.is_empty() {
            return Err(ProcessError::EmptyField("value"));
        }
        Ok(())
    }
}
