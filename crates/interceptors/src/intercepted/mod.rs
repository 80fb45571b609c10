//! Intercepted payload types and their factories.
//!
//! A factory owns the collaborator handles for one topic family: it decodes
//! raw bytes into a typed payload (computing the content hash on the way)
//! and runs the family's structural checks. Payloads themselves are plain
//! data, so they can be handed to a sink or a test without dragging handles
//! along.

mod block_body;
mod header;
mod reward;
mod transaction;
mod trie_node;
mod unsigned;

pub use block_body::{BlockBodyFactory, InterceptedBlockBody};
pub use header::{HeaderFactory, InterceptedHeader, InterceptedMetaHeader, MetaHeaderFactory};
pub use reward::{InterceptedRewardTx, RewardTxFactory};
pub use transaction::{InterceptedTransaction, TransactionFactory};
pub use trie_node::{InterceptedTrieNode, TrieNodeFactory};
pub use unsigned::{InterceptedUnsignedTx, UnsignedTxFactory};

use shardline_core::ProcessError;
use shardline_types::Hash;

/// A decoded, hashed payload moving through an interceptor.
pub trait InterceptedPayload: Send + Sync {
    /// Content hash of the raw payload; the pool key.
    fn hash(&self) -> Hash;

    /// Whether this node's shard should keep the payload. Payloads for
    /// other shards are dropped after validation without reaching a pool.
    fn is_for_current_shard(&self) -> bool;

    /// Short name for log lines.
    fn payload_type(&self) -> &'static str;
}

/// Decodes and validates payloads for one topic family.
pub trait PayloadFactory<T: InterceptedPayload>: Send + Sync {
    /// Decode raw bytes, compute the content hash and derive routing
    /// information. Fails on malformed bytes; structural rules are checked
    /// separately by [`check_validity`](Self::check_validity).
    fn create(&self, raw: &[u8]) -> Result<T, ProcessError>;

    /// Run the family's structural checks against a decoded payload.
    fn check_validity(&self, payload: &T) -> Result<(), ProcessError>;
}
