//! Transaction block bodies.

use crate::ShardId;
use serde::{Deserialize, Serialize};

/// A batch of transaction hashes moving between one shard pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniBlock {
    /// Hashes of the transactions in this miniblock.
    pub tx_hashes: Vec<Vec<u8>>,
    /// Shard the transactions originate from.
    pub sender_shard: ShardId,
    /// Shard the transactions are destined for.
    pub receiver_shard: ShardId,
}

/// The body of a block: the miniblocks it carries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockBody {
    pub miniblocks: Vec<MiniBlock>,
}
