//! Transaction payloads accepted over the wire.

use crate::{Address, ShardId};
use serde::{Deserialize, Serialize};

/// A user-signed value transfer or contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender account nonce.
    pub nonce: u64,
    /// Transferred value.
    pub value: u128,
    /// Receiver address.
    pub receiver: Address,
    /// Sender address; also the sender's public key bytes.
    pub sender: Address,
    /// Gas price offered.
    pub gas_price: u64,
    /// Gas limit for execution.
    pub gas_limit: u64,
    /// Optional call data.
    pub data: Vec<u8>,
    /// Sender signature over the signing payload.
    pub signature: Vec<u8>,
}

impl Transaction {
    /// The transaction with its signature field cleared.
    ///
    /// The signature covers the serialized form of this value.
    pub fn unsigned_form(&self) -> Self {
        Self {
            signature: Vec::new(),
            ..self.clone()
        }
    }
}

/// A protocol-generated reward payout, minted on the metachain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTransaction {
    /// Round the reward was granted in.
    pub round: u64,
    /// Epoch the reward was granted in.
    pub epoch: u32,
    /// Rewarded value.
    pub value: u128,
    /// Receiver address.
    pub receiver: Address,
}

/// An unsigned transaction produced by smart-contract execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    /// Result nonce.
    pub nonce: u64,
    /// Transferred value.
    pub value: u128,
    /// Receiver address.
    pub receiver: Address,
    /// Sender address.
    pub sender: Address,
    /// Result data.
    pub data: Vec<u8>,
    /// Hash of the originating signed transaction.
    pub original_tx_hash: Vec<u8>,
}

/// A transaction annotated with the shard pair it travels between.
///
/// This is the value stored in the block-transaction pool; the shard ids are
/// resolved once at interception time so downstream consumers never re-derive
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedTransaction {
    /// The wrapped transaction.
    pub tx: Transaction,
    /// Shard the sender address maps to.
    pub sender_shard: ShardId,
    /// Shard the receiver address maps to.
    pub receiver_shard: ShardId,
}
