//! Well-known topic names.
//!
//! Topic names are a base prefix plus, for shard-scoped channels, the
//! communication identifier produced by the shard coordinator (`_S`, `_A_B`
//! or `_S_META`).

/// User transactions.
pub const TRANSACTIONS: &str = "transactions";

/// Smart-contract result transactions.
pub const UNSIGNED_TRANSACTIONS: &str = "unsignedTransactions";

/// Protocol reward transactions.
pub const REWARDS_TRANSACTIONS: &str = "rewardsTransactions";

/// Shard block headers.
pub const SHARD_BLOCKS: &str = "shardBlocks";

/// Metachain block headers (a global topic, no shard suffix).
pub const METACHAIN_BLOCKS: &str = "metachainBlocks";

/// Transaction block bodies (miniblocks).
pub const TX_BLOCK_BODIES: &str = "txBlockBodies";

/// Account-state trie nodes.
pub const ACCOUNT_TRIE_NODES: &str = "accountTrieNodes";

/// Validator-state trie nodes.
pub const VALIDATOR_TRIE_NODES: &str = "validatorTrieNodes";

/// Compose a shard-scoped topic name from its prefix and communication
/// identifier.
pub fn scoped(prefix: &str, communication_identifier: &str) -> String {
    format!("{prefix}{communication_identifier}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_topic() {
        assert_eq!(scoped(TRANSACTIONS, "_0_1"), "transactions_0_1");
        assert_eq!(scoped(SHARD_BLOCKS, "_2"), "shardBlocks_2");
    }
}
