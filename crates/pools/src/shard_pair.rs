//! Shard-pair cache identifiers.

use shardline_types::ShardId;

/// The sub-cache identifier for traffic between two shards: `"S"` when the
/// transaction stays within one shard, `"S_R"` otherwise.
pub fn shard_pair_id(sender: ShardId, receiver: ShardId) -> String {
    if sender == receiver {
        format!("{sender}")
    } else {
        format!("{sender}_{receiver}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_pair_forms() {
        assert_eq!(shard_pair_id(ShardId(0), ShardId(0)), "0");
        assert_eq!(shard_pair_id(ShardId(0), ShardId(2)), "0_2");
        assert_eq!(shard_pair_id(ShardId(2), ShardId(0)), "2_0");
        assert_eq!(shard_pair_id(ShardId::METACHAIN, ShardId(1)), "META_1");
    }
}
