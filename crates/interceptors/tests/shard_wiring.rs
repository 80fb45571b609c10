//! End-to-end wiring: factory -> transport -> interceptors -> pools.

use shardline_antiflood::{
    AntifloodHandler, DisabledAntiflood, FloodGate, GateLimits, P2pAntiflood, TopicFloodGate,
};
use shardline_core::{BincodeCodec, Blacklist, Blake3Hasher, Codec, ProcessError};
use shardline_interceptors::{ShardInterceptorsFactory, ShardInterceptorsFactoryArgs};
use shardline_pools::{HeaderPoolValue, PoolValue, PoolsHolder};
use shardline_storage::BoundedLruCache;
use shardline_test_helpers::{
    test_signature, InMemoryAccounts, InMemoryBlacklist, InMemoryMessenger, InMemoryPoolsHolder,
    LastByteShardCoordinator, StubBlockSignatureVerifier, StubChronologyValidator, StubFeeChecker,
    TestAddressScheme, TestKeyGenerator, TestSignatureVerifier,
};
use shardline_types::{
    Address, BlockBody, Hash, MetaHeader, MiniBlock, PeerId, ShardId, Transaction,
    TrieNodePayload,
};
use std::sync::Arc;

const CHAIN_ID: &[u8] = b"shardline-testnet";
const MAX_NONCE_DELTA: u32 = 100;

struct Fixture {
    coordinator: Arc<LastByteShardCoordinator>,
    messenger: Arc<InMemoryMessenger>,
    pools: Arc<InMemoryPoolsHolder>,
    accounts: Arc<InMemoryAccounts>,
    blacklist: Arc<InMemoryBlacklist>,
    codec: Arc<BincodeCodec>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            coordinator: Arc::new(LastByteShardCoordinator::new(ShardId(0), 2)),
            messenger: Arc::new(InMemoryMessenger::new()),
            pools: Arc::new(InMemoryPoolsHolder::new(100)),
            accounts: Arc::new(InMemoryAccounts::new()),
            blacklist: Arc::new(InMemoryBlacklist::new()),
            codec: Arc::new(BincodeCodec::default()),
        }
    }

    fn args(&self, antiflood: Arc<dyn AntifloodHandler>) -> ShardInterceptorsFactoryArgs<BincodeCodec> {
        ShardInterceptorsFactoryArgs {
            coordinator: Arc::clone(&self.coordinator) as _,
            messenger: Arc::clone(&self.messenger) as _,
            pools: Arc::clone(&self.pools) as _,
            codec: Arc::clone(&self.codec),
            hasher: Arc::new(Blake3Hasher),
            accounts: Arc::clone(&self.accounts) as _,
            keygen: Arc::new(TestKeyGenerator),
            signer: Arc::new(TestSignatureVerifier),
            block_signature_verifier: Arc::new(StubBlockSignatureVerifier::default()),
            chronology_validator: Arc::new(StubChronologyValidator::default()),
            fee_checker: Arc::new(StubFeeChecker::default()),
            blacklist: Arc::clone(&self.blacklist) as _,
            address_scheme: Arc::new(TestAddressScheme),
            antiflood,
            chain_id: CHAIN_ID.to_vec(),
            max_tx_nonce_delta: MAX_NONCE_DELTA,
        }
    }

    fn build(&self) -> shardline_interceptors::InterceptorsContainer {
        ShardInterceptorsFactory::new(self.args(Arc::new(DisabledAntiflood)))
            .unwrap()
            .create()
            .unwrap()
    }

    fn signed_tx(&self, sender_shard: ShardId, receiver_shard: ShardId, nonce: u64) -> Transaction {
        let mut tx = Transaction {
            nonce,
            value: 10,
            receiver: self.coordinator.address_in_shard(receiver_shard),
            sender: self.coordinator.address_in_shard(sender_shard),
            gas_price: 1,
            gas_limit: 50_000,
            data: Vec::new(),
            signature: Vec::new(),
        };
        let payload = self.codec.encode(&tx.unsigned_form()).unwrap();
        tx.signature = test_signature(&payload);
        tx
    }

    fn valid_meta_header(&self) -> MetaHeader {
        MetaHeader {
            nonce: 10,
            round: 10,
            epoch: 1,
            prev_hash: b"prev".to_vec(),
            prev_rand_seed: b"prev-seed".to_vec(),
            rand_seed: b"seed".to_vec(),
            pub_keys_bitmap: b"bitmap".to_vec(),
            signature: b"aggregate".to_vec(),
            root_hash: b"root".to_vec(),
            chain_id: CHAIN_ID.to_vec(),
            shard_header_hashes: Vec::new(),
        }
    }
}

fn peer() -> PeerId {
    PeerId::from("test-peer")
}

#[test]
fn test_create_builds_full_topic_set() {
    let f = Fixture::new();
    let container = f.build();

    // Shard 0 of 2 shards: transactions and unsigned and bodies get
    // (self, other, meta) each; rewards, shard headers and meta headers one
    // each; two trie-node topics.
    let expected = [
        "transactions_0",
        "transactions_0_1",
        "transactions_0_META",
        "unsignedTransactions_0",
        "unsignedTransactions_0_1",
        "unsignedTransactions_0_META",
        "rewardsTransactions_0_META",
        "shardBlocks_0",
        "metachainBlocks",
        "txBlockBodies_0",
        "txBlockBodies_0_1",
        "txBlockBodies_0_META",
        "accountTrieNodes_0_META",
        "validatorTrieNodes_0_META",
    ];
    assert_eq!(container.len(), expected.len());
    for topic in expected {
        assert!(container.get(topic).is_ok(), "missing topic {topic}");
    }
    assert_eq!(f.messenger.num_processors(), expected.len());
}

#[test]
fn test_empty_chain_id_rejected() {
    let f = Fixture::new();
    let mut args = f.args(Arc::new(DisabledAntiflood));
    args.chain_id = Vec::new();
    let err = ShardInterceptorsFactory::new(args).err().unwrap();
    assert_eq!(err, ProcessError::InvalidChainId);
    // Nothing was subscribed.
    assert_eq!(f.messenger.num_processors(), 0);
}

#[test]
fn test_zero_nonce_delta_rejected() {
    let f = Fixture::new();
    let mut args = f.args(Arc::new(DisabledAntiflood));
    args.max_tx_nonce_delta = 0;
    let err = ShardInterceptorsFactory::new(args).err().unwrap();
    assert!(matches!(err, ProcessError::InvalidValue { name, .. }
        if name == "max_tx_nonce_delta"));
}

#[test]
fn test_valid_transaction_reaches_pool() {
    let f = Fixture::new();
    f.build();

    let tx = f.signed_tx(ShardId(0), ShardId(1), 0);
    let raw = f.codec.encode(&tx).unwrap();
    let hash = Hash::from_bytes(&raw);

    f.messenger
        .deliver("transactions_0_1", raw, peer())
        .unwrap();

    let store = f.pools.transactions().shard_store("0_1").unwrap();
    match store.get(&hash) {
        Some(PoolValue::Block(routed)) => {
            assert_eq!(routed.tx, tx);
            assert_eq!(routed.sender_shard, ShardId(0));
            assert_eq!(routed.receiver_shard, ShardId(1));
        }
        other => panic!("unexpected pool value: {other:?}"),
    }
}

#[test]
fn test_bad_signature_dropped() {
    let f = Fixture::new();
    f.build();

    let mut tx = f.signed_tx(ShardId(0), ShardId(1), 0);
    tx.signature = b"forged".to_vec();
    let raw = f.codec.encode(&tx).unwrap();

    let err = f.messenger.deliver("transactions_0_1", raw, peer()).unwrap_err();
    assert_eq!(err, ProcessError::InvalidSignature);
    assert!(f.pools.transactions().shard_store("0_1").is_none());
}

#[test]
fn test_garbage_payload_dropped() {
    let f = Fixture::new();
    f.build();

    let err = f
        .messenger
        .deliver("transactions_0", vec![0xff, 0x13, 0x37], peer())
        .unwrap_err();
    assert!(matches!(err, ProcessError::Decode(_)));
}

#[test]
fn test_blacklisted_hash_dropped() {
    let f = Fixture::new();
    f.build();

    let tx = f.signed_tx(ShardId(0), ShardId(0), 0);
    let raw = f.codec.encode(&tx).unwrap();
    f.blacklist.add(Hash::from_bytes(&raw).as_ref().to_vec());

    let err = f.messenger.deliver("transactions_0", raw, peer()).unwrap_err();
    assert!(matches!(err, ProcessError::Blacklisted { .. }));
    assert!(f.pools.transactions().shard_store("0").is_none());
}

#[test]
fn test_nonce_too_far_ahead_dropped() {
    let f = Fixture::new();
    f.build();

    let sender = f.coordinator.address_in_shard(ShardId(0));
    f.accounts.set_nonce(sender, 5);

    let tx = f.signed_tx(ShardId(0), ShardId(0), 5 + MAX_NONCE_DELTA as u64 + 1);
    let raw = f.codec.encode(&tx).unwrap();

    let err = f.messenger.deliver("transactions_0", raw, peer()).unwrap_err();
    assert!(matches!(err, ProcessError::NonceTooFarAhead { .. }));
}

#[test]
fn test_transaction_for_other_shards_skipped() {
    let f = Fixture::new();
    f.build();

    // Shard 1 -> shard 1 traffic is decodable and valid but not ours.
    let tx = f.signed_tx(ShardId(1), ShardId(1), 0);
    let raw = f.codec.encode(&tx).unwrap();

    f.messenger
        .deliver("transactions_0_1", raw, peer())
        .unwrap();
    assert!(f.pools.transactions().shard_store("1").is_none());
}

#[test]
fn test_antiflood_rejection_blocks_pool_write() {
    let f = Fixture::new();
    let gate = FloodGate::new(
        Box::new(BoundedLruCache::new(16)),
        Vec::new(),
        GateLimits {
            max_messages_per_peer: 1,
            max_size_per_peer: 1 << 20,
            max_messages: u32::MAX,
            max_size: u64::MAX,
        },
    )
    .unwrap();
    let antiflood = Arc::new(P2pAntiflood::new(
        Arc::new(gate),
        Arc::new(TopicFloodGate::new(1000)),
    ));
    ShardInterceptorsFactory::new(f.args(antiflood))
        .unwrap()
        .create()
        .unwrap();

    let first = f.codec.encode(&f.signed_tx(ShardId(0), ShardId(0), 0)).unwrap();
    let second = f.codec.encode(&f.signed_tx(ShardId(0), ShardId(0), 1)).unwrap();

    f.messenger
        .deliver("transactions_0", first, peer())
        .unwrap();
    let err = f
        .messenger
        .deliver("transactions_0", second, peer())
        .unwrap_err();
    assert!(matches!(err, ProcessError::SystemBusy { .. }));

    let store = f.pools.transactions().shard_store("0").unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn test_meta_header_chain_id_mismatch_dropped() {
    let f = Fixture::new();
    f.build();

    let mut header = f.valid_meta_header();
    header.chain_id = b"other-chain".to_vec();
    let raw = f.codec.encode(&header).unwrap();

    let err = f
        .messenger
        .deliver("metachainBlocks", raw, peer())
        .unwrap_err();
    assert_eq!(err, ProcessError::ChainIdMismatch);
    assert!(f.pools.headers().is_empty());
}

#[test]
fn test_meta_header_empty_field_dropped() {
    let f = Fixture::new();
    f.build();

    let mut header = f.valid_meta_header();
    header.rand_seed = Vec::new();
    let raw = f.codec.encode(&header).unwrap();

    let err = f
        .messenger
        .deliver("metachainBlocks", raw, peer())
        .unwrap_err();
    assert_eq!(err, ProcessError::EmptyField("rand_seed"));
    assert!(f.pools.headers().is_empty());
}

#[test]
fn test_valid_meta_header_cached() {
    let f = Fixture::new();
    f.build();

    let header = f.valid_meta_header();
    let raw = f.codec.encode(&header).unwrap();
    let hash = Hash::from_bytes(&raw);

    f.messenger.deliver("metachainBlocks", raw, peer()).unwrap();
    assert_eq!(
        f.pools.headers().get(&hash),
        Some(HeaderPoolValue::Meta(header))
    );
}

#[test]
fn test_miniblock_shard_out_of_range_dropped() {
    let f = Fixture::new();
    f.build();

    let body = BlockBody {
        miniblocks: vec![MiniBlock {
            tx_hashes: vec![b"h".to_vec()],
            sender_shard: ShardId(0),
            receiver_shard: ShardId(7),
        }],
    };
    let raw = f.codec.encode(&body).unwrap();

    let err = f
        .messenger
        .deliver("txBlockBodies_0", raw, peer())
        .unwrap_err();
    assert!(matches!(err, ProcessError::ShardIdOutOfRange { .. }));
    assert!(f.pools.miniblocks().is_empty());
}

#[test]
fn test_miniblock_metachain_shard_accepted() {
    let f = Fixture::new();
    f.build();

    let body = BlockBody {
        miniblocks: vec![MiniBlock {
            tx_hashes: vec![b"h".to_vec()],
            sender_shard: ShardId::METACHAIN,
            receiver_shard: ShardId(0),
        }],
    };
    let raw = f.codec.encode(&body).unwrap();
    let hash = Hash::from_bytes(&raw);

    f.messenger
        .deliver("txBlockBodies_0_META", raw, peer())
        .unwrap();
    assert!(f.pools.miniblocks().contains(&hash));
}

#[test]
fn test_trie_node_roundtrip_and_empty_value() {
    let f = Fixture::new();
    f.build();

    let node = TrieNodePayload {
        key: b"trie-key".to_vec(),
        value: b"node-bytes".to_vec(),
    };
    let raw = f.codec.encode(&node).unwrap();
    let hash = Hash::from_bytes(&raw);
    f.messenger
        .deliver("accountTrieNodes_0_META", raw, peer())
        .unwrap();
    assert!(f.pools.trie_nodes().contains(&hash));

    let empty = TrieNodePayload {
        key: b"trie-key".to_vec(),
        value: Vec::new(),
    };
    let raw = f.codec.encode(&empty).unwrap();
    let err = f
        .messenger
        .deliver("validatorTrieNodes_0_META", raw, peer())
        .unwrap_err();
    assert_eq!(err, ProcessError::EmptyField("value"));
}

#[test]
fn test_unsigned_tx_empty_sender_lands_in_self_shard_pair() {
    let f = Fixture::new();
    f.build();

    let utx = shardline_types::UnsignedTransaction {
        nonce: 0,
        value: 5,
        receiver: f.coordinator.address_in_shard(ShardId(0)),
        sender: Address::default(),
        data: b"result".to_vec(),
        original_tx_hash: b"orig".to_vec(),
    };
    let raw = f.codec.encode(&utx).unwrap();
    let hash = Hash::from_bytes(&raw);

    f.messenger
        .deliver("unsignedTransactions_0", raw, peer())
        .unwrap();

    // Empty sender resolves to the self shard: pair "0".
    let store = f.pools.unsigned_transactions().shard_store("0").unwrap();
    assert!(store.contains(&hash));
}

#[test]
fn test_repeated_delivery_is_deterministic() {
    let f = Fixture::new();
    f.build();

    let tx = f.signed_tx(ShardId(0), ShardId(0), 0);
    let raw = f.codec.encode(&tx).unwrap();

    for _ in 0..3 {
        f.messenger
            .deliver("transactions_0", raw.clone(), peer())
            .unwrap();
    }
    let store = f.pools.transactions().shard_store("0").unwrap();
    assert_eq!(store.len(), 1);
}
