//! Per-topic payload interceptors.
//!
//! An interceptor sits between the transport and the data pools for exactly
//! one topic. Every inbound payload runs the same pipeline (antiflood
//! admission, a concurrency slot, decode and hash, blacklist, structural
//! validation) and only then reaches its pool, keyed by content hash.
//!
//! [`ShardInterceptorsFactory`] assembles the interceptor set for one shard
//! and subscribes it to the transport; the resulting
//! [`InterceptorsContainer`] is read-only afterwards.

mod container;
mod factory;
mod intercepted;
mod interceptor;
mod sinks;

pub use container::InterceptorsContainer;
pub use factory::{ShardInterceptorsFactory, ShardInterceptorsFactoryArgs};
pub use intercepted::{
    BlockBodyFactory, HeaderFactory, InterceptedBlockBody, InterceptedHeader,
    InterceptedMetaHeader, InterceptedPayload, InterceptedRewardTx, InterceptedTransaction,
    InterceptedTrieNode, InterceptedUnsignedTx, MetaHeaderFactory, PayloadFactory,
    RewardTxFactory, TransactionFactory, TrieNodeFactory, UnsignedTxFactory,
};
pub use interceptor::DataInterceptor;
pub use sinks::{
    HeaderPoolSink, MiniblocksPoolSink, PayloadSink, RewardTxPoolSink, TrieNodePoolSink,
    TxPoolSink, UnsignedTxPoolSink,
};
