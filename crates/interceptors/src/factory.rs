//! Assembly of the per-shard interceptor set.

use crate::container::InterceptorsContainer;
use crate::intercepted::{
    BlockBodyFactory, HeaderFactory, InterceptedBlockBody, InterceptedHeader,
    InterceptedMetaHeader, InterceptedPayload, InterceptedRewardTx, InterceptedTransaction,
    InterceptedTrieNode, InterceptedUnsignedTx, MetaHeaderFactory, PayloadFactory,
    RewardTxFactory, TransactionFactory, TrieNodeFactory, UnsignedTxFactory,
};
use crate::interceptor::DataInterceptor;
use crate::sinks::{
    HeaderPoolSink, MiniblocksPoolSink, PayloadSink, RewardTxPoolSink, TrieNodePoolSink,
    TxPoolSink, UnsignedTxPoolSink,
};
use shardline_antiflood::AntifloodHandler;
use shardline_core::{
    AccountsAdapter, AddressScheme, Blacklist, BlockSignatureVerifier, ChronologyValidator, Codec,
    FeeChecker, Hasher, JobThrottler, KeyGenerator, ProcessError, ShardCoordinator,
    SignatureVerifier,
};
use shardline_network::{topics, MessageProcessor, Messenger};
use shardline_pools::PoolsHolder;
use shardline_types::ShardId;
use std::sync::Arc;
use tracing::debug;

/// Interception jobs that may run at once, across all topics of one
/// container.
const MAX_CONCURRENT_INTERCEPTION_JOBS: usize = 2048;

/// Everything a shard's interceptor set depends on.
///
/// Every handle is required; the factory cannot be built half-wired. The
/// value-level fields are validated by
/// [`ShardInterceptorsFactory::new`].
pub struct ShardInterceptorsFactoryArgs<C: Codec> {
    pub coordinator: Arc<dyn ShardCoordinator>,
    pub messenger: Arc<dyn Messenger>,
    pub pools: Arc<dyn PoolsHolder>,
    pub codec: Arc<C>,
    pub hasher: Arc<dyn Hasher>,
    pub accounts: Arc<dyn AccountsAdapter>,
    pub keygen: Arc<dyn KeyGenerator>,
    pub signer: Arc<dyn SignatureVerifier>,
    pub block_signature_verifier: Arc<dyn BlockSignatureVerifier>,
    pub chronology_validator: Arc<dyn ChronologyValidator>,
    pub fee_checker: Arc<dyn FeeChecker>,
    pub blacklist: Arc<dyn Blacklist>,
    pub address_scheme: Arc<dyn AddressScheme>,
    pub antiflood: Arc<dyn AntifloodHandler>,
    pub chain_id: Vec<u8>,
    pub max_tx_nonce_delta: u32,
}

/// Builds the interceptor container for one shard and subscribes every
/// interceptor to the transport.
pub struct ShardInterceptorsFactory<C: Codec> {
    args: ShardInterceptorsFactoryArgs<C>,
    throttler: Arc<JobThrottler>,
}

impl<C: Codec> ShardInterceptorsFactory<C> {
    /// Validate the value-level configuration and keep the handles.
    pub fn new(args: ShardInterceptorsFactoryArgs<C>) -> Result<Self, ProcessError> {
        if args.chain_id.is_empty() {
            return Err(ProcessError::InvalidChainId);
        }
        if args.max_tx_nonce_delta < 1 {
            return Err(ProcessError::InvalidValue {
                name: "max_tx_nonce_delta",
                provided: args.max_tx_nonce_delta as u64,
                minimum: 1,
            });
        }
        let num_shards = args.coordinator.number_of_shards();
        if num_shards < 1 {
            return Err(ProcessError::InvalidValue {
                name: "number_of_shards",
                provided: num_shards as u64,
                minimum: 1,
            });
        }
        Ok(Self {
            args,
            throttler: Arc::new(JobThrottler::new(MAX_CONCURRENT_INTERCEPTION_JOBS)),
        })
    }

    /// Build the full topic set. All-or-nothing: the first failure aborts
    /// the build and the partial container is discarded.
    pub fn create(&self) -> Result<InterceptorsContainer, ProcessError> {
        let container = InterceptorsContainer::new();

        self.generate_tx_interceptors(&container)?;
        self.generate_unsigned_tx_interceptors(&container)?;
        self.generate_reward_tx_interceptor(&container)?;
        self.generate_header_interceptor(&container)?;
        self.generate_miniblocks_interceptors(&container)?;
        self.generate_meta_header_interceptor(&container)?;
        self.generate_trie_nodes_interceptors(&container)?;

        debug!(topics = container.len(), shard = %self.args.coordinator.self_id(),
            "interceptors container assembled");
        Ok(container)
    }

    /// Create the transport topic, build the interceptor and register it
    /// with the messenger.
    fn subscribe<T: InterceptedPayload + 'static>(
        &self,
        topic: String,
        factory: Arc<dyn PayloadFactory<T>>,
        sink: Arc<dyn PayloadSink<T>>,
    ) -> Result<Arc<dyn MessageProcessor>, ProcessError> {
        self.args
            .messenger
            .create_topic(&topic)
            .map_err(|e| ProcessError::Transport(e.to_string()))?;

        let interceptor: Arc<dyn MessageProcessor> = Arc::new(DataInterceptor::new(
            topic.clone(),
            factory,
            sink,
            Arc::clone(&self.throttler),
            Arc::clone(&self.args.antiflood),
            Arc::clone(&self.args.blacklist),
        ));
        self.args
            .messenger
            .register_message_processor(&topic, Arc::clone(&interceptor))
            .map_err(|e| ProcessError::Transport(e.to_string()))?;
        Ok(interceptor)
    }

    /// The self shard, every other shard, then the metachain.
    fn all_counterpart_shards(&self) -> Vec<ShardId> {
        let num_shards = self.args.coordinator.number_of_shards();
        (0..num_shards)
            .map(ShardId)
            .chain(std::iter::once(ShardId::METACHAIN))
            .collect()
    }

    fn generate_tx_interceptors(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedTransaction>> =
            Arc::new(TransactionFactory::new(
                Arc::clone(&self.args.codec),
                Arc::clone(&self.args.hasher),
                Arc::clone(&self.args.coordinator),
                Arc::clone(&self.args.keygen),
                Arc::clone(&self.args.signer),
                Arc::clone(&self.args.address_scheme),
                Arc::clone(&self.args.fee_checker),
                Arc::clone(&self.args.accounts),
                self.args.max_tx_nonce_delta,
            ));
        let sink: Arc<dyn PayloadSink<InterceptedTransaction>> =
            Arc::new(TxPoolSink::new(self.args.pools.transactions()));

        for shard in self.all_counterpart_shards() {
            let identifier = self.args.coordinator.communication_identifier(shard);
            let topic = topics::scoped(topics::TRANSACTIONS, &identifier);
            let interceptor =
                self.subscribe(topic.clone(), Arc::clone(&factory), Arc::clone(&sink))?;
            container.add(topic, interceptor)?;
        }
        Ok(())
    }

    fn generate_unsigned_tx_interceptors(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedUnsignedTx>> =
            Arc::new(UnsignedTxFactory::new(
                Arc::clone(&self.args.codec),
                Arc::clone(&self.args.hasher),
                Arc::clone(&self.args.coordinator),
            ));
        let sink: Arc<dyn PayloadSink<InterceptedUnsignedTx>> = Arc::new(
            UnsignedTxPoolSink::new(self.args.pools.unsigned_transactions()),
        );

        for shard in self.all_counterpart_shards() {
            let identifier = self.args.coordinator.communication_identifier(shard);
            let topic = topics::scoped(topics::UNSIGNED_TRANSACTIONS, &identifier);
            let interceptor =
                self.subscribe(topic.clone(), Arc::clone(&factory), Arc::clone(&sink))?;
            container.add(topic, interceptor)?;
        }
        Ok(())
    }

    fn generate_reward_tx_interceptor(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedRewardTx>> =
            Arc::new(RewardTxFactory::new(
                Arc::clone(&self.args.codec),
                Arc::clone(&self.args.hasher),
                Arc::clone(&self.args.coordinator),
            ));
        let sink: Arc<dyn PayloadSink<InterceptedRewardTx>> =
            Arc::new(RewardTxPoolSink::new(self.args.pools.reward_transactions()));

        let identifier = self
            .args
            .coordinator
            .communication_identifier(ShardId::METACHAIN);
        let topic = topics::scoped(topics::REWARDS_TRANSACTIONS, &identifier);
        let interceptor = self.subscribe(topic.clone(), factory, sink)?;
        container.add(topic, interceptor)
    }

    fn generate_header_interceptor(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedHeader>> = Arc::new(HeaderFactory::new(
            Arc::clone(&self.args.codec),
            Arc::clone(&self.args.hasher),
            Arc::clone(&self.args.coordinator),
            Arc::clone(&self.args.block_signature_verifier),
            Arc::clone(&self.args.chronology_validator),
            self.args.chain_id.clone(),
        ));
        let sink: Arc<dyn PayloadSink<InterceptedHeader>> =
            Arc::new(HeaderPoolSink::new(self.args.pools.headers()));

        let self_id = self.args.coordinator.self_id();
        let identifier = self.args.coordinator.communication_identifier(self_id);
        let topic = topics::scoped(topics::SHARD_BLOCKS, &identifier);
        let interceptor = self.subscribe(topic.clone(), factory, sink)?;
        container.add(topic, interceptor)
    }

    fn generate_meta_header_interceptor(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedMetaHeader>> =
            Arc::new(MetaHeaderFactory::new(
                Arc::clone(&self.args.codec),
                Arc::clone(&self.args.hasher),
                Arc::clone(&self.args.coordinator),
                Arc::clone(&self.args.block_signature_verifier),
                Arc::clone(&self.args.chronology_validator),
                self.args.chain_id.clone(),
            ));
        let sink: Arc<dyn PayloadSink<InterceptedMetaHeader>> =
            Arc::new(HeaderPoolSink::new(self.args.pools.headers()));

        // The metachain topic is global: no shard suffix.
        let topic = topics::METACHAIN_BLOCKS.to_string();
        let interceptor = self.subscribe(topic.clone(), factory, sink)?;
        container.add(topic, interceptor)
    }

    fn generate_miniblocks_interceptors(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedBlockBody>> =
            Arc::new(BlockBodyFactory::new(
                Arc::clone(&self.args.codec),
                Arc::clone(&self.args.hasher),
                Arc::clone(&self.args.coordinator),
            ));
        let sink: Arc<dyn PayloadSink<InterceptedBlockBody>> =
            Arc::new(MiniblocksPoolSink::new(self.args.pools.miniblocks()));

        for shard in self.all_counterpart_shards() {
            let identifier = self.args.coordinator.communication_identifier(shard);
            let topic = topics::scoped(topics::TX_BLOCK_BODIES, &identifier);
            let interceptor =
                self.subscribe(topic.clone(), Arc::clone(&factory), Arc::clone(&sink))?;
            container.add(topic, interceptor)?;
        }
        Ok(())
    }

    fn generate_trie_nodes_interceptors(
        &self,
        container: &InterceptorsContainer,
    ) -> Result<(), ProcessError> {
        let factory: Arc<dyn PayloadFactory<InterceptedTrieNode>> =
            Arc::new(TrieNodeFactory::new(
                Arc::clone(&self.args.codec),
                Arc::clone(&self.args.hasher),
            ));
        let sink: Arc<dyn PayloadSink<InterceptedTrieNode>> =
            Arc::new(TrieNodePoolSink::new(self.args.pools.trie_nodes()));

        let identifier = self
            .args
            .coordinator
            .communication_identifier(ShardId::METACHAIN);

        let mut topic_names = Vec::new();
        let mut interceptors: Vec<Arc<dyn MessageProcessor>> = Vec::new();
        for prefix in [topics::ACCOUNT_TRIE_NODES, topics::VALIDATOR_TRIE_NODES] {
            let topic = topics::scoped(prefix, &identifier);
            let interceptor =
                self.subscribe(topic.clone(), Arc::clone(&factory), Arc::clone(&sink))?;
            topic_names.push(topic);
            interceptors.push(interceptor);
        }
        container.add_multiple(topic_names, interceptors)
    }
}
