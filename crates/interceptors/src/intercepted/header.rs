//! Block header interception (shard and metachain).

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use shardline_core::{
    BlockSignatureVerifier, ChronologyValidator, Codec, Hasher, ProcessError, ShardCoordinator,
};
use shardline_types::{Hash, HeaderFields, MetaHeader, ShardHeader};
use std::sync::Arc;

/// Consensus fields that must be non-empty on every received header.
fn check_header_fields(header: &dyn HeaderFields) -> Result<(), ProcessError> {
    if header.pub_keys_bitmap().is_empty() {
        return Err(ProcessError::EmptyField("pub_keys_bitmap"));
    }
    if header.prev_hash().is_empty() {
        return Err(ProcessError::EmptyField("prev_hash"));
    }
    if header.signature().is_empty() {
        return Err(ProcessError::EmptyField("signature"));
    }
    if header.root_hash().is_empty() {
        return Err(ProcessError::EmptyField("root_hash"));
    }
    if header.rand_seed().is_empty() {
        return Err(ProcessError::EmptyField("rand_seed"));
    }
    if header.prev_rand_seed().is_empty() {
        return Err(ProcessError::EmptyField("prev_rand_seed"));
    }
    Ok(())
}

/// Shared handle set and check sequence for both header flavors.
struct HeaderChecks<C: Codec> {
    codec: Arc<C>,
    hasher: Arc<dyn Hasher>,
    coordinator: Arc<dyn ShardCoordinator>,
    signature_verifier: Arc<dyn BlockSignatureVerifier>,
    chronology: Arc<dyn ChronologyValidator>,
    chain_id: Vec<u8>,
}

impl<C: Codec> HeaderChecks<C> {
    fn check(&self, header: &dyn HeaderFields, hash: &Hash) -> Result<(), ProcessError> {
        check_header_fields(header)?;
        if header.chain_id() != self.chain_id.as_slice() {
            return Err(ProcessError::ChainIdMismatch);
        }
        self.chronology.validate_received_block(
            header.shard_id(),
            header.epoch(),
            header.nonce(),
            header.round(),
        )?;
        self.signature_verifier
            .verify_signature(hash, header.pub_keys_bitmap(), header.signature())
    }
}

/// A decoded shard block header.
#[derive(Debug, Clone)]
pub struct InterceptedHeader {
    pub header: ShardHeader,
    hash: Hash,
    for_current_shard: bool,
}

impl InterceptedPayload for InterceptedHeader {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        self.for_current_shard
    }

    fn payload_type(&self) -> &'static str {
        "shard header"
    }
}

/// Decodes and validates shard block headers.
pub struct HeaderFactory<C: Codec> {
    checks: HeaderChecks<C>,
}

impl<C: Codec> HeaderFactory<C> {
    pub fn new(
        codec: Arc<C>,
        hasher: Arc<dyn Hasher>,
        coordinator: Arc<dyn ShardCoordinator>,
        signature_verifier: Arc<dyn BlockSignatureVerifier>,
        chronology: Arc<dyn ChronologyValidator>,
        chain_id: Vec<u8>,
    ) -> Self {
        Self {
            checks: HeaderChecks {
                codec,
                hasher,
                coordinator,
                signature_verifier,
                chronology,
                chain_id,
            },
        }
    }
}

impl<C: Codec> PayloadFactory<InterceptedHeader> for HeaderFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedHeader, ProcessError> {
        let header: ShardHeader = self.checks.codec.decode(raw)?;
        let hash = self.checks.hasher.compute(raw);
        let me = self.checks.coordinator.self_id();
        Ok(InterceptedHeader {
            for_current_shard: header.shard_id == me || me.is_metachain(),
            header,
            hash,
        })
    }

    fn check_validity(&self, payload: &InterceptedHeader) -> Result<(), ProcessError> {
        let num_shards = self.checks.coordinator.number_of_shards();
        if !payload.header.shard_id.is_metachain() && payload.header.shard_id.0 >= num_shards {
            return Err(ProcessError::ShardIdOutOfRange {
                shard: payload.header.shard_id,
                num_shards,
            });
        }
        self.checks.check(&payload.header, &payload.hash)
    }
}

/// A decoded metachain block header.
#[derive(Debug, Clone)]
pub struct InterceptedMetaHeader {
    pub header: MetaHeader,
    hash: Hash,
}

impl InterceptedPayload for InterceptedMetaHeader {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        // Every shard follows the metachain.
        true
    }

    fn payload_type(&self) -> &'static str {
        "metachain header"
    }
}

/// Decodes and validates metachain block headers.
pub struct MetaHeaderFactory<C: Codec> {
    checks: HeaderChecks<C>,
}

impl<C: Codec> MetaHeaderFactory<C> {
    pub fn new(
        codec: Arc<C>,
        hasher: Arc<dyn Hasher>,
        coordinator: Arc<dyn ShardCoordinator>,
        signature_verifier: Arc<dyn BlockSignatureVerifier>,
        chronology: Arc<dyn ChronologyValidator>,
        chain_id: Vec<u8>,
    ) -> Self {
        Self {
            checks: HeaderChecks {
                codec,
                hasher,
                coordinator,
                signature_verifier,
                chronology,
                chain_id,
            },
        }
    }
}

impl<C: Codec> PayloadFactory<InterceptedMetaHeader> for MetaHeaderFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedMetaHeader, ProcessError> {
        let header: MetaHeader = self.checks.codec.decode(raw)?;
        let hash = self.checks.hasher.compute(raw);
        Ok(InterceptedMetaHeader { header, hash })
    }

    fn check_validity(&self, payload: &InterceptedMetaHeader) -> Result<(), ProcessError> {
        self.checks.check(&payload.header, &payload.hash)
    }
}
