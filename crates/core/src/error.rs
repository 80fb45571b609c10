//! Error taxonomy for the ingestion pipeline.

use crate::CodecError;
use shardline_types::{PeerId, ShardId};
use thiserror::Error;

/// Errors produced by construction and by the data plane.
///
/// Construction errors are fatal and surfaced to the caller; data-plane
/// errors are logged at the point of failure and the offending message is
/// dropped; they never propagate past the transport handler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    // ── Construction ──────────────────────────────────────────────────

    /// A configuration value is outside its legal range.
    #[error("invalid value for {name}: provided {provided}, minimum {minimum}")]
    InvalidValue {
        name: &'static str,
        provided: u64,
        minimum: u64,
    },

    /// The configured chain id is empty.
    #[error("invalid chain id")]
    InvalidChainId,

    /// A topic is already present in the interceptors container.
    #[error("container key already present: {0}")]
    DuplicateContainerKey(String),

    /// A topic is missing from the interceptors container.
    #[error("container key not found: {0}")]
    ContainerKeyNotFound(String),

    /// Topic lists passed to a bulk container insert differ in length.
    #[error("topics and interceptors length mismatch: {topics} vs {interceptors}")]
    ContainerLenMismatch { topics: usize, interceptors: usize },

    /// The transport refused a topic operation during container assembly.
    #[error("transport error: {0}")]
    Transport(String),

    // ── Admission ─────────────────────────────────────────────────────

    /// The antiflood budget for this peer or the node is exhausted.
    #[error("system busy: message from peer {peer} rejected")]
    SystemBusy { peer: PeerId },

    /// The antiflood budget for a topic is exhausted.
    #[error("too many messages from peer {peer} on topic {topic}")]
    TopicBudgetExceeded { peer: PeerId, topic: String },

    /// All interception slots are occupied.
    #[error("no interception slot available")]
    NoSlotAvailable,

    // ── Validation ────────────────────────────────────────────────────

    /// The payload could not be decoded into the topic's type.
    #[error("payload decode failed: {0}")]
    Decode(#[from] CodecError),

    /// The payload hash is blacklisted.
    #[error("blacklisted payload {hash_hex}")]
    Blacklisted { hash_hex: String },

    /// A required structural field is empty.
    #[error("empty field: {0}")]
    EmptyField(&'static str),

    /// An address does not match the configured scheme.
    #[error("invalid address: {0}")]
    InvalidAddress(&'static str),

    /// The transaction nonce is too far ahead of the account nonce.
    #[error("tx nonce {tx_nonce} exceeds account nonce {account_nonce} by more than {max_delta}")]
    NonceTooFarAhead {
        tx_nonce: u64,
        account_nonce: u64,
        max_delta: u32,
    },

    /// A signature failed verification.
    #[error("invalid signature")]
    InvalidSignature,

    /// A public key could not be parsed.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// The transaction violates the fee rules.
    #[error("fee check failed: {0}")]
    FeeRejected(&'static str),

    /// A header's chain id differs from the configured chain id.
    #[error("chain id mismatch")]
    ChainIdMismatch,

    /// A header fails the chronology (epoch/round/nonce) rules.
    #[error("chronology check failed: {0}")]
    InvalidChronology(&'static str),

    /// A shard id lies outside the coordinator's shard space.
    #[error("shard id {shard} out of range for {num_shards} shards")]
    ShardIdOutOfRange { shard: ShardId, num_shards: u32 },

    // ── Programmer errors ─────────────────────────────────────────────

    /// A pool value carried an unexpected variant for its pool.
    #[error("wrong type in pool value")]
    WrongTypeAssertion,
}
