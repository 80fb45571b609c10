//! Shared seams and primitives for the Shardline ingestion pipeline.
//!
//! This crate defines:
//!
//! - [`ProcessError`]: the error taxonomy for construction and data-plane
//!   failures
//! - Collaborator traits consumed by the interceptors and the pool cleaner
//!   (shard coordination, round clock, accounts, crypto verification seams)
//! - [`Codec`]: the wire serialization seam and its bincode implementation
//! - [`JobThrottler`]: the counting semaphore bounding concurrent
//!   interception work
//!
//! Nothing here performs I/O; implementations of the collaborator traits
//! live in the node wiring (and in `shardline-test-helpers` for tests).

mod codec;
mod error;
mod throttler;
mod traits;

pub use codec::{BincodeCodec, Codec, CodecError};
pub use error::ProcessError;
pub use throttler::JobThrottler;
pub use traits::{
    AccountsAdapter, AddressScheme, Blacklist, Blake3Hasher, BlockSignatureVerifier,
    ChronologyValidator, FeeChecker, Hasher, KeyGenerator, RoundClock, ShardCoordinator,
    SignatureVerifier,
};
