//! Functional in-memory collaborators for tests.
//!
//! These are working implementations rather than bare stubs: the pools
//! notify observers, the messenger routes delivered messages through
//! registered processors, and the crypto seams verify against a simple
//! test scheme (a valid signature is the Blake3 hash of the message).

mod accounts;
mod coordination;
mod crypto;
mod messenger;
mod pools;

pub use accounts::InMemoryAccounts;
pub use coordination::{LastByteShardCoordinator, ManualRoundClock};
pub use crypto::{
    test_signature, InMemoryBlacklist, StubBlockSignatureVerifier, StubChronologyValidator,
    StubFeeChecker, TestAddressScheme, TestKeyGenerator, TestSignatureVerifier,
};
pub use messenger::InMemoryMessenger;
pub use pools::{InMemoryPoolsHolder, InMemoryShardedPool};
