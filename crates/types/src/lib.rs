//! Core types for the Shardline node.
//!
//! This crate provides the foundational types used throughout the ingestion
//! pipeline:
//!
//! - **Primitives**: [`Hash`], [`PeerId`], [`Address`]
//! - **Identifiers**: [`ShardId`], [`RoundIndex`]
//! - **Payloads**: transactions, headers, block bodies, trie-node payloads
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend
//! on any other workspace crates, making it the foundation layer.

mod address;
mod hash;
mod header;
mod identifiers;
mod miniblock;
mod transaction;
mod trie_node;

pub use address::Address;
pub use hash::Hash;
pub use header::{HeaderFields, MetaHeader, ShardHeader};
pub use identifiers::{PeerId, RoundIndex, ShardId};
pub use miniblock::{BlockBody, MiniBlock};
pub use transaction::{RewardTransaction, RoutedTransaction, Transaction, UnsignedTransaction};
pub use trie_node::TrieNodePayload;
