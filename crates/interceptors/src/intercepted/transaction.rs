//! User transaction interception.

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use shardline_core::{
    AccountsAdapter, AddressScheme, Codec, FeeChecker, Hasher, KeyGenerator, ProcessError,
    ShardCoordinator, SignatureVerifier,
};
use shardline_types::{Address, Hash, ShardId, Transaction};
use std::sync::Arc;

/// A decoded user transaction with its resolved shard route.
#[derive(Debug, Clone)]
pub struct InterceptedTransaction {
    pub tx: Transaction,
    hash: Hash,
    pub sender_shard: ShardId,
    pub receiver_shard: ShardId,
    for_current_shard: bool,
}

impl InterceptedPayload for InterceptedTransaction {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        self.for_current_shard
    }

    fn payload_type(&self) -> &'static str {
        "transaction"
    }
}

/// Decodes and validates user transactions.
pub struct TransactionFactory<C: Codec> {
    codec: Arc<C>,
    hasher: Arc<dyn Hasher>,
    coordinator: Arc<dyn ShardCoordinator>,
    keygen: Arc<dyn KeyGenerator>,
    signer: Arc<dyn SignatureVerifier>,
    address_scheme: Arc<dyn AddressScheme>,
    fee_checker: Arc<dyn FeeChecker>,
    accounts: Arc<dyn AccountsAdapter>,
    max_tx_nonce_delta: u32,
}

impl<C: Codec> TransactionFactory<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        codec: Arc<C>,
        hasher: Arc<dyn Hasher>,
        coordinator: Arc<dyn ShardCoordinator>,
        keygen: Arc<dyn KeyGenerator>,
        signer: Arc<dyn SignatureVerifier>,
        address_scheme: Arc<dyn AddressScheme>,
        fee_checker: Arc<dyn FeeChecker>,
        accounts: Arc<dyn AccountsAdapter>,
        max_tx_nonce_delta: u32,
    ) -> Self {
        Self {
            codec,
            hasher,
            coordinator,
            keygen,
            signer,
            address_scheme,
            fee_checker,
            accounts,
            max_tx_nonce_delta,
        }
    }

    fn shard_of(&self, address: &Address) -> ShardId {
        if address.is_empty() {
            self.coordinator.self_id()
        } else {
            self.coordinator.compute_id(address)
        }
    }

    fn check_signature(&self, tx: &Transaction) -> Result<(), ProcessError> {
        // The sender address doubles as the public key bytes; the signature
        // covers the serialized transaction with its signature cleared.
        self.keygen.public_key_from_bytes(tx.sender.as_bytes())?;
        let signing_payload = self.codec.encode(&tx.unsigned_form())?;
        self.signer
            .verify(tx.sender.as_bytes(), &signing_payload, &tx.signature)
    }

    fn check_nonce(&self, tx: &Transaction, sender_shard: ShardId) -> Result<(), ProcessError> {
        // Account state is only known for the self shard.
        if sender_shard != self.coordinator.self_id() {
            return Ok(());
        }
        let account_nonce = self.accounts.account_nonce(&tx.sender).unwrap_or(0);
        if tx.nonce > account_nonce + self.max_tx_nonce_delta as u64 {
            return Err(ProcessError::NonceTooFarAhead {
                tx_nonce: tx.nonce,
                account_nonce,
                max_delta: self.max_tx_nonce_delta,
            });
        }
        Ok(())
    }
}

impl<C: Codec> PayloadFactory<InterceptedTransaction> for TransactionFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedTransaction, ProcessError> {
        let tx: Transaction = self.codec.decode(raw)?;
        let hash = self.hasher.compute(raw);
        let sender_shard = self.shard_of(&tx.sender);
        let receiver_shard = self.shard_of(&tx.receiver);
        let me = self.coordinator.self_id();
        Ok(InterceptedTransaction {
            tx,
            hash,
            sender_shard,
            receiver_shard,
            for_current_shard: sender_shard == me || receiver_shard == me,
        })
    }

    fn check_validity(&self, payload: &InterceptedTransaction) -> Result<(), ProcessError> {
        let tx = &payload.tx;
        self.address_scheme.parse(tx.sender.as_bytes())?;
        self.address_scheme.parse(tx.receiver.as_bytes())?;
        self.fee_checker.check_tx_values(tx.gas_price, tx.gas_limit)?;
        self.check_signature(tx)?;
        self.check_nonce(tx, payload.sender_shard)
    }
}
