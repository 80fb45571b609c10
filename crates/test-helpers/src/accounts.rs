//! Account state test double.

use dashmap::DashMap;
use shardline_core::AccountsAdapter;
use shardline_types::Address;

/// Nonce store keyed by address.
#[derive(Debug, Default)]
pub struct InMemoryAccounts {
    nonces: DashMap<Address, u64>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.nonces.insert(address, nonce);
    }
}

impl AccountsAdapter for InMemoryAccounts {
    fn account_nonce(&self, address: &Address) -> Option<u64> {
        self.nonces.get(address).map(|entry| *entry.value())
    }
}
