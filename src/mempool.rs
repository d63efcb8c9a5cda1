//! Pending-transaction pool

use crate::types::{Hash, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Transactions waiting for block inclusion, keyed by digest.
///
/// One pool is shared across every branch of the ledger. Entries are
/// deduplicated by content digest and carry no ordering. Confirmation
/// in a block does not remove an entry; whoever assembles blocks
/// prunes the pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mempool {
    transactions: HashMap<Hash, Transaction>,
}

impl Mempool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a transaction, replacing any entry with the same digest
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.insert(tx.digest(), tx);
    }

    /// Drop the entry with this digest, if present
    pub fn remove_transaction(&mut self, tx_hash: &Hash) {
        self.transactions.remove(tx_hash);
    }

    /// Look up a pending transaction by digest
    pub fn get_transaction(&self, tx_hash: &Hash) -> Option<&Transaction> {
        self.transactions.get(tx_hash)
    }

    /// Iterate over pending transactions, in no particular order
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    /// Number of pending transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
