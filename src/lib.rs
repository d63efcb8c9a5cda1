//! # utxo-ledger
//!
//! Validation and fork-resolution core of a minimal proof-of-work
//! ledger. Given proposed transactions and a tree of candidate blocks,
//! it decides which transactions are individually and mutually valid
//! while maintaining a bounded-depth set of competing branches, and it
//! exposes the best branch's unspent-output state for block
//! construction.
//!
//! ## Components
//!
//! - [`UtxoPool`]: the unspent-output set, the atomic unit of state
//! - [`check_transaction`] / [`select_valid`]: pure validation of one
//!   transaction, and greedy selection of a mutually valid batch
//! - [`Ledger`]: retained branches in a digest-keyed arena, best-tip
//!   tracking, retention-window pruning, and the shared [`Mempool`]
//! - [`create_block`]: block assembly from pending transactions on top
//!   of the best tip
//!
//! Everything runs synchronously on the caller's thread; there is no
//! internal locking and no I/O. Signature verification consumes
//! secp256k1 ECDSA over SHA-256 content digests.
//!
//! ## Usage
//!
//! ```rust
//! use utxo_ledger::{Block, Ledger, Transaction, COINBASE_VALUE};
//!
//! // owner keys are opaque bytes until a signature is checked
//! let genesis = Block::new(None, Transaction::coinbase(COINBASE_VALUE, &[0x02; 33]), vec![]);
//! let mut ledger = Ledger::new(&genesis).unwrap();
//! assert_eq!(ledger.max_height(), 1);
//!
//! let next = Block::new(
//!     Some(genesis.digest()),
//!     Transaction::coinbase(COINBASE_VALUE, &[0x03; 33]),
//!     vec![],
//! );
//! ledger.add_block(&next).unwrap();
//! assert_eq!(ledger.max_height(), 2);
//! assert_eq!(ledger.max_height_utxo_pool().len(), 2);
//! ```

pub mod builder;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod mempool;
pub mod transaction;
pub mod types;
pub mod utxo;

// Re-export commonly used items
pub use builder::create_block;
pub use constants::*;
pub use error::{LedgerError, Result};
pub use ledger::{BlockRejection, BlockVerdict, ChainNode, Ledger};
pub use mempool::Mempool;
pub use transaction::{
    apply_transaction, check_transaction, select_valid, TxRejection, TxVerdict,
};
pub use types::*;
pub use utxo::UtxoPool;
