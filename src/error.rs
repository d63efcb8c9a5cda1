//! Error types for ledger operations
//!
//! Expected validation failures are not errors: they are reported as
//! verdict values ([`crate::transaction::TxVerdict`],
//! [`crate::ledger::BlockVerdict`]) carrying a specific rejection
//! reason. [`LedgerError`] is reserved for structurally malformed
//! input that no well-formed caller produces; such input fails closed
//! instead of being attempted.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Malformed block: {0}")]
    MalformedBlock(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
