//! Block assembly on top of the best branch

use crate::constants::COINBASE_VALUE;
use crate::error::Result;
use crate::ledger::{BlockVerdict, Ledger};
use crate::transaction::select_valid;
use crate::types::{Block, Transaction};

/// Assemble a block from the pending pool and submit it to the ledger.
///
/// Takes a snapshot of the best tip's unspent set, greedily selects
/// mutually valid pending transactions against it (pending-pool order
/// is unspecified), and builds a block on the best tip whose coinbase
/// pays [`COINBASE_VALUE`] to `coinbase_owner`.
///
/// Returns the block when the ledger accepts it, `None` when it is
/// rejected. Selected transactions stay in the pending pool; prune
/// them once the block is confirmed.
pub fn create_block(ledger: &mut Ledger, coinbase_owner: &[u8]) -> Result<Option<Block>> {
    let parent_hash = ledger.max_height_block().digest();
    let mut pool = ledger.max_height_utxo_pool().clone();

    let candidates: Vec<Transaction> = ledger.mempool().transactions().cloned().collect();
    let accepted = select_valid(&candidates, &mut pool);

    let block = Block::new(
        Some(parent_hash),
        Transaction::coinbase(COINBASE_VALUE, coinbase_owner),
        accepted,
    );

    match ledger.add_block(&block)? {
        BlockVerdict::Accepted => Ok(Some(block)),
        BlockVerdict::Rejected(_) => Ok(None),
    }
}
