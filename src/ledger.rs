//! Branch-aware ledger: retained chain nodes and best-tip selection
//! under retention-window pruning

use crate::constants::{CUT_OFF_AGE, GENESIS_HEIGHT};
use crate::error::{LedgerError, Result};
use crate::mempool::Mempool;
use crate::transaction::{apply_transaction, check_transaction, TxRejection, TxVerdict};
use crate::types::{Block, Hash, Transaction};
use crate::utxo::UtxoPool;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// A retained block together with the state produced by applying it.
///
/// Nodes are created once, at block acceptance, and never mutated;
/// each node exclusively owns its unspent-output snapshot so sibling
/// branches diverge without touching one another.
#[derive(Debug, Clone)]
pub struct ChainNode {
    pub block: Block,
    pub height: u64,
    pub utxo_pool: UtxoPool,
}

impl ChainNode {
    /// Digest of the parent block, absent only for genesis
    pub fn parent_hash(&self) -> Option<Hash> {
        self.block.prev_block_hash
    }
}

/// Verdict for a block offered to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockVerdict {
    Accepted,
    Rejected(BlockRejection),
}

/// Why a block was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockRejection {
    /// Only the genesis block established at construction may omit a
    /// parent reference
    #[error("block declares no parent")]
    NoParentDeclared,

    /// The declared parent is not among retained nodes, because it was
    /// never seen or because it has been pruned
    #[error("parent {} is not retained", hex::encode(.0))]
    ParentNotFound(Hash),

    /// Every transaction in a block must be valid; one bad transaction
    /// rejects the whole block
    #[error("transaction {index} is invalid: {reason}")]
    InvalidTransaction { index: usize, reason: TxRejection },

    /// The block's height no longer clears the retention window
    /// relative to the best tip. This is the authoritative height
    /// guard; because stale parents are pruned eagerly on every
    /// max-height raise, a too-deep block normally fails the parent
    /// lookup first and surfaces as
    /// [`ParentNotFound`](BlockRejection::ParentNotFound).
    #[error("height {height} does not clear the retention window below best tip {max_height}")]
    StaleHeight { height: u64, max_height: u64 },
}

/// The retained tree of candidate branches together with the current
/// best tip and the shared pending pool.
///
/// Nodes live in a digest-keyed arena; parent links are digests, so
/// pruning is plain removal with no dangling references. All
/// operations run to completion on the caller's thread, and callers
/// sharing a ledger across threads must serialize access externally.
#[derive(Debug, Clone)]
pub struct Ledger {
    nodes: HashMap<Hash, ChainNode>,
    max_tip: Hash,
    mempool: Mempool,
}

impl Ledger {
    /// Establish the ledger from its genesis block.
    ///
    /// Genesis is assigned height 1 and its coinbase outputs seed the
    /// initial unspent set. The block must not declare a parent or
    /// carry body transactions, and its coinbase must be well formed;
    /// anything else fails closed with [`LedgerError::MalformedBlock`].
    pub fn new(genesis: &Block) -> Result<Self> {
        if genesis.prev_block_hash.is_some() {
            return Err(LedgerError::MalformedBlock(
                "genesis block declares a parent".to_string(),
            ));
        }
        if !genesis.transactions.is_empty() {
            return Err(LedgerError::MalformedBlock(
                "genesis block carries body transactions".to_string(),
            ));
        }
        check_coinbase(&genesis.coinbase)?;

        let mut utxo_pool = UtxoPool::new();
        apply_transaction(&genesis.coinbase, &mut utxo_pool);

        let digest = genesis.digest();
        let node = ChainNode {
            block: genesis.clone(),
            height: GENESIS_HEIGHT,
            utxo_pool,
        };

        let mut nodes = HashMap::new();
        nodes.insert(digest, node);

        debug!(genesis = %hex::encode(digest), "established ledger at genesis");
        Ok(Self {
            nodes,
            max_tip: digest,
            mempool: Mempool::new(),
        })
    }

    /// Offer a block for inclusion.
    ///
    /// The block joins the branch its parent tips. Its transactions
    /// are validated in sequence against a working copy of the
    /// parent's unspent set; one invalid transaction rejects the whole
    /// block and leaves the ledger untouched. On acceptance the
    /// coinbase is credited (issuance is exempt from the balance
    /// rule), the best-tip pointer moves if this block is strictly the
    /// new maximum, and nodes that drop out of the retention window
    /// are pruned.
    ///
    /// Expected failures come back as [`BlockVerdict::Rejected`]; only
    /// a structurally malformed coinbase is an error.
    pub fn add_block(&mut self, block: &Block) -> Result<BlockVerdict> {
        check_coinbase(&block.coinbase)?;

        let parent_hash = match block.prev_block_hash {
            Some(hash) => hash,
            None => {
                debug!("rejected block without parent reference");
                return Ok(BlockVerdict::Rejected(BlockRejection::NoParentDeclared));
            }
        };

        let (mut utxo_pool, parent_height) = match self.nodes.get(&parent_hash) {
            Some(parent) => (parent.utxo_pool.clone(), parent.height),
            None => {
                debug!(parent = %hex::encode(parent_hash), "rejected block with unknown parent");
                return Ok(BlockVerdict::Rejected(BlockRejection::ParentNotFound(
                    parent_hash,
                )));
            }
        };

        for (index, tx) in block.transactions.iter().enumerate() {
            match check_transaction(tx, &utxo_pool) {
                TxVerdict::Valid => apply_transaction(tx, &mut utxo_pool),
                TxVerdict::Invalid(reason) => {
                    debug!(index, %reason, "rejected block over invalid transaction");
                    return Ok(BlockVerdict::Rejected(BlockRejection::InvalidTransaction {
                        index,
                        reason,
                    }));
                }
            }
        }

        let new_height = parent_height + 1;
        let max_height = self.max_height();
        if new_height + CUT_OFF_AGE <= max_height {
            debug!(height = new_height, max_height, "rejected block below retention window");
            return Ok(BlockVerdict::Rejected(BlockRejection::StaleHeight {
                height: new_height,
                max_height,
            }));
        }

        apply_transaction(&block.coinbase, &mut utxo_pool);

        let digest = block.digest();
        self.nodes.insert(
            digest,
            ChainNode {
                block: block.clone(),
                height: new_height,
                utxo_pool,
            },
        );

        // ties keep the incumbent tip; only a strictly greater height
        // moves the pointer and shifts the retention window
        if new_height > max_height {
            self.max_tip = digest;
            self.prune(new_height);
        }

        debug!(block = %hex::encode(digest), height = new_height, "accepted block");
        Ok(BlockVerdict::Accepted)
    }

    /// Queue a transaction for future block inclusion.
    ///
    /// No validation happens here; the transaction is checked when a
    /// block carries it. Confirmed transactions are not removed
    /// automatically.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.mempool.add_transaction(tx);
    }

    /// The block at the tip of the current best branch
    pub fn max_height_block(&self) -> &Block {
        &self.max_tip_node().block
    }

    /// The unspent-output set of the current best branch
    pub fn max_height_utxo_pool(&self) -> &UtxoPool {
        &self.max_tip_node().utxo_pool
    }

    /// Height of the current best branch
    pub fn max_height(&self) -> u64 {
        self.max_tip_node().height
    }

    /// The shared pending-transaction pool
    pub fn mempool(&self) -> &Mempool {
        &self.mempool
    }

    pub fn mempool_mut(&mut self) -> &mut Mempool {
        &mut self.mempool
    }

    /// Look up a retained node by block digest
    pub fn node(&self, block_hash: &Hash) -> Option<&ChainNode> {
        self.nodes.get(block_hash)
    }

    /// Whether a block digest is among retained nodes
    pub fn contains_block(&self, block_hash: &Hash) -> bool {
        self.nodes.contains_key(block_hash)
    }

    /// Number of retained nodes across all branches
    pub fn retained_count(&self) -> usize {
        self.nodes.len()
    }

    fn max_tip_node(&self) -> &ChainNode {
        self.nodes
            .get(&self.max_tip)
            .expect("the best tip always clears the retention window")
    }

    fn prune(&mut self, max_height: u64) {
        let before = self.nodes.len();
        self.nodes
            .retain(|_, node| node.height + CUT_OFF_AGE > max_height);
        let pruned = before - self.nodes.len();
        if pruned > 0 {
            debug!(pruned, max_height, "pruned nodes below retention window");
        }
    }
}

/// A coinbase spends nothing and only issues non-negative value;
/// anything else is malformed input, not a validation outcome
fn check_coinbase(coinbase: &Transaction) -> Result<()> {
    if !coinbase.is_coinbase() {
        return Err(LedgerError::MalformedBlock(
            "coinbase declares inputs".to_string(),
        ));
    }
    for output in &coinbase.outputs {
        if output.value < 0 {
            return Err(LedgerError::MalformedBlock(format!(
                "coinbase output of negative value {}",
                output.value
            )));
        }
    }
    Ok(())
}
