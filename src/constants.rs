//! Ledger constants

/// Retention window: a branch whose tip lags the best tip by more than
/// this many heights can no longer be extended and is pruned
pub const CUT_OFF_AGE: u64 = 4;

/// Smallest accounting unit per coin
pub const COIN: i64 = 100_000_000;

/// Value issued by each block's coinbase: 25 coins
pub const COINBASE_VALUE: i64 = 25 * COIN;

/// Height assigned to the genesis block
pub const GENESIS_HEIGHT: u64 = 1;
