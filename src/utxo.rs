//! Unspent-output set

use crate::types::{Output, OutputRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The set of unspent outputs a branch can spend from.
///
/// Every chain node owns its own pool; snapshots for validation or
/// block assembly are taken with an explicit [`Clone`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoPool {
    outputs: HashMap<OutputRef, Output>,
}

impl UtxoPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unspent output, replacing any previous entry for `outpoint`
    pub fn add(&mut self, outpoint: OutputRef, output: Output) {
        self.outputs.insert(outpoint, output);
    }

    /// Remove an output; absent outpoints are ignored
    pub fn remove(&mut self, outpoint: &OutputRef) {
        self.outputs.remove(outpoint);
    }

    /// Whether `outpoint` is unspent in this pool
    pub fn contains(&self, outpoint: &OutputRef) -> bool {
        self.outputs.contains_key(outpoint)
    }

    /// Look up the output behind `outpoint`
    pub fn get_output(&self, outpoint: &OutputRef) -> Option<&Output> {
        self.outputs.get(outpoint)
    }

    /// Iterate over all unspent entries, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = (&OutputRef, &Output)> {
        self.outputs.iter()
    }

    /// Iterate over all unspent outpoints
    pub fn outpoints(&self) -> impl Iterator<Item = &OutputRef> {
        self.outputs.keys()
    }

    /// Number of unspent outputs
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
