//! Core ledger types and their canonical encodings

use crate::crypto;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash type: 256-bit content digest
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Monetary value type, signed so invalid negative amounts are
/// representable and rejected by validation
pub type Value = i64;

/// Identity of a transaction output: creating transaction digest plus
/// position among that transaction's outputs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    pub tx_hash: Hash,
    pub index: u32,
}

impl OutputRef {
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.tx_hash), self.index)
    }
}

/// Transaction output: a value owned by a serialized public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub value: Value,
    pub owner: ByteString,
}

/// Transaction input: the output it spends plus a DER signature over
/// the owning transaction's signing payload for this input's position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub prevout: OutputRef,
    pub signature: ByteString,
}

/// Transaction: ordered inputs spending prior outputs, ordered outputs
/// creating new ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Transaction {
    /// Create an empty transaction
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coinbase transaction: no inputs, a single output
    /// issuing `value` to `owner`
    pub fn coinbase(value: Value, owner: &[u8]) -> Self {
        let mut tx = Self::new();
        tx.add_output(value, owner);
        tx
    }

    /// Append an input spending output `index` of the transaction with
    /// digest `prev_tx_hash`. The signature starts empty; set it with
    /// [`Transaction::add_signature`] once computed.
    pub fn add_input(&mut self, prev_tx_hash: Hash, index: u32) {
        self.inputs.push(Input {
            prevout: OutputRef::new(prev_tx_hash, index),
            signature: ByteString::new(),
        });
    }

    /// Append an output paying `value` to `owner`
    pub fn add_output(&mut self, value: Value, owner: &[u8]) {
        self.outputs.push(Output {
            value,
            owner: owner.to_vec(),
        });
    }

    /// Attach a signature to the input at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid input position.
    pub fn add_signature(&mut self, index: usize, signature: ByteString) {
        self.inputs[index].signature = signature;
    }

    /// Canonical signing payload for the input at `index`: that input's
    /// outpoint followed by every output.
    ///
    /// Signature bytes are excluded, so each input's signature covers
    /// the transaction's intent independent of the other inputs'
    /// signatures.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid input position.
    pub fn raw_data_to_sign(&self, index: usize) -> ByteString {
        let input = &self.inputs[index];
        let mut data = ByteString::new();
        data.extend_from_slice(&input.prevout.tx_hash);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        for output in &self.outputs {
            data.extend_from_slice(&output.value.to_le_bytes());
            data.extend_from_slice(&output.owner);
        }
        data
    }

    /// Full canonical encoding: every input including its signature,
    /// then every output
    pub fn raw(&self) -> ByteString {
        let mut data = ByteString::new();
        for input in &self.inputs {
            data.extend_from_slice(&input.prevout.tx_hash);
            data.extend_from_slice(&input.prevout.index.to_le_bytes());
            data.extend_from_slice(&input.signature);
        }
        for output in &self.outputs {
            data.extend_from_slice(&output.value.to_le_bytes());
            data.extend_from_slice(&output.owner);
        }
        data
    }

    /// Content digest keying this transaction's outputs
    pub fn digest(&self) -> Hash {
        crypto::sha256(&self.raw())
    }

    /// A coinbase issues new value and spends nothing
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Block: parent reference (absent only for genesis), the issuance
/// transaction, and the spending transactions it confirms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub prev_block_hash: Option<Hash>,
    pub coinbase: Transaction,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(
        prev_block_hash: Option<Hash>,
        coinbase: Transaction,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            prev_block_hash,
            coinbase,
            transactions,
        }
    }

    /// Canonical encoding over structural content: parent digest when
    /// present, then the coinbase, then every transaction
    pub fn raw(&self) -> ByteString {
        let mut data = ByteString::new();
        if let Some(prev) = &self.prev_block_hash {
            data.extend_from_slice(prev);
        }
        data.extend_from_slice(&self.coinbase.raw());
        for tx in &self.transactions {
            data.extend_from_slice(&tx.raw());
        }
        data
    }

    /// Content digest identifying this block in the ledger
    pub fn digest(&self) -> Hash {
        crypto::sha256(&self.raw())
    }
}
