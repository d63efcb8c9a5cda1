//! Transaction validation against an unspent-output snapshot

use crate::crypto;
use crate::types::{OutputRef, Transaction, Value};
use crate::utxo::UtxoPool;
use std::collections::HashSet;
use thiserror::Error;

/// Verdict for a single transaction checked against a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxVerdict {
    Valid,
    Invalid(TxRejection),
}

/// Why a transaction was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxRejection {
    #[error("input {input} spends unknown output {outpoint}")]
    MissingOutput { input: usize, outpoint: OutputRef },

    #[error("input {input} carries a signature that does not verify")]
    InvalidSignature { input: usize },

    #[error("input {input} claims {outpoint} a second time")]
    DuplicateOutputRef { input: usize, outpoint: OutputRef },

    #[error("input {input} spends an output of negative value {value}")]
    NegativeReferencedValue { input: usize, value: Value },

    #[error("output {index} declares negative value {value}")]
    NegativeOutputValue { index: usize, value: Value },

    #[error("declared outputs total {output_total} exceeds spent inputs total {input_total}")]
    OutputsExceedInputs { input_total: i128, output_total: i128 },
}

/// Check one transaction against a snapshot of the unspent-output set.
///
/// A transaction is valid if and only if:
/// 1. every input spends an output present in `pool`
/// 2. every input's signature verifies against the owner key recorded
///    on the output it spends, over that input's signing payload
/// 3. no output is claimed by more than one input
/// 4. no referenced or declared output value is negative
/// 5. the values spent cover the values declared
///
/// The snapshot is never modified. Checking stops at the first
/// violated condition, reported as [`TxVerdict::Invalid`].
pub fn check_transaction(tx: &Transaction, pool: &UtxoPool) -> TxVerdict {
    let mut claimed: HashSet<&OutputRef> = HashSet::new();
    let mut input_total: i128 = 0;

    for (i, input) in tx.inputs.iter().enumerate() {
        // 1. The spent output must be unspent in the snapshot
        let output = match pool.get_output(&input.prevout) {
            Some(output) => output,
            None => {
                return TxVerdict::Invalid(TxRejection::MissingOutput {
                    input: i,
                    outpoint: input.prevout.clone(),
                });
            }
        };

        // 2. The signature must verify against the recorded owner key
        let message = tx.raw_data_to_sign(i);
        if !crypto::verify_signature(&output.owner, &message, &input.signature) {
            return TxVerdict::Invalid(TxRejection::InvalidSignature { input: i });
        }

        // 3. No output may be claimed twice within this transaction
        if !claimed.insert(&input.prevout) {
            return TxVerdict::Invalid(TxRejection::DuplicateOutputRef {
                input: i,
                outpoint: input.prevout.clone(),
            });
        }

        // 4. Referenced values must be non-negative
        if output.value < 0 {
            return TxVerdict::Invalid(TxRejection::NegativeReferencedValue {
                input: i,
                value: output.value,
            });
        }

        input_total += output.value as i128;
    }

    let mut output_total: i128 = 0;
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 {
            return TxVerdict::Invalid(TxRejection::NegativeOutputValue {
                index: i,
                value: output.value,
            });
        }
        output_total += output.value as i128;
    }

    // 5. Conservation: spent values cover declared values. The
    // difference is an implicit fee this core does not redistribute.
    if input_total < output_total {
        return TxVerdict::Invalid(TxRejection::OutputsExceedInputs {
            input_total,
            output_total,
        });
    }

    TxVerdict::Valid
}

/// Select a maximal mutually valid subset of `candidates`, in the
/// order given.
///
/// Single greedy left-to-right pass: each candidate is checked against
/// the working snapshot, and accepted candidates are applied before
/// the next one is considered. A candidate may therefore spend outputs
/// created earlier in the same batch, but never later ones; no
/// reordering or retry is attempted.
///
/// On return `pool` holds the state after every accepted transaction.
pub fn select_valid(candidates: &[Transaction], pool: &mut UtxoPool) -> Vec<Transaction> {
    let mut accepted = Vec::new();

    for tx in candidates {
        if check_transaction(tx, pool) == TxVerdict::Valid {
            apply_transaction(tx, pool);
            accepted.push(tx.clone());
        }
    }

    accepted
}

/// Apply a validated transaction to the pool: consume the outputs it
/// claims and credit the outputs it declares, keyed by its digest
pub fn apply_transaction(tx: &Transaction, pool: &mut UtxoPool) {
    for input in &tx.inputs {
        pool.remove(&input.prevout);
    }

    let tx_hash = tx.digest();
    for (i, output) in tx.outputs.iter().enumerate() {
        pool.add(OutputRef::new(tx_hash, i as u32), output.clone());
    }
}
