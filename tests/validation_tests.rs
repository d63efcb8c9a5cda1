//! Tests for validation semantics across blocks and batches

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use utxo_ledger::*;

fn test_keypair(seed: u8) -> (SecretKey, Vec<u8>) {
    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
    let public = PublicKey::from_secret_key(&secp, &secret);
    (secret, public.serialize().to_vec())
}

fn sign_input(tx: &mut Transaction, index: usize, secret: &SecretKey) {
    let secp = Secp256k1::new();
    let digest = crypto::sha256(&tx.raw_data_to_sign(index));
    let message = Message::from_digest_slice(&digest).unwrap();
    let signature = secp.sign_ecdsa(&message, secret).serialize_der().to_vec();
    tx.add_signature(index, signature);
}

fn make_genesis(owner: &[u8]) -> Block {
    Block::new(None, Transaction::coinbase(COINBASE_VALUE, owner), vec![])
}

#[test]
fn test_block_is_strict_where_selection_is_tolerant() -> anyhow::Result<()> {
    let (miner_secret, miner) = test_keypair(1);
    let (recipient_secret, recipient) = test_keypair(2);
    let (_, next_miner) = test_keypair(3);

    let genesis = make_genesis(&miner);
    let mut ledger = Ledger::new(&genesis)?;

    let mut good = Transaction::new();
    good.add_input(genesis.coinbase.digest(), 0);
    good.add_output(COINBASE_VALUE, &recipient);
    sign_input(&mut good, 0, &miner_secret);

    let mut overspend = Transaction::new();
    overspend.add_input(good.digest(), 0);
    overspend.add_output(COINBASE_VALUE + 1, &recipient);
    sign_input(&mut overspend, 0, &recipient_secret);

    // batch selection shrugs the bad candidate off
    let candidates = vec![good.clone(), overspend.clone()];
    let mut snapshot = ledger.max_height_utxo_pool().clone();
    let chosen = select_valid(&candidates, &mut snapshot);
    assert_eq!(chosen, vec![good.clone()]);

    // a block carrying the same pair is rejected outright
    let block = Block::new(
        Some(genesis.digest()),
        Transaction::coinbase(COINBASE_VALUE, &next_miner),
        vec![good, overspend],
    );
    assert!(matches!(
        ledger.add_block(&block)?,
        BlockVerdict::Rejected(BlockRejection::InvalidTransaction { index: 1, .. })
    ));
    assert_eq!(ledger.max_height(), 1);
    Ok(())
}

#[test]
fn test_same_output_spends_differently_per_branch() -> anyhow::Result<()> {
    let (miner_secret, miner) = test_keypair(1);
    let (_, alice) = test_keypair(2);
    let (_, bob) = test_keypair(3);
    let (_, miner_a) = test_keypair(4);
    let (_, miner_b) = test_keypair(5);

    let genesis = make_genesis(&miner);
    let mut ledger = Ledger::new(&genesis)?;
    let issued = genesis.coinbase.digest();

    let mut to_alice = Transaction::new();
    to_alice.add_input(issued, 0);
    to_alice.add_output(COINBASE_VALUE, &alice);
    sign_input(&mut to_alice, 0, &miner_secret);

    let mut to_bob = Transaction::new();
    to_bob.add_input(issued, 0);
    to_bob.add_output(COINBASE_VALUE, &bob);
    sign_input(&mut to_bob, 0, &miner_secret);

    // each sibling spends the same issuance its own way
    let branch_a = Block::new(
        Some(genesis.digest()),
        Transaction::coinbase(COINBASE_VALUE, &miner_a),
        vec![to_alice.clone()],
    );
    let branch_b = Block::new(
        Some(genesis.digest()),
        Transaction::coinbase(COINBASE_VALUE, &miner_b),
        vec![to_bob.clone()],
    );
    assert_eq!(ledger.add_block(&branch_a)?, BlockVerdict::Accepted);
    assert_eq!(ledger.add_block(&branch_b)?, BlockVerdict::Accepted);

    let pool_a = &ledger.node(&branch_a.digest()).unwrap().utxo_pool;
    let pool_b = &ledger.node(&branch_b.digest()).unwrap().utxo_pool;
    assert!(pool_a.contains(&OutputRef::new(to_alice.digest(), 0)));
    assert!(pool_b.contains(&OutputRef::new(to_bob.digest(), 0)));
    Ok(())
}

#[test]
fn test_fee_stays_implicit() {
    let (secret, owner) = test_keypair(1);
    let (_, recipient) = test_keypair(2);

    let mut funding = Transaction::new();
    funding.add_output(10, &owner);
    let funding_hash = funding.digest();
    let mut pool = UtxoPool::new();
    pool.add(OutputRef::new(funding_hash, 0), funding.outputs[0].clone());

    let mut spend = Transaction::new();
    spend.add_input(funding_hash, 0);
    spend.add_output(6, &recipient);
    spend.add_output(3, &recipient);
    sign_input(&mut spend, 0, &secret);

    let chosen = select_valid(&[spend.clone()], &mut pool);
    assert_eq!(chosen.len(), 1);

    // the one-unit difference vanishes; nothing redistributes it
    let total: i64 = pool.entries().map(|(_, output)| output.value).sum();
    assert_eq!(total, 9);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_tampered_transaction_rejected_in_block() -> anyhow::Result<()> {
    let (miner_secret, miner) = test_keypair(1);
    let (_, recipient) = test_keypair(2);
    let (_, next_miner) = test_keypair(3);

    let genesis = make_genesis(&miner);
    let mut ledger = Ledger::new(&genesis)?;

    let mut spend = Transaction::new();
    spend.add_input(genesis.coinbase.digest(), 0);
    spend.add_output(COINBASE_VALUE - 5, &recipient);
    sign_input(&mut spend, 0, &miner_secret);
    // the payload changes after signing, so the signature dies with it
    spend.outputs[0].value = COINBASE_VALUE;

    let block = Block::new(
        Some(genesis.digest()),
        Transaction::coinbase(COINBASE_VALUE, &next_miner),
        vec![spend],
    );
    assert!(matches!(
        ledger.add_block(&block)?,
        BlockVerdict::Rejected(BlockRejection::InvalidTransaction {
            index: 0,
            reason: TxRejection::InvalidSignature { .. },
        })
    ));
    Ok(())
}

#[test]
fn test_issuance_outside_coinbase_is_rejected() -> anyhow::Result<()> {
    let (_, miner) = test_keypair(1);
    let (_, opportunist) = test_keypair(2);
    let (_, next_miner) = test_keypair(3);

    let genesis = make_genesis(&miner);
    let mut ledger = Ledger::new(&genesis)?;

    // a body transaction shaped like a coinbase creates value from
    // nothing and fails the balance rule
    let freeloader = Transaction::coinbase(1, &opportunist);
    let block = Block::new(
        Some(genesis.digest()),
        Transaction::coinbase(COINBASE_VALUE, &next_miner),
        vec![freeloader],
    );
    assert!(matches!(
        ledger.add_block(&block)?,
        BlockVerdict::Rejected(BlockRejection::InvalidTransaction {
            index: 0,
            reason: TxRejection::OutputsExceedInputs { .. },
        })
    ));
    Ok(())
}
