//! Cryptographic primitives consumed by validation

use crate::types::Hash;
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

/// SHA-256 content digest
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Verify a DER-encoded ECDSA signature over `message` against a
/// serialized secp256k1 public key.
///
/// The message is hashed with SHA-256 before verification. Malformed
/// keys and signatures verify as false, never as an error.
pub fn verify_signature(pubkey_bytes: &[u8], message: &[u8], signature_der: &[u8]) -> bool {
    let pubkey = match PublicKey::from_slice(pubkey_bytes) {
        Ok(pk) => pk,
        Err(_) => return false,
    };

    let signature = match Signature::from_der(signature_der) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    let msg = match Message::from_digest_slice(&sha256(message)) {
        Ok(m) => m,
        Err(_) => return false,
    };

    let secp = Secp256k1::verification_only();
    secp.verify_ecdsa(&msg, &signature, &pubkey).is_ok()
}
