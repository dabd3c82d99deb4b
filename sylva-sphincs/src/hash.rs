//! The engine's hash interface.
//!
//! Every component hashes exclusively through this module, never through the
//! raw primitive, so domain separation is structurally enforced: each keyed
//! call absorbs the serialized [`Address`] first, then the seed, then the
//! payload.
//!
//! The hash is fixed to SHA-256; its 32-byte output is the scheme's `n`.

use crate::address::Address;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Hash output length in bytes (`n`).
pub const HASH_BYTES: usize = 32;

/// A single hash output.
pub type Node = [u8; HASH_BYTES];

/// Derive a secret element, keyed by `sk_seed`.
///
/// The output is secret key material and comes wrapped in `Zeroizing`.
pub fn prf(sk_seed: &[u8], adrs: &Address) -> Zeroizing<Node> {
    let mut hasher = Sha256::new();
    hasher.update(adrs.to_bytes());
    hasher.update(sk_seed);
    Zeroizing::new(hasher.finalize().into())
}

/// Chaining / leaf hash over a single input.
pub fn f(pk_seed: &[u8], adrs: &Address, m: &[u8]) -> Node {
    let mut hasher = Sha256::new();
    hasher.update(adrs.to_bytes());
    hasher.update(pk_seed);
    hasher.update(m);
    hasher.finalize().into()
}

/// Two-to-one hash for Merkle tree nodes.
pub fn h_node(pk_seed: &[u8], adrs: &Address, left: &[u8], right: &[u8]) -> Node {
    let mut hasher = Sha256::new();
    hasher.update(adrs.to_bytes());
    hasher.update(pk_seed);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Multi-input compression (FORS root bundle).
pub fn t_len(pk_seed: &[u8], adrs: &Address, m: &[u8]) -> Node {
    let mut hasher = Sha256::new();
    hasher.update(adrs.to_bytes());
    hasher.update(pk_seed);
    hasher.update(m);
    hasher.finalize().into()
}

/// Message digest: `SHA-256(randomizer || root || message)`.
///
/// This is the one unkeyed hash in the scheme; the randomizer makes the
/// digest unpredictable per signature and the root binds it to the key pair.
pub fn h_msg(randomizer: &[u8], root: &[u8], message: &[u8]) -> Node {
    let mut hasher = Sha256::new();
    hasher.update(randomizer);
    hasher.update(root);
    hasher.update(message);
    hasher.finalize().into()
}
