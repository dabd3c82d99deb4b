//! WOTS+ one-time signatures.
//!
//! Each key pair signs exactly one n-byte digest. The digest is split into
//! `len1` base-w digits plus a `len2`-digit checksum; every digit selects how
//! far to walk one hash chain. The checksum grows when message digits shrink,
//! so an attacker can never move all chains forward at once.

use crate::address::{Address, AddressType};
use crate::hash::{self, Node, HASH_BYTES};
use crate::params::SphincsParams;
use crate::utils::{base_2b, checksum_digits, wots_checksum};
use alloc::vec::Vec;
use sylva_core::{Error, Result};

/// Walk a hash chain `steps` times starting at chain position `start`.
///
/// Each step hashes under an address whose step field is the current chain
/// position, so no two steps anywhere in the key structure share an input
/// context.
pub fn chain(
    x: &Node,
    start: u32,
    steps: u32,
    pk_seed: &[u8],
    adrs: &mut Address,
) -> Node {
    let mut node = *x;
    for j in start..start + steps {
        adrs.set_step(j);
        node = hash::f(pk_seed, adrs, &node);
    }
    node
}

/// Digest as `len` chain digits: `len1` message digits followed by the
/// `len2`-digit checksum.
fn message_digits(params: &SphincsParams, digest: &[u8]) -> Vec<u32> {
    let mut digits = base_2b(digest, params.lg_w, params.len1);
    let csum = wots_checksum(&digits, params.w);
    digits.extend(checksum_digits(csum, params.lg_w, params.len2));
    digits
}

/// Compress the `len` chain endpoints into one public key value.
///
/// Iterative binary L-tree: pairwise hashing level by level, odd leftover
/// promoted unchanged, until a single node remains. The address is keyed by
/// level and pair index.
fn l_tree(mut nodes: Vec<Node>, pk_seed: &[u8], adrs: &Address) -> Node {
    debug_assert!(!nodes.is_empty());
    let mut adrs = adrs.with_type(AddressType::WotsPk);

    let mut level = 0u32;
    while nodes.len() > 1 {
        adrs.set_height(level);
        let mut next = Vec::with_capacity(nodes.len().div_ceil(2));
        for (i, pair) in nodes.chunks(2).enumerate() {
            if let [left, right] = pair {
                adrs.set_index(i as u32);
                next.push(hash::h_node(pk_seed, &adrs, left, right));
            } else {
                next.push(pair[0]);
            }
        }
        nodes = next;
        level += 1;
    }
    nodes[0]
}

/// Generate a WOTS+ public key: every chain walked to its end, then L-tree
/// compressed.
pub fn pk_gen(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    adrs: &mut Address,
) -> Node {
    let mut sk_adrs = adrs.with_type(AddressType::WotsPrf);
    let mut ends = Vec::with_capacity(params.len);

    for i in 0..params.len {
        sk_adrs.set_chain(i as u32);
        let sk_i = hash::prf(sk_seed, &sk_adrs);

        adrs.set_chain(i as u32);
        ends.push(chain(&sk_i, 0, params.w - 1, pk_seed, adrs));
    }

    l_tree(ends, pk_seed, adrs)
}

/// Sign an n-byte digest into a pre-allocated buffer of `len * n` bytes.
pub fn sign_to(
    params: &SphincsParams,
    out: &mut [u8],
    digest: &[u8],
    sk_seed: &[u8],
    pk_seed: &[u8],
    adrs: &mut Address,
) {
    debug_assert_eq!(out.len(), params.wots_sig_bytes());
    let digits = message_digits(params, digest);
    let mut sk_adrs = adrs.with_type(AddressType::WotsPrf);

    for (i, chunk) in out.chunks_exact_mut(HASH_BYTES).enumerate() {
        sk_adrs.set_chain(i as u32);
        let sk_i = hash::prf(sk_seed, &sk_adrs);

        adrs.set_chain(i as u32);
        let node = chain(&sk_i, 0, digits[i], pk_seed, adrs);
        chunk.copy_from_slice(&node);
    }
}

/// Sign an n-byte digest.
// Production paths write into pre-sized signature buffers via `sign_to`;
// the allocating form is exercised by unit tests.
#[allow(dead_code)]
pub fn sign(
    params: &SphincsParams,
    digest: &[u8],
    sk_seed: &[u8],
    pk_seed: &[u8],
    adrs: &mut Address,
) -> Vec<u8> {
    let mut sig = alloc::vec![0u8; params.wots_sig_bytes()];
    sign_to(params, &mut sig, digest, sk_seed, pk_seed, adrs);
    sig
}

/// Recover the public key from a signature and the digest it signs.
///
/// Each signature element is walked the remaining `w - 1 - digit` steps; a
/// signature over a different digest lands on different chain endpoints and
/// compresses to a different key.
pub fn pk_from_sig(
    params: &SphincsParams,
    sig: &[u8],
    digest: &[u8],
    pk_seed: &[u8],
    adrs: &mut Address,
) -> Result<Node> {
    if sig.len() != params.wots_sig_bytes() {
        return Err(Error::MalformedSignature {
            expected: params.wots_sig_bytes(),
            actual: sig.len(),
        });
    }

    let digits = message_digits(params, digest);
    let mut ends = Vec::with_capacity(params.len);

    for (i, part) in sig.chunks_exact(HASH_BYTES).enumerate() {
        let mut node = [0u8; HASH_BYTES];
        node.copy_from_slice(part);

        adrs.set_chain(i as u32);
        ends.push(chain(
            &node,
            digits[i],
            params.w - 1 - digits[i],
            pk_seed,
            adrs,
        ));
    }

    Ok(l_tree(ends, pk_seed, adrs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SphincsParams {
        SphincsParams::new(128).unwrap()
    }

    fn chain_adrs() -> Address {
        Address::new(AddressType::WotsChain, 0, 0)
    }

    #[test]
    fn chain_zero_steps_is_identity() {
        let x = [3u8; HASH_BYTES];
        let mut adrs = chain_adrs();
        assert_eq!(chain(&x, 0, 0, &[1u8; 32], &mut adrs), x);
    }

    #[test]
    fn chain_composes() {
        let x = [0u8; HASH_BYTES];
        let pk_seed = [1u8; 32];

        let mut adrs = chain_adrs();
        let full = chain(&x, 0, 3, &pk_seed, &mut adrs);

        let mut adrs1 = chain_adrs();
        let part = chain(&x, 0, 2, &pk_seed, &mut adrs1);
        let mut adrs2 = chain_adrs();
        let rest = chain(&part, 2, 1, &pk_seed, &mut adrs2);

        assert_eq!(full, rest);
    }

    #[test]
    fn digits_cover_len_and_balance_checksum() {
        let p = params();
        let digits = message_digits(&p, &[0u8; HASH_BYTES]);
        assert_eq!(digits.len(), p.len);
        // All-zero message digits give the maximal checksum len1*(w-1).
        let csum: u32 = digits[p.len1..].iter().fold(0, |acc, &d| acc * p.w + d);
        assert_eq!(csum as usize, p.len1 * (p.w as usize - 1));
    }

    #[test]
    fn pk_gen_is_deterministic() {
        let p = params();
        let mut a1 = chain_adrs();
        let mut a2 = chain_adrs();
        let pk1 = pk_gen(&p, &[1u8; 32], &[2u8; 32], &mut a1);
        let pk2 = pk_gen(&p, &[1u8; 32], &[2u8; 32], &mut a2);
        assert_eq!(pk1, pk2);
    }

    #[test]
    fn sign_recover_roundtrip() {
        let p = params();
        let sk_seed = [1u8; 32];
        let pk_seed = [2u8; 32];
        let digest = [3u8; HASH_BYTES];

        let mut pk_adrs = chain_adrs();
        let pk = pk_gen(&p, &sk_seed, &pk_seed, &mut pk_adrs);

        let mut sign_adrs = chain_adrs();
        let sig = sign(&p, &digest, &sk_seed, &pk_seed, &mut sign_adrs);
        assert_eq!(sig.len(), p.wots_sig_bytes());

        let mut verify_adrs = chain_adrs();
        let recovered = pk_from_sig(&p, &sig, &digest, &pk_seed, &mut verify_adrs).unwrap();
        assert_eq!(pk, recovered);
    }

    #[test]
    fn wrong_digest_recovers_wrong_key() {
        let p = params();
        let sk_seed = [1u8; 32];
        let pk_seed = [2u8; 32];

        let mut pk_adrs = chain_adrs();
        let pk = pk_gen(&p, &sk_seed, &pk_seed, &mut pk_adrs);

        let mut sign_adrs = chain_adrs();
        let sig = sign(&p, &[3u8; HASH_BYTES], &sk_seed, &pk_seed, &mut sign_adrs);

        let mut verify_adrs = chain_adrs();
        let recovered =
            pk_from_sig(&p, &sig, &[4u8; HASH_BYTES], &pk_seed, &mut verify_adrs).unwrap();
        assert_ne!(pk, recovered);
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let p = params();
        let mut adrs = chain_adrs();
        let err = pk_from_sig(&p, &[0u8; 31], &[0u8; HASH_BYTES], &[0u8; 32], &mut adrs)
            .unwrap_err();
        assert_eq!(
            err,
            Error::MalformedSignature {
                expected: p.wots_sig_bytes(),
                actual: 31,
            }
        );
    }

    #[test]
    fn distinct_key_pairs_give_distinct_keys() {
        let p = params();
        let mut a1 = chain_adrs();
        let mut a2 = chain_adrs();
        a2.set_key_pair(1);
        let pk1 = pk_gen(&p, &[1u8; 32], &[2u8; 32], &mut a1);
        let pk2 = pk_gen(&p, &[1u8; 32], &[2u8; 32], &mut a2);
        assert_ne!(pk1, pk2);
    }
}
