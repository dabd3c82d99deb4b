//! FORS few-time signatures.
//!
//! The message digest selects one secret leaf in each of `k` independent
//! Merkle trees of `t = 2^a` leaves. A signature reveals each selected leaf
//! value together with its authentication path; the verifier recomputes the
//! `k` tree roots and compresses them into the FORS public key.

use crate::address::{Address, AddressType};
use crate::hash::{self, Node, HASH_BYTES};
use crate::params::SphincsParams;
use crate::utils::base_2b;
use alloc::vec::Vec;
use sylva_core::{Error, Result};

/// The `k` a-bit leaf indices encoded in a message digest.
fn leaf_indices(params: &SphincsParams, md: &[u8]) -> Vec<u32> {
    base_2b(md, params.a, params.k)
}

/// Leaf hash at position `leaf_idx` of tree `tree_idx`.
///
/// Node indices are global across the forest (`tree_idx * t + leaf_idx`), so
/// every leaf in every tree derives from a unique address.
pub(crate) fn leaf(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    tree_idx: u32,
    leaf_idx: u32,
    adrs: &Address,
) -> Node {
    let global = tree_idx * params.t as u32 + leaf_idx;

    let mut sk_adrs = adrs.with_type(AddressType::ForsPrf);
    sk_adrs.set_index(global);
    let sk = hash::prf(sk_seed, &sk_adrs);

    let mut leaf_adrs = adrs.with_type(AddressType::ForsTree);
    leaf_adrs.set_index(global);
    hash::f(pk_seed, &leaf_adrs, &*sk)
}

/// All `t` leaves of one tree.
fn tree_leaves(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    tree_idx: u32,
    adrs: &Address,
) -> Vec<Node> {
    #[cfg(feature = "parallel")]
    {
        crate::parallel::fors_leaves(params, sk_seed, pk_seed, tree_idx, adrs)
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..params.t as u32)
            .map(|i| leaf(params, sk_seed, pk_seed, tree_idx, i, adrs))
            .collect()
    }
}

/// Fold one tree bottom-up, capturing the sibling of the path from
/// `leaf_idx` at every level into `auth_out`. Returns the root.
fn root_with_auth(
    params: &SphincsParams,
    mut nodes: Vec<Node>,
    tree_idx: u32,
    leaf_idx: u32,
    pk_seed: &[u8],
    adrs: &Address,
    auth_out: &mut [u8],
) -> Node {
    debug_assert_eq!(nodes.len(), params.t);
    debug_assert_eq!(auth_out.len(), params.a * HASH_BYTES);

    let mut node_adrs = adrs.with_type(AddressType::ForsTree);
    let mut idx = leaf_idx;

    for z in 0..params.a {
        auth_out[z * HASH_BYTES..(z + 1) * HASH_BYTES]
            .copy_from_slice(&nodes[(idx ^ 1) as usize]);

        node_adrs.set_height((z + 1) as u32);
        let width = nodes.len() / 2;
        let mut next = Vec::with_capacity(width);
        for i in 0..width {
            node_adrs.set_index(tree_idx * (params.t >> (z + 1)) as u32 + i as u32);
            next.push(hash::h_node(pk_seed, &node_adrs, &nodes[2 * i], &nodes[2 * i + 1]));
        }
        nodes = next;
        idx >>= 1;
    }

    nodes[0]
}

/// Sign a message digest into a pre-allocated `k * (1 + a) * n` buffer.
///
/// Per tree: the selected secret leaf value, then its height-`a`
/// authentication path computed from the actual tree.
pub fn sign_to(
    params: &SphincsParams,
    out: &mut [u8],
    md: &[u8],
    sk_seed: &[u8],
    pk_seed: &[u8],
    adrs: &Address,
) {
    debug_assert_eq!(out.len(), params.fors_sig_bytes());

    let indices = leaf_indices(params, md);
    let chunk = (1 + params.a) * HASH_BYTES;

    for (i, tree_out) in out.chunks_exact_mut(chunk).enumerate() {
        let tree_idx = i as u32;
        let idx = indices[i];

        let mut sk_adrs = adrs.with_type(AddressType::ForsPrf);
        sk_adrs.set_index(tree_idx * params.t as u32 + idx);
        tree_out[..HASH_BYTES].copy_from_slice(&*hash::prf(sk_seed, &sk_adrs));

        let leaves = tree_leaves(params, sk_seed, pk_seed, tree_idx, adrs);
        root_with_auth(
            params,
            leaves,
            tree_idx,
            idx,
            pk_seed,
            adrs,
            &mut tree_out[HASH_BYTES..],
        );
    }
}

/// Sign a message digest.
// Production paths write into pre-sized signature buffers via `sign_to`;
// the allocating form is exercised by unit tests.
#[allow(dead_code)]
pub fn sign(
    params: &SphincsParams,
    md: &[u8],
    sk_seed: &[u8],
    pk_seed: &[u8],
    adrs: &Address,
) -> Vec<u8> {
    let mut sig = alloc::vec![0u8; params.fors_sig_bytes()];
    sign_to(params, &mut sig, md, sk_seed, pk_seed, adrs);
    sig
}

/// Recover the FORS public key from a signature and its digest.
pub fn pk_from_sig(
    params: &SphincsParams,
    sig: &[u8],
    md: &[u8],
    pk_seed: &[u8],
    adrs: &Address,
) -> Result<Node> {
    if sig.len() != params.fors_sig_bytes() {
        return Err(Error::MalformedSignature {
            expected: params.fors_sig_bytes(),
            actual: sig.len(),
        });
    }

    let indices = leaf_indices(params, md);
    let chunk = (1 + params.a) * HASH_BYTES;
    let mut roots = Vec::with_capacity(params.k * HASH_BYTES);
    let mut node_adrs = adrs.with_type(AddressType::ForsTree);

    for (i, part) in sig.chunks_exact(chunk).enumerate() {
        let tree_idx = i as u32;
        let idx = indices[i];
        let sk = &part[..HASH_BYTES];
        let auth = &part[HASH_BYTES..];

        // Leaf hash from the revealed secret value.
        node_adrs.set_height(0);
        node_adrs.set_index(tree_idx * params.t as u32 + idx);
        let mut node = hash::f(pk_seed, &node_adrs, sk);

        // Climb to the root along the authentication path.
        for z in 0..params.a {
            let sibling = &auth[z * HASH_BYTES..(z + 1) * HASH_BYTES];
            node_adrs.set_height((z + 1) as u32);
            node_adrs
                .set_index(tree_idx * (params.t >> (z + 1)) as u32 + (idx >> (z + 1)));

            node = if (idx >> z) & 1 == 0 {
                hash::h_node(pk_seed, &node_adrs, &node, sibling)
            } else {
                hash::h_node(pk_seed, &node_adrs, sibling, &node)
            };
        }

        roots.extend_from_slice(&node);
    }

    let pk_adrs = adrs.with_type(AddressType::ForsPk);
    Ok(hash::t_len(pk_seed, &pk_adrs, &roots))
}

/// Compute the FORS public key directly from the seeds.
///
/// Tests compare this against the key recovered from a signature; signing
/// itself recovers the value from the freshly produced signature.
#[allow(dead_code)]
pub fn pk_gen(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    adrs: &Address,
) -> Node {
    let mut roots = Vec::with_capacity(params.k * HASH_BYTES);
    let mut scratch = alloc::vec![0u8; params.a * HASH_BYTES];

    for tree_idx in 0..params.k as u32 {
        let leaves = tree_leaves(params, sk_seed, pk_seed, tree_idx, adrs);
        let root = root_with_auth(params, leaves, tree_idx, 0, pk_seed, adrs, &mut scratch);
        roots.extend_from_slice(&root);
    }

    let pk_adrs = adrs.with_type(AddressType::ForsPk);
    hash::t_len(pk_seed, &pk_adrs, &roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SphincsParams {
        SphincsParams::new(128).unwrap()
    }

    fn fors_adrs() -> Address {
        let mut adrs = Address::new(AddressType::ForsTree, 1, 0);
        adrs.set_key_pair(0);
        adrs
    }

    #[test]
    fn signature_size() {
        let p = params();
        let sig = sign(&p, &[0x55u8; 2], &[1u8; 32], &[2u8; 32], &fors_adrs());
        assert_eq!(sig.len(), p.fors_sig_bytes());
    }

    #[test]
    fn roundtrip_recovers_public_key() {
        let p = params();
        let sk_seed = [1u8; 32];
        let pk_seed = [2u8; 32];
        let md = [0x6Au8; 2];

        let expected = pk_gen(&p, &sk_seed, &pk_seed, &fors_adrs());
        let sig = sign(&p, &md, &sk_seed, &pk_seed, &fors_adrs());
        let recovered = pk_from_sig(&p, &sig, &md, &pk_seed, &fors_adrs()).unwrap();

        assert_eq!(expected, recovered);
    }

    #[test]
    fn all_digest_values_roundtrip() {
        let p = params();
        let sk_seed = [1u8; 32];
        let pk_seed = [2u8; 32];
        let expected = pk_gen(&p, &sk_seed, &pk_seed, &fors_adrs());

        for byte in (0..=255u8).step_by(17) {
            let md = [byte, byte.wrapping_mul(3)];
            let sig = sign(&p, &md, &sk_seed, &pk_seed, &fors_adrs());
            let recovered = pk_from_sig(&p, &sig, &md, &pk_seed, &fors_adrs()).unwrap();
            assert_eq!(expected, recovered, "failed for md byte {byte}");
        }
    }

    #[test]
    fn wrong_digest_fails() {
        let p = params();
        let sk_seed = [1u8; 32];
        let pk_seed = [2u8; 32];

        let expected = pk_gen(&p, &sk_seed, &pk_seed, &fors_adrs());
        let sig = sign(&p, &[0x55u8; 2], &sk_seed, &pk_seed, &fors_adrs());
        let recovered = pk_from_sig(&p, &sig, &[0xAAu8; 2], &pk_seed, &fors_adrs()).unwrap();

        assert_ne!(expected, recovered);
    }

    #[test]
    fn corrupted_auth_path_fails() {
        let p = params();
        let sk_seed = [1u8; 32];
        let pk_seed = [2u8; 32];
        let md = [0x12u8; 2];

        let expected = pk_gen(&p, &sk_seed, &pk_seed, &fors_adrs());
        let mut sig = sign(&p, &md, &sk_seed, &pk_seed, &fors_adrs());
        // First auth-path node of the first tree.
        sig[HASH_BYTES] ^= 0x01;
        let recovered = pk_from_sig(&p, &sig, &md, &pk_seed, &fors_adrs()).unwrap();

        assert_ne!(expected, recovered);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let p = params();
        let err = pk_from_sig(&p, &[0u8; 12], &[0u8; 2], &[0u8; 32], &fors_adrs()).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedSignature {
                expected: p.fors_sig_bytes(),
                actual: 12,
            }
        );
    }
}
