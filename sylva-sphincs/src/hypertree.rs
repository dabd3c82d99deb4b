//! The hypertree: `d` layers of Merkle trees of height `h/d`.
//!
//! Layer 0 is the top; its single tree's root is the published public root.
//! Tree leaves are WOTS+ public keys, each bound into its slot by one extra
//! hash. At signing time every layer's WOTS+ key signs the root of the tree
//! below it (the bottom layer signs the caller's message), which chains the
//! whole structure to the public root.

use crate::address::{Address, AddressType};
use crate::hash::{self, Node, HASH_BYTES};
use crate::params::SphincsParams;
use crate::wots;
use alloc::vec::Vec;
use subtle::ConstantTimeEq;

/// Bind a WOTS+ public key into its parent tree's leaf slot.
pub fn leaf_value(wots_pk: &Node, pk_seed: &[u8], adrs: &Address) -> Node {
    hash::f(pk_seed, adrs, wots_pk)
}

/// Leaf `leaf_idx` of the tree at (`layer`, `tree`): the WOTS+ public key
/// for that slot, bound by [`leaf_value`].
pub(crate) fn leaf_at(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    layer: u32,
    tree: u64,
    leaf_idx: u32,
) -> Node {
    let mut wots_adrs = Address::new(AddressType::WotsChain, layer, tree);
    wots_adrs.set_key_pair(leaf_idx);
    let wots_pk = wots::pk_gen(params, sk_seed, pk_seed, &mut wots_adrs);

    let mut leaf_adrs = Address::new(AddressType::TreeNode, layer, tree);
    leaf_adrs.set_index(leaf_idx);
    leaf_value(&wots_pk, pk_seed, &leaf_adrs)
}

/// All `2^(h/d)` leaves of one tree.
fn tree_leaves(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    layer: u32,
    tree: u64,
) -> Vec<Node> {
    #[cfg(feature = "parallel")]
    {
        crate::parallel::xmss_leaves(params, sk_seed, pk_seed, layer, tree)
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..1u32 << params.h_prime())
            .map(|i| leaf_at(params, sk_seed, pk_seed, layer, tree, i))
            .collect()
    }
}

/// Fold a leaf level bottom-up until one root remains.
///
/// Iterative over an indexable buffer (bounded stack for any tree size); an
/// odd leftover node is promoted unchanged. When `track` names a leaf, the
/// sibling of the tracked node is captured at every level before ascending,
/// yielding the authentication path alongside the root.
fn fold_levels(
    mut nodes: Vec<Node>,
    mut track: Option<u32>,
    pk_seed: &[u8],
    layer: u32,
    tree: u64,
) -> (Node, Vec<Node>) {
    debug_assert!(!nodes.is_empty());
    debug_assert!(track.is_none() || nodes.len().is_power_of_two());

    let mut adrs = Address::new(AddressType::TreeNode, layer, tree);
    let mut auth = Vec::new();
    let mut height = 0u32;

    while nodes.len() > 1 {
        if let Some(idx) = track {
            auth.push(nodes[(idx ^ 1) as usize]);
        }

        height += 1;
        adrs.set_height(height);
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
        track = track.map(|idx| idx >> 1);
    }

    (nodes[0], auth)
}

/// Root of a tree given its leaves.
pub fn tree_root(leaves: Vec<Node>, pk_seed: &[u8], layer: u32, tree: u64) -> Node {
    fold_levels(leaves, None, pk_seed, layer, tree).0
}

/// Authentication path for `leaf_idx`: the sibling hash at every level,
/// bottom to top, taken from the actually computed tree.
// Signing captures the path and the root in one fold; the standalone form
// is exercised by unit tests.
#[allow(dead_code)]
pub fn auth_path(
    leaves: Vec<Node>,
    leaf_idx: u32,
    pk_seed: &[u8],
    layer: u32,
    tree: u64,
) -> Vec<Node> {
    fold_levels(leaves, Some(leaf_idx), pk_seed, layer, tree).1
}

/// The published public root: the root of the single top-layer tree.
///
/// Lower layers do not contribute here; their roots are bound to this one at
/// signing time through the WOTS+ keys, which derive from the same seeds.
pub fn root(params: &SphincsParams, sk_seed: &[u8], pk_seed: &[u8]) -> Node {
    let leaves = tree_leaves(params, sk_seed, pk_seed, 0, 0);
    tree_root(leaves, pk_seed, 0, 0)
}

/// Sign a leaf message through all `d` layers into a pre-allocated buffer of
/// `d * (len + h/d) * n` bytes.
///
/// Bottom layer first: each layer contributes a WOTS+ signature over the
/// current message plus the authentication path of the signing leaf, and the
/// layer's tree root becomes the message for the layer above.
pub fn sign_to(
    params: &SphincsParams,
    out: &mut [u8],
    message: &Node,
    sk_seed: &[u8],
    pk_seed: &[u8],
    tree_index: u32,
    leaf_index: u32,
) {
    let xmss_len = params.xmss_sig_bytes();
    debug_assert_eq!(out.len(), params.d * xmss_len);

    let h_prime = params.h_prime();
    let leaf_mask = (1u32 << h_prime) - 1;
    let wots_len = params.wots_sig_bytes();

    let mut cur_tree = tree_index;
    let mut cur_leaf = leaf_index;
    let mut msg = *message;

    for (i, out_layer) in out.chunks_exact_mut(xmss_len).enumerate() {
        let layer = (params.d - 1 - i) as u32;

        let mut wots_adrs = Address::new(AddressType::WotsChain, layer, u64::from(cur_tree));
        wots_adrs.set_key_pair(cur_leaf);
        wots::sign_to(
            params,
            &mut out_layer[..wots_len],
            &msg,
            sk_seed,
            pk_seed,
            &mut wots_adrs,
        );

        let leaves = tree_leaves(params, sk_seed, pk_seed, layer, u64::from(cur_tree));
        let (root, auth) =
            fold_levels(leaves, Some(cur_leaf), pk_seed, layer, u64::from(cur_tree));
        for (z, sibling) in auth.iter().enumerate() {
            out_layer[wots_len + z * HASH_BYTES..wots_len + (z + 1) * HASH_BYTES]
                .copy_from_slice(sibling);
        }

        msg = root;
        cur_leaf = cur_tree & leaf_mask;
        cur_tree >>= h_prime;
    }
}

/// Sign a leaf message through all `d` layers.
// Production paths write into pre-sized signature buffers via `sign_to`;
// the allocating form is exercised by unit tests.
#[allow(dead_code)]
pub fn sign(
    params: &SphincsParams,
    message: &Node,
    sk_seed: &[u8],
    pk_seed: &[u8],
    tree_index: u32,
    leaf_index: u32,
) -> Vec<u8> {
    let mut sig = alloc::vec![0u8; params.d * params.xmss_sig_bytes()];
    sign_to(params, &mut sig, message, sk_seed, pk_seed, tree_index, leaf_index);
    sig
}

/// Verify a layered signature against the expected public root.
///
/// Per layer: recover the WOTS+ public key from the layer's signature and
/// message, bind it to a leaf, climb the authentication path to the layer
/// root, and feed that root upward. Accepts iff the final root matches.
pub fn verify(
    params: &SphincsParams,
    message: &Node,
    sig: &[u8],
    pk_seed: &[u8],
    tree_index: u32,
    leaf_index: u32,
    expected_root: &[u8],
) -> bool {
    let xmss_len = params.xmss_sig_bytes();
    if sig.len() != params.d * xmss_len {
        return false;
    }

    let h_prime = params.h_prime();
    let leaf_mask = (1u32 << h_prime) - 1;
    let wots_len = params.wots_sig_bytes();

    let mut cur_tree = tree_index;
    let mut cur_leaf = leaf_index;
    let mut msg = *message;

    for (i, part) in sig.chunks_exact(xmss_len).enumerate() {
        let layer = (params.d - 1 - i) as u32;
        let wots_sig = &part[..wots_len];
        let auth = &part[wots_len..];

        let mut wots_adrs = Address::new(AddressType::WotsChain, layer, u64::from(cur_tree));
        wots_adrs.set_key_pair(cur_leaf);
        let wots_pk = match wots::pk_from_sig(params, wots_sig, &msg, pk_seed, &mut wots_adrs) {
            Ok(pk) => pk,
            Err(_) => return false,
        };

        let mut node_adrs = Address::new(AddressType::TreeNode, layer, u64::from(cur_tree));
        node_adrs.set_index(cur_leaf);
        let mut node = leaf_value(&wots_pk, pk_seed, &node_adrs);

        let mut idx = cur_leaf;
        for z in 0..h_prime {
            let sibling = &auth[z * HASH_BYTES..(z + 1) * HASH_BYTES];
            node_adrs.set_height((z + 1) as u32);
            node_adrs.set_index(idx >> 1);
            node = if idx & 1 == 0 {
                hash::h_node(pk_seed, &node_adrs, &node, sibling)
            } else {
                hash::h_node(pk_seed, &node_adrs, sibling, &node)
            };
            idx >>= 1;
        }

        msg = node;
        cur_leaf = cur_tree & leaf_mask;
        cur_tree >>= h_prime;
    }

    msg.as_slice().ct_eq(expected_root).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SphincsParams {
        SphincsParams::new(128).unwrap()
    }

    const SK_SEED: [u8; 32] = [1u8; 32];
    const PK_SEED: [u8; 32] = [2u8; 32];

    #[test]
    fn root_is_deterministic() {
        let p = params();
        assert_eq!(root(&p, &SK_SEED, &PK_SEED), root(&p, &SK_SEED, &PK_SEED));
    }

    #[test]
    fn auth_path_has_one_node_per_level() {
        let p = params();
        let leaves = (0..1u32 << p.h_prime())
            .map(|i| leaf_at(&p, &SK_SEED, &PK_SEED, 0, 0, i))
            .collect::<Vec<_>>();
        let path = auth_path(leaves, 5, &PK_SEED, 0, 0);
        assert_eq!(path.len(), p.h_prime());
    }

    #[test]
    fn odd_leftover_is_promoted() {
        // Three leaves: the third has no sibling and must ride up unchanged
        // until it pairs with the root of the first two.
        let leaves = alloc::vec![[1u8; 32], [2u8; 32], [3u8; 32]];
        let lone = leaves[2];

        let mut adrs = Address::new(AddressType::TreeNode, 0, 0);
        adrs.set_height(1);
        adrs.set_index(0);
        let pair_root = hash::h_node(&PK_SEED, &adrs, &leaves[0], &leaves[1]);
        adrs.set_height(2);
        adrs.set_index(0);
        let expected = hash::h_node(&PK_SEED, &adrs, &pair_root, &lone);

        assert_eq!(tree_root(leaves, &PK_SEED, 0, 0), expected);
    }

    #[test]
    fn sign_verify_roundtrip() {
        let p = params();
        let message = [9u8; 32];
        let pk_root = root(&p, &SK_SEED, &PK_SEED);

        let sig = sign(&p, &message, &SK_SEED, &PK_SEED, 3, 5);
        assert_eq!(sig.len(), p.d * p.xmss_sig_bytes());
        assert!(verify(&p, &message, &sig, &PK_SEED, 3, 5, &pk_root));
    }

    #[test]
    fn wrong_message_fails() {
        let p = params();
        let pk_root = root(&p, &SK_SEED, &PK_SEED);
        let sig = sign(&p, &[9u8; 32], &SK_SEED, &PK_SEED, 0, 0);
        assert!(!verify(&p, &[8u8; 32], &sig, &PK_SEED, 0, 0, &pk_root));
    }

    #[test]
    fn wrong_root_fails() {
        let p = params();
        let sig = sign(&p, &[9u8; 32], &SK_SEED, &PK_SEED, 0, 0);
        assert!(!verify(&p, &[9u8; 32], &sig, &PK_SEED, 0, 0, &[0u8; 32]));
    }

    #[test]
    fn wrong_indices_fail() {
        let p = params();
        let pk_root = root(&p, &SK_SEED, &PK_SEED);
        let sig = sign(&p, &[9u8; 32], &SK_SEED, &PK_SEED, 3, 5);
        assert!(!verify(&p, &[9u8; 32], &sig, &PK_SEED, 3, 6, &pk_root));
        assert!(!verify(&p, &[9u8; 32], &sig, &PK_SEED, 2, 5, &pk_root));
    }

    #[test]
    fn corrupted_sibling_fails() {
        let p = params();
        let pk_root = root(&p, &SK_SEED, &PK_SEED);
        let mut sig = sign(&p, &[9u8; 32], &SK_SEED, &PK_SEED, 0, 0);
        // First auth-path node of the bottom layer.
        sig[p.wots_sig_bytes()] ^= 0x01;
        assert!(!verify(&p, &[9u8; 32], &sig, &PK_SEED, 0, 0, &pk_root));
    }

    #[test]
    fn truncated_signature_fails() {
        let p = params();
        let pk_root = root(&p, &SK_SEED, &PK_SEED);
        let sig = sign(&p, &[9u8; 32], &SK_SEED, &PK_SEED, 0, 0);
        assert!(!verify(&p, &[9u8; 32], &sig[..sig.len() - 1], &PK_SEED, 0, 0, &pk_root));
    }
}
