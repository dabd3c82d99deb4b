//! Parallel leaf fan-out using Rayon.
//!
//! Leaf computations within one tree are mutually independent pure
//! functions of the seeds and the address, so they fan out across threads
//! and fan back in at the tree fold without any synchronization.

use crate::address::Address;
use crate::fors;
use crate::hash::Node;
use crate::hypertree;
use crate::params::SphincsParams;
use rayon::prelude::*;
use std::vec::Vec;

/// All leaves of one hypertree-layer tree, computed in parallel.
pub(crate) fn xmss_leaves(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    layer: u32,
    tree: u64,
) -> Vec<Node> {
    (0..1u32 << params.h_prime())
        .into_par_iter()
        .map(|i| hypertree::leaf_at(params, sk_seed, pk_seed, layer, tree, i))
        .collect()
}

/// All leaves of one FORS tree, computed in parallel.
pub(crate) fn fors_leaves(
    params: &SphincsParams,
    sk_seed: &[u8],
    pk_seed: &[u8],
    tree_idx: u32,
    adrs: &Address,
) -> Vec<Node> {
    (0..params.t as u32)
        .into_par_iter()
        .map(|i| fors::leaf(params, sk_seed, pk_seed, tree_idx, i, adrs))
        .collect()
}
