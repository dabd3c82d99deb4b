//! Parameter sets for the signature engine.
//!
//! Each supported security level maps to one validated, immutable constant
//! set. The set is constructed once and passed by reference into every
//! component; there is no process-wide parameter state.

use crate::hash::HASH_BYTES;
use sylva_core::{Error, Result};

/// Validated parameter set for one security level.
///
/// Field meanings:
/// - `n`: hash output length in bytes (the engine's one fixed hash is
///   SHA-256, so `n` is 32 for every level)
/// - `h`: total hypertree height, `d`: number of hypertree layers
/// - `k`: number of FORS trees, `t = 2^a`: leaves per FORS tree
/// - `w`: Winternitz parameter, `lg_w = log2(w)`
/// - `len1`/`len2`/`len`: WOTS+ message/checksum/total chain counts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SphincsParams {
    /// Hash output length in bytes.
    pub n: usize,
    /// Total hypertree height.
    pub h: usize,
    /// Number of hypertree layers.
    pub d: usize,
    /// Number of FORS trees.
    pub k: usize,
    /// Leaves per FORS tree (`2^a`).
    pub t: usize,
    /// Bits encoded per FORS tree.
    pub a: usize,
    /// Winternitz parameter.
    pub w: u32,
    /// Log2 of the Winternitz parameter.
    pub lg_w: usize,
    /// WOTS+ message chain count.
    pub len1: usize,
    /// WOTS+ checksum chain count.
    pub len2: usize,
    /// WOTS+ total chain count.
    pub len: usize,
}

impl SphincsParams {
    /// Build the parameter set for a security level.
    ///
    /// Supported levels are 128, 192 and 256; anything else fails with
    /// [`Error::InvalidSecurityLevel`].
    pub fn new(security_level: u32) -> Result<Self> {
        let (h, d, k, t, w) = match security_level {
            128 => (12, 2, 4, 16, 4),
            192 => (24, 4, 24, 256, 16),
            256 => (30, 5, 30, 256, 16),
            other => return Err(Error::InvalidSecurityLevel(other)),
        };
        Ok(Self::derive(HASH_BYTES, h, d, k, t, w))
    }

    fn derive(n: usize, h: usize, d: usize, k: usize, t: usize, w: u32) -> Self {
        let lg_w = w.trailing_zeros() as usize;
        let a = t.trailing_zeros() as usize;

        let len1 = (8 * n).div_ceil(lg_w);
        // len2 = floor(log_w(len1 * (w - 1))) + 1
        let mut len2 = 1;
        let mut x = len1 * (w as usize - 1);
        while x >= w as usize {
            x /= w as usize;
            len2 += 1;
        }

        let params = Self {
            n,
            h,
            d,
            k,
            t,
            a,
            w,
            lg_w,
            len1,
            len2,
            len: len1 + len2,
        };

        debug_assert!(params.w.is_power_of_two());
        debug_assert_eq!(params.t, 1 << params.a);
        debug_assert_eq!(params.h % params.d, 0, "layer height must be even");
        debug_assert!(
            params.k * params.a <= 8 * params.n,
            "digest must supply enough bits for all FORS trees"
        );
        // The tree index travels in a 4-byte signature field.
        debug_assert!(params.tree_bits() <= 32);

        params
    }

    /// Height of a single tree within one hypertree layer.
    pub fn h_prime(&self) -> usize {
        self.h / self.d
    }

    /// Bits needed to address a tree at the bottom layer.
    pub fn tree_bits(&self) -> usize {
        self.h - self.h_prime()
    }

    /// Bits needed to address a leaf within one tree.
    pub fn leaf_bits(&self) -> usize {
        self.h_prime()
    }

    /// Public key size: `pk_seed || root`.
    pub fn pk_bytes(&self) -> usize {
        2 * self.n
    }

    /// Private key size: `sk_seed || pk_seed || root`.
    pub fn sk_bytes(&self) -> usize {
        3 * self.n
    }

    /// FORS message-digest size: `ceil(k*a / 8)` bytes.
    pub fn fors_md_bytes(&self) -> usize {
        (self.k * self.a).div_ceil(8)
    }

    /// WOTS+ signature size.
    pub fn wots_sig_bytes(&self) -> usize {
        self.len * self.n
    }

    /// FORS signature size: per tree, one secret leaf plus its
    /// authentication path.
    pub fn fors_sig_bytes(&self) -> usize {
        self.k * (1 + self.a) * self.n
    }

    /// Per-layer signature size: WOTS+ signature plus authentication path.
    pub fn xmss_sig_bytes(&self) -> usize {
        self.wots_sig_bytes() + self.h_prime() * self.n
    }

    /// Full signature size:
    /// `randomizer || tree_index(4) || leaf_index(4) || fors || d layers`.
    pub fn sig_bytes(&self) -> usize {
        self.n + 8 + self.fors_sig_bytes() + self.d * self.xmss_sig_bytes()
    }
}
