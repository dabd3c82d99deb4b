//! Hash addresses for domain separation.
//!
//! Every hash invocation in the engine is keyed by an [`Address`]: a
//! structured record of where in the key structure the call happens. Two
//! hash calls in different contexts always see different address bytes, so
//! identical inputs can never collide across unrelated uses.

use zeroize::Zeroize;

/// Serialized address size in bytes.
pub const ADDR_BYTES: usize = 28;

/// Address type tags, one per hash context.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressType {
    /// WOTS+ chain step.
    WotsChain = 0,
    /// WOTS+ public key compression (L-tree).
    WotsPk = 1,
    /// Merkle tree node within a hypertree layer.
    TreeNode = 2,
    /// FORS tree leaf or node.
    ForsTree = 3,
    /// FORS public key compression.
    ForsPk = 4,
    /// WOTS+ secret element derivation.
    WotsPrf = 5,
    /// FORS secret leaf derivation.
    ForsPrf = 6,
}

/// Structured hash address.
///
/// Fields:
/// - `layer`: hypertree layer (0 = top, `d-1` = bottom)
/// - `tree`: tree index within the layer
/// - `key_pair`: leaf / WOTS+ key pair index within the tree
/// - `chain_or_height`: chain index (WOTS+ types) or node height (tree types)
/// - `index`: chain step (WOTS+ chains) or node index (tree types)
///
/// Serialization is big-endian fixed-width:
/// `type(4) || layer(4) || tree(8) || key_pair(4) || chain_or_height(4) || index(4)`.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Address {
    type_tag: u32,
    layer: u32,
    tree: u64,
    key_pair: u32,
    chain_or_height: u32,
    index: u32,
}

impl Address {
    /// Create an address of the given type with all position fields zero.
    #[must_use]
    pub const fn new(type_tag: AddressType, layer: u32, tree: u64) -> Self {
        Self {
            type_tag: type_tag as u32,
            layer,
            tree,
            key_pair: 0,
            chain_or_height: 0,
            index: 0,
        }
    }

    /// Copy the address with a different type.
    ///
    /// Layer, tree and key pair carry over; the per-type position fields
    /// (`chain_or_height`, `index`) are cleared.
    #[must_use]
    pub const fn with_type(&self, type_tag: AddressType) -> Self {
        Self {
            type_tag: type_tag as u32,
            layer: self.layer,
            tree: self.tree,
            key_pair: self.key_pair,
            chain_or_height: 0,
            index: 0,
        }
    }

    /// Set the key pair index.
    pub fn set_key_pair(&mut self, key_pair: u32) {
        self.key_pair = key_pair;
    }

    /// Set the chain index (WOTS+ types).
    pub fn set_chain(&mut self, chain: u32) {
        self.chain_or_height = chain;
    }

    /// Set the chain step (WOTS+ chain walks).
    pub fn set_step(&mut self, step: u32) {
        self.index = step;
    }

    /// Set the node height (tree types).
    pub fn set_height(&mut self, height: u32) {
        self.chain_or_height = height;
    }

    /// Set the node index (tree types).
    pub fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// Key pair index.
    #[must_use]
    pub fn key_pair(&self) -> u32 {
        self.key_pair
    }

    /// Big-endian fixed-width serialization fed into every hash call.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ADDR_BYTES] {
        let mut out = [0u8; ADDR_BYTES];
        out[0..4].copy_from_slice(&self.type_tag.to_be_bytes());
        out[4..8].copy_from_slice(&self.layer.to_be_bytes());
        out[8..16].copy_from_slice(&self.tree.to_be_bytes());
        out[16..20].copy_from_slice(&self.key_pair.to_be_bytes());
        out[20..24].copy_from_slice(&self.chain_or_height.to_be_bytes());
        out[24..28].copy_from_slice(&self.index.to_be_bytes());
        out
    }
}
