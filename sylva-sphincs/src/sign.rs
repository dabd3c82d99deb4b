//! Key generation, signing and verification.
//!
//! The engine composes the building blocks: a fresh randomizer and the
//! message produce a digest; the digest selects a hypertree leaf and the
//! FORS leaf set; FORS signs the digest and the hypertree binds the
//! recovered FORS public key to the key pair's public root.

use crate::address::{Address, AddressType};
use crate::fors;
use crate::hash::{self, HASH_BYTES};
use crate::hypertree;
use crate::params::SphincsParams;
use alloc::vec::Vec;
use rand_core::{TryCryptoRng, TryRngCore};
use sylva_core::{Error, Result, Signer, ZeroizeOnDrop};
use zeroize::{Zeroize, Zeroizing};

/// Private key: `sk_seed || pk_seed || root`, zeroized on drop.
#[derive(Clone, Zeroize)]
pub struct SecretKey {
    /// Secret seed all one-time and few-time keys derive from.
    pub sk_seed: [u8; HASH_BYTES],
    /// Public seed keying every public hash computation.
    pub pk_seed: [u8; HASH_BYTES],
    /// The hypertree root, duplicated from the public key.
    pub root: [u8; HASH_BYTES],
}

impl SecretKey {
    /// Serialize as `sk_seed || pk_seed || root` (3n bytes).
    ///
    /// The returned buffer holds secret material and zeroizes on drop.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(Vec::with_capacity(3 * HASH_BYTES));
        bytes.extend_from_slice(&self.sk_seed);
        bytes.extend_from_slice(&self.pk_seed);
        bytes.extend_from_slice(&self.root);
        bytes
    }

    /// Deserialize from `sk_seed || pk_seed || root`.
    ///
    /// Copies straight into the struct fields so no intermediate buffer
    /// holds the seed.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 3 * HASH_BYTES {
            return None;
        }
        let mut key = Self {
            sk_seed: [0u8; HASH_BYTES],
            pk_seed: [0u8; HASH_BYTES],
            root: [0u8; HASH_BYTES],
        };
        key.sk_seed.copy_from_slice(&bytes[..HASH_BYTES]);
        key.pk_seed.copy_from_slice(&bytes[HASH_BYTES..2 * HASH_BYTES]);
        key.root.copy_from_slice(&bytes[2 * HASH_BYTES..]);
        Some(key)
    }

    /// The corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            pk_seed: self.pk_seed,
            root: self.root,
        }
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

/// Public key: `pk_seed || root`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// Public seed keying every public hash computation.
    pub pk_seed: [u8; HASH_BYTES],
    /// The hypertree root.
    pub root: [u8; HASH_BYTES],
}

impl PublicKey {
    /// Serialize as `pk_seed || root` (2n bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 * HASH_BYTES);
        bytes.extend_from_slice(&self.pk_seed);
        bytes.extend_from_slice(&self.root);
        bytes
    }

    /// Deserialize from `pk_seed || root`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 2 * HASH_BYTES {
            return None;
        }
        let mut pk_seed = [0u8; HASH_BYTES];
        let mut root = [0u8; HASH_BYTES];
        pk_seed.copy_from_slice(&bytes[..HASH_BYTES]);
        root.copy_from_slice(&bytes[HASH_BYTES..]);
        Some(Self { pk_seed, root })
    }
}

/// The signature engine for one security level.
///
/// Holds nothing but the immutable parameter set; all operations are pure
/// functions of their inputs plus the caller's randomness source, so one
/// engine value can serve any number of concurrent callers.
#[derive(Clone, Copy, Debug)]
pub struct Sphincs {
    params: SphincsParams,
}

impl Sphincs {
    /// Create an engine for a security level (128, 192 or 256).
    pub fn new(security_level: u32) -> Result<Self> {
        Ok(Self {
            params: SphincsParams::new(security_level)?,
        })
    }

    /// The engine's parameter set.
    pub fn params(&self) -> &SphincsParams {
        &self.params
    }

    /// Generate a key pair.
    ///
    /// Both seeds come from `rng`; a randomness failure is returned as
    /// [`Error::RandomnessUnavailable`] and never papered over.
    pub fn keygen<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(SecretKey, PublicKey)> {
        let mut sk_seed = [0u8; HASH_BYTES];
        let mut pk_seed = [0u8; HASH_BYTES];
        rng.try_fill_bytes(&mut sk_seed)
            .map_err(|_| Error::RandomnessUnavailable)?;
        rng.try_fill_bytes(&mut pk_seed)
            .map_err(|_| Error::RandomnessUnavailable)?;

        Ok(self.keygen_from_seeds(&sk_seed, &pk_seed))
    }

    /// Deterministic key generation from caller-provided seeds.
    ///
    /// Used by regression tests; production callers want [`keygen`](Self::keygen).
    pub fn keygen_from_seeds(
        &self,
        sk_seed: &[u8; HASH_BYTES],
        pk_seed: &[u8; HASH_BYTES],
    ) -> (SecretKey, PublicKey) {
        let root = hypertree::root(&self.params, sk_seed, pk_seed);

        let sk = SecretKey {
            sk_seed: *sk_seed,
            pk_seed: *pk_seed,
            root,
        };
        let pk = sk.public_key();
        (sk, pk)
    }

    /// Sign a message.
    ///
    /// Draws a fresh n-byte randomizer from `rng` on every call; two
    /// signatures over the same message differ yet both verify.
    pub fn sign<R: TryCryptoRng + ?Sized>(
        &self,
        sk: &SecretKey,
        message: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let p = &self.params;

        let mut randomizer = [0u8; HASH_BYTES];
        rng.try_fill_bytes(&mut randomizer)
            .map_err(|_| Error::RandomnessUnavailable)?;

        let digest = hash::h_msg(&randomizer, &sk.root, message);
        let (tree_index, leaf_index) = derive_indices(p, &digest);
        let md = &digest[..p.fors_md_bytes()];

        let mut fors_adrs =
            Address::new(AddressType::ForsTree, (p.d - 1) as u32, u64::from(tree_index));
        fors_adrs.set_key_pair(leaf_index);

        let mut sig = alloc::vec![0u8; p.sig_bytes()];
        let fors_start = HASH_BYTES + 8;
        let fors_end = fors_start + p.fors_sig_bytes();

        sig[..HASH_BYTES].copy_from_slice(&randomizer);
        sig[HASH_BYTES..HASH_BYTES + 4].copy_from_slice(&tree_index.to_be_bytes());
        sig[HASH_BYTES + 4..fors_start].copy_from_slice(&leaf_index.to_be_bytes());

        fors::sign_to(
            p,
            &mut sig[fors_start..fors_end],
            md,
            &sk.sk_seed,
            &sk.pk_seed,
            &fors_adrs,
        );

        // The recovered FORS public key is the leaf message the hypertree
        // binds to the public root.
        let fors_pk = fors::pk_from_sig(p, &sig[fors_start..fors_end], md, &sk.pk_seed, &fors_adrs)?;

        hypertree::sign_to(
            p,
            &mut sig[fors_end..],
            &fors_pk,
            &sk.sk_seed,
            &sk.pk_seed,
            tree_index,
            leaf_index,
        );

        Ok(sig)
    }

    /// Verify a signature. Fails closed: malformed input of any kind
    /// returns `false`, never an error or a panic.
    pub fn verify(&self, pk: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let p = &self.params;
        if signature.len() != p.sig_bytes() {
            return false;
        }

        let randomizer = &signature[..HASH_BYTES];
        let tree_index = u32::from_be_bytes([
            signature[HASH_BYTES],
            signature[HASH_BYTES + 1],
            signature[HASH_BYTES + 2],
            signature[HASH_BYTES + 3],
        ]);
        let leaf_index = u32::from_be_bytes([
            signature[HASH_BYTES + 4],
            signature[HASH_BYTES + 5],
            signature[HASH_BYTES + 6],
            signature[HASH_BYTES + 7],
        ]);

        let digest = hash::h_msg(randomizer, &pk.root, message);
        let (expected_tree, expected_leaf) = derive_indices(p, &digest);
        if tree_index != expected_tree || leaf_index != expected_leaf {
            return false;
        }

        let md = &digest[..p.fors_md_bytes()];
        let mut fors_adrs =
            Address::new(AddressType::ForsTree, (p.d - 1) as u32, u64::from(tree_index));
        fors_adrs.set_key_pair(leaf_index);

        let fors_start = HASH_BYTES + 8;
        let fors_end = fors_start + p.fors_sig_bytes();
        let fors_pk = match fors::pk_from_sig(
            p,
            &signature[fors_start..fors_end],
            md,
            &pk.pk_seed,
            &fors_adrs,
        ) {
            Ok(pk_fors) => pk_fors,
            Err(_) => return false,
        };

        hypertree::verify(
            p,
            &fors_pk,
            &signature[fors_end..],
            &pk.pk_seed,
            tree_index,
            leaf_index,
            &pk.root,
        )
    }

    /// Key generation over opaque byte buffers:
    /// `(public_key, private_key)` as `pk_seed || root` and
    /// `sk_seed || pk_seed || root`.
    pub fn keygen_bytes<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
        let (sk, pk) = self.keygen(rng)?;
        Ok((pk.to_bytes(), sk.to_bytes()))
    }

    /// Sign with a serialized private key.
    ///
    /// A wrong-length key fails with [`Error::InvalidKey`] before any
    /// hashing happens.
    pub fn sign_bytes<R: TryCryptoRng + ?Sized>(
        &self,
        private_key: &[u8],
        message: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let sk = SecretKey::from_bytes(private_key).ok_or(Error::InvalidKey {
            expected: self.params.sk_bytes(),
            actual: private_key.len(),
        })?;
        self.sign(&sk, message, rng)
    }

    /// Verify with a serialized public key. Any length mismatch is a
    /// verification failure, not an error.
    pub fn verify_bytes(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        match PublicKey::from_bytes(public_key) {
            Some(pk) => self.verify(&pk, message, signature),
            None => false,
        }
    }
}

impl Signer for Sphincs {
    type SigningKey = SecretKey;
    type VerificationKey = PublicKey;

    fn signing_key_len(&self) -> usize {
        self.params.sk_bytes()
    }

    fn verification_key_len(&self) -> usize {
        self.params.pk_bytes()
    }

    fn signature_len(&self) -> usize {
        self.params.sig_bytes()
    }

    fn keygen<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(SecretKey, PublicKey)> {
        Sphincs::keygen(self, rng)
    }

    fn sign<R: TryCryptoRng + ?Sized>(
        &self,
        sk: &SecretKey,
        message: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        Sphincs::sign(self, sk, message, rng)
    }

    fn verify(&self, pk: &PublicKey, message: &[u8], signature: &[u8]) -> Result<()> {
        if Sphincs::verify(self, pk, message, signature) {
            Ok(())
        } else {
            Err(Error::VerificationFailed)
        }
    }
}

/// Tree and leaf index from the digest's trailing 8 bytes, reduced modulo
/// the bottom-layer tree count and the per-tree leaf count.
fn derive_indices(params: &SphincsParams, digest: &[u8; HASH_BYTES]) -> (u32, u32) {
    let tail = &digest[HASH_BYTES - 8..];
    let x = u64::from_be_bytes([
        tail[0], tail[1], tail[2], tail[3], tail[4], tail[5], tail[6], tail[7],
    ]);

    let tree_bits = params.tree_bits();
    let leaf_bits = params.leaf_bits();
    let tree_index = (x & ((1u64 << tree_bits) - 1)) as u32;
    let leaf_index = ((x >> tree_bits) & ((1u64 << leaf_bits) - 1)) as u32;

    (tree_index, leaf_index)
}
