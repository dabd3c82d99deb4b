//! Cryptographic primitive traits.

use crate::Result;
use alloc::vec::Vec;
use rand_core::TryCryptoRng;

use zeroize::Zeroize;

/// Digital signature trait for schemes whose parameters are chosen at
/// runtime.
///
/// Unlike schemes with a single fixed parameter set, a hash-based signature
/// engine is constructed for a specific security level and carries its
/// parameter set as a value. Key and signature lengths are therefore
/// instance methods rather than associated constants.
///
/// # Example
///
/// ```ignore
/// use sylva_core::Signer;
///
/// let engine = MySigner::new(128)?;
/// let (sk, pk) = engine.keygen(&mut rng)?;
/// let sig = engine.sign(&sk, message, &mut rng)?;
/// engine.verify(&pk, message, &sig)?;
/// ```
pub trait Signer {
    /// Signing key (private key). Must support secure erasure.
    type SigningKey: Zeroize;

    /// Verification key (public key).
    type VerificationKey: Clone;

    /// Size of the signing key in bytes.
    fn signing_key_len(&self) -> usize;

    /// Size of the verification key in bytes.
    fn verification_key_len(&self) -> usize;

    /// Size of a signature in bytes.
    fn signature_len(&self) -> usize;

    /// Generate a new key pair.
    ///
    /// A failure of the randomness source is propagated; implementations
    /// must never substitute weaker randomness.
    fn keygen<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::SigningKey, Self::VerificationKey)>;

    /// Sign a message.
    ///
    /// The generator supplies the per-signature randomizer; signing draws
    /// fresh randomness on every call.
    fn sign<R: TryCryptoRng + ?Sized>(
        &self,
        sk: &Self::SigningKey,
        message: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>>;

    /// Verify a signature.
    ///
    /// Returns `Ok(())` if the signature is valid and
    /// `Err(Error::VerificationFailed)` otherwise. Malformed input is a
    /// verification failure, never a panic.
    fn verify(
        &self,
        pk: &Self::VerificationKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<()>;
}
