//! Property-based tests for the signature engine.
//!
//! These exercise the fundamental properties over random inputs:
//! - roundtrip: a fresh signature over any message verifies
//! - wrong key: verification under another key pair fails
//! - tampered message: verification of a modified message fails
//!
//! Hash-based signing is slow compared to lattice schemes, so the case
//! counts are deliberately small.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sylva_sphincs::Sphincs;

/// Arbitrary messages (0-128 bytes).
fn arb_message() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..128)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn roundtrip_verifies(seed in any::<u64>(), message in arb_message()) {
        let engine = Sphincs::new(128).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (sk, pk) = engine.keygen(&mut rng).unwrap();

        let sig = engine.sign(&sk, &message, &mut rng).unwrap();
        prop_assert_eq!(sig.len(), engine.params().sig_bytes());
        prop_assert!(engine.verify(&pk, &message, &sig));
    }

    #[test]
    fn wrong_key_fails(seed1 in any::<u64>(), seed2 in any::<u64>(), message in arb_message()) {
        prop_assume!(seed1 != seed2);

        let engine = Sphincs::new(128).unwrap();
        let mut rng1 = ChaCha20Rng::seed_from_u64(seed1);
        let mut rng2 = ChaCha20Rng::seed_from_u64(seed2);

        let (sk1, _pk1) = engine.keygen(&mut rng1).unwrap();
        let (_sk2, pk2) = engine.keygen(&mut rng2).unwrap();

        let sig = engine.sign(&sk1, &message, &mut rng1).unwrap();
        prop_assert!(!engine.verify(&pk2, &message, &sig));
    }

    #[test]
    fn tampered_message_fails(seed in any::<u64>(), message in arb_message(), flip_pos in 0usize..128) {
        prop_assume!(!message.is_empty());

        let engine = Sphincs::new(128).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (sk, pk) = engine.keygen(&mut rng).unwrap();

        let sig = engine.sign(&sk, &message, &mut rng).unwrap();

        let mut tampered = message.clone();
        let pos = flip_pos % tampered.len();
        tampered[pos] ^= 0xFF;

        prop_assert!(!engine.verify(&pk, &tampered, &sig));
    }
}
