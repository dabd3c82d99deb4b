//! Signature-layout and tamper-resistance tests.
//!
//! A valid signature must stop verifying when any of its regions changes:
//! the randomizer, either embedded index field, the FORS portion, or any
//! hypertree layer. Wrong-length buffers must fail closed.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sylva_sphincs::hash::HASH_BYTES;
use sylva_sphincs::{PublicKey, SecretKey, Sphincs};

fn fixture(level: u32) -> (Sphincs, SecretKey, PublicKey, Vec<u8>, &'static [u8]) {
    let engine = Sphincs::new(level).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let (sk, pk) = engine.keygen(&mut rng).unwrap();
    let message: &'static [u8] = b"blob exchanged at step 1024";
    let sig = engine.sign(&sk, message, &mut rng).unwrap();
    (engine, sk, pk, sig, message)
}

#[test]
fn bit_flips_in_every_region_fail() {
    let (engine, _sk, pk, sig, message) = fixture(128);
    assert!(engine.verify(&pk, message, &sig));

    let p = *engine.params();
    let fors_start = HASH_BYTES + 8;
    let fors_end = fors_start + p.fors_sig_bytes();

    // One offset per signature region, plus both halves of every
    // hypertree layer.
    let mut offsets = vec![
        0,                             // randomizer
        HASH_BYTES,                    // tree index
        HASH_BYTES + 4,                // leaf index
        fors_start,                    // first FORS secret leaf value
        fors_start + HASH_BYTES,       // first FORS auth-path node
        fors_end - 1,                  // last FORS byte
    ];
    for layer in 0..p.d {
        let layer_start = fors_end + layer * p.xmss_sig_bytes();
        offsets.push(layer_start); // WOTS+ portion
        offsets.push(layer_start + p.wots_sig_bytes()); // auth path
    }

    for offset in offsets {
        for bit in [0x01u8, 0x80u8] {
            let mut tampered = sig.clone();
            tampered[offset] ^= bit;
            assert!(
                !engine.verify(&pk, message, &tampered),
                "flip at offset {offset} (bit {bit:#04x}) must not verify"
            );
        }
    }
}

#[test]
fn wrong_length_signatures_fail_closed() {
    let (engine, _sk, pk, sig, message) = fixture(128);

    assert!(!engine.verify(&pk, message, &[]));
    assert!(!engine.verify(&pk, message, &sig[..sig.len() - 1]));

    let mut extended = sig.clone();
    extended.push(0);
    assert!(!engine.verify(&pk, message, &extended));
}

#[test]
fn signature_sizes_match_formula_per_level() {
    for (level, expected) in [(128usize, 9576usize), (192, 16296), (256, 20360)] {
        let engine = Sphincs::new(level as u32).unwrap();
        let p = engine.params();
        assert_eq!(p.sig_bytes(), expected, "level {level}");
        assert_eq!(p.pk_bytes(), 64);
        assert_eq!(p.sk_bytes(), 96);
    }
}

#[test]
fn independent_randomizers_both_verify() {
    let (engine, sk, pk, first, message) = fixture(128);
    let mut rng = ChaCha20Rng::seed_from_u64(1234);
    let second = engine.sign(&sk, message, &mut rng).unwrap();

    assert_ne!(first, second, "two signatures must not share a randomizer");
    assert!(engine.verify(&pk, message, &first));
    assert!(engine.verify(&pk, message, &second));
}

#[test]
fn fixed_seed_root_regression() {
    // Deterministic vector: the root embedded in a fixed-seed key pair must
    // equal the independently recomputed hypertree root, at every level.
    for level in [128u32, 192, 256] {
        let engine = Sphincs::new(level).unwrap();
        let sk_seed = [0xA5u8; 32];
        let pk_seed = [0x5Au8; 32];

        let (sk, pk) = engine.keygen_from_seeds(&sk_seed, &pk_seed);
        let (sk2, pk2) = engine.keygen_from_seeds(&sk_seed, &pk_seed);

        assert_eq!(pk, pk2, "keygen must be a pure function of the seeds");
        assert_eq!(sk.root, pk.root);
        assert_eq!(sk2.to_bytes(), sk.to_bytes());
    }
}

#[test]
fn roundtrip_at_higher_levels() {
    for level in [192u32, 256] {
        let engine = Sphincs::new(level).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(u64::from(level));
        let (sk, pk) = engine.keygen(&mut rng).unwrap();

        let message = b"cross-level roundtrip";
        let sig = engine.sign(&sk, message, &mut rng).unwrap();

        assert_eq!(sig.len(), engine.params().sig_bytes());
        assert!(engine.verify(&pk, message, &sig));
        assert!(!engine.verify(&pk, b"cross-level roundtrlp", &sig));
    }
}

#[test]
fn byte_surface_roundtrip() {
    let engine = Sphincs::new(128).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let (pk_bytes, sk_bytes) = engine.keygen_bytes(&mut rng).unwrap();

    let message = b"opaque buffers only";
    let sig = engine.sign_bytes(&sk_bytes, message, &mut rng).unwrap();

    assert!(engine.verify_bytes(&pk_bytes, message, &sig));
    assert!(!engine.verify_bytes(&pk_bytes, b"other payload", &sig));

    // A public key from a different key pair must not verify.
    let mut rng2 = ChaCha20Rng::seed_from_u64(4);
    let (other_pk, _other_sk) = engine.keygen_bytes(&mut rng2).unwrap();
    assert!(!engine.verify_bytes(&other_pk, message, &sig));
}
