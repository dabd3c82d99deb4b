#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use sylva_sphincs::Sphincs;

/// A deterministic RNG seeded from fuzzer input.
struct FuzzRng {
    seed: [u8; 32],
    counter: u64,
}

impl FuzzRng {
    fn new(seed: &[u8]) -> Self {
        let mut s = [0u8; 32];
        let len = seed.len().min(32);
        s[..len].copy_from_slice(&seed[..len]);
        Self { seed: s, counter: 0 }
    }

    fn next_bytes(&mut self, dest: &mut [u8]) {
        use sha2::{Digest, Sha256};

        for chunk in dest.chunks_mut(32) {
            let mut hasher = Sha256::new();
            hasher.update(self.seed);
            hasher.update(self.counter.to_le_bytes());
            self.counter += 1;
            let block = hasher.finalize();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}

impl rand_core::RngCore for FuzzRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.next_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.next_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.next_bytes(dest);
    }
}

impl rand_core::CryptoRng for FuzzRng {}

#[derive(Debug, Arbitrary)]
struct SignInput {
    key_seed: Vec<u8>,
    message: Vec<u8>,
    bad_key: Vec<u8>,
}

fuzz_target!(|input: SignInput| {
    if input.key_seed.is_empty() {
        return;
    }

    let engine = Sphincs::new(128).unwrap();
    let mut rng = FuzzRng::new(&input.key_seed);
    let (_pk_bytes, sk_bytes) = engine.keygen_bytes(&mut rng).unwrap();

    // Signing with a well-formed key always produces a full-size signature
    let sig = engine
        .sign_bytes(&sk_bytes, &input.message, &mut rng)
        .unwrap();
    assert_eq!(sig.len(), engine.params().sig_bytes());

    // Signing with arbitrary key bytes either succeeds (right length) or
    // reports InvalidKey; it never panics
    let result = engine.sign_bytes(&input.bad_key, &input.message, &mut rng);
    if input.bad_key.len() != engine.params().sk_bytes() {
        assert!(result.is_err());
    }
});
