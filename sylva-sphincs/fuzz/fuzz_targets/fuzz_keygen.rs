#![no_main]

use libfuzzer_sys::fuzz_target;

use sylva_sphincs::{PublicKey, SecretKey, Sphincs};

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

fuzz_target!(|seed: &[u8]| {
    if seed.is_empty() {
        return;
    }

    let engine = Sphincs::new(128).unwrap();
    let mut rng = FuzzRng::new(seed);
    let (sk, pk) = engine.keygen(&mut rng).unwrap();

    // Serialization roundtrips exactly
    let sk_bytes = sk.to_bytes();
    let pk_bytes = pk.to_bytes();
    assert_eq!(sk_bytes.len(), engine.params().sk_bytes());
    assert_eq!(pk_bytes.len(), engine.params().pk_bytes());

    let sk2 = SecretKey::from_bytes(&sk_bytes).unwrap();
    let pk2 = PublicKey::from_bytes(&pk_bytes).unwrap();
    assert_eq!(sk2.public_key(), pk);
    assert_eq!(pk2, pk);

    // The public root is embedded in both halves of the key pair
    assert_eq!(sk.root, pk.root);
});
