//! Stateless hash-based digital signatures.
//!
//! This crate implements a SPHINCS+-style signature scheme whose security
//! rests solely on SHA-256: a FORS few-time signature signs the message
//! digest, and a multi-layer hypertree of WOTS+ one-time keys binds the
//! recovered FORS public key to a single public root. No signing state is
//! kept between calls.
//!
//! # Supported security levels
//!
//! | Level | Public key | Private key | Signature    |
//! |-------|------------|-------------|--------------|
//! | 128   | 64 bytes   | 96 bytes    | 9,576 bytes  |
//! | 192   | 64 bytes   | 96 bytes    | 16,296 bytes |
//! | 256   | 64 bytes   | 96 bytes    | 20,360 bytes |
//!
//! # Example
//!
//! ```rust
//! use sylva_sphincs::Sphincs;
//!
//! # fn main() -> sylva_sphincs::Result<()> {
//! let engine = Sphincs::new(128)?;
//! let mut rng = rand::rng();
//!
//! let (sk, pk) = engine.keygen(&mut rng)?;
//! let signature = engine.sign(&sk, b"attested payload", &mut rng)?;
//! assert!(engine.verify(&pk, b"attested payload", &signature));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
// Clippy allowances for cryptographic code patterns
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::needless_range_loop
)]

// alloc is available in both std and no_std environments
extern crate alloc;

// Core modules
mod address;
/// The engine's hash interface over SHA-256.
pub mod hash;
/// Parameter sets per security level.
pub mod params;
mod utils;

// Building blocks
mod fors;
mod hypertree;
mod wots;

// Parallel leaf fan-out (requires rayon)
#[cfg(feature = "parallel")]
mod parallel;

// Engine
/// Key generation, signing and verification.
pub mod sign;

// Public exports
pub use address::{Address, AddressType};
pub use params::SphincsParams;
pub use sign::{PublicKey, SecretKey, Sphincs};

// Re-export core types
pub use sylva_core::{Error, Result, Signer};
