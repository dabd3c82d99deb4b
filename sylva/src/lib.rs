//! # Sylva
//!
//! A stateless hash-based signature library for attesting arbitrary byte
//! payloads, built solely on SHA-256 for post-quantum security.
//!
//! ## Features
//!
//! - `std` (default): standard library support
//! - `parallel`: rayon-based fan-out over independent leaf computations
//!
//! ## Example
//!
//! ```ignore
//! use sylva::{Signer, Sphincs};
//!
//! let engine = Sphincs::new(128)?;
//! let (sk, pk) = engine.keygen(&mut rng)?;
//! let sig = engine.sign(&sk, payload, &mut rng)?;
//! assert!(engine.verify(&pk, payload, &sig));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub use sylva_core::{Error, Result, Signer};

pub use sylva_sphincs::{PublicKey, SecretKey, Sphincs, SphincsParams};

/// The signature engine crate, re-exported whole for access to the
/// lower-level building blocks.
pub use sylva_sphincs as sphincs;
