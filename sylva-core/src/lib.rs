//! # Sylva Core
//!
//! Core traits and utilities for the Sylva hash-based signature library.
//!
//! This crate provides:
//! - Common error types
//! - The [`Signer`] trait implemented by the signature engine
//! - Secure memory handling via zeroize re-exports

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

extern crate alloc;

mod error;
mod traits;

pub use error::{Error, Result};
pub use traits::Signer;

/// Re-export zeroize for convenience.
pub use zeroize::{Zeroize, ZeroizeOnDrop};

/// Re-export subtle for constant-time operations.
pub use subtle;
