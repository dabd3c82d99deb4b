//! Error types for Sylva cryptographic operations.

use core::fmt;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The requested security level has no parameter set.
    InvalidSecurityLevel(u32),

    /// Key material has the wrong length.
    InvalidKey {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// A signature (or sub-signature) buffer has the wrong length.
    MalformedSignature {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// Signature verification failed.
    VerificationFailed,

    /// The secure randomness source failed; signing and key generation
    /// never fall back to weaker randomness.
    RandomnessUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSecurityLevel(level) => {
                write!(f, "unsupported security level: {level}")
            }
            Error::InvalidKey { expected, actual } => {
                write!(f, "invalid key length: expected {expected}, got {actual}")
            }
            Error::MalformedSignature { expected, actual } => {
                write!(
                    f,
                    "malformed signature: expected {expected} bytes, got {actual}"
                )
            }
            Error::VerificationFailed => write!(f, "signature verification failed"),
            Error::RandomnessUnavailable => write!(f, "secure randomness source unavailable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
