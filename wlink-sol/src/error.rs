//! Error types for Solana wallet operations.

use core::fmt;

/// Errors that can occur during Solana wallet operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Seed length outside the accepted range.
    InvalidSeedLength(usize),
    /// Invalid hex string format.
    InvalidHex,
    /// Secret key is neither 32 nor 64 bytes.
    InvalidKeyLength(usize),
    /// Public half of a 64-byte keypair does not match its secret half.
    KeypairMismatch,
    /// Address is not base58 or does not decode to 32 bytes.
    InvalidAddress,
    /// Ed25519 signature error.
    Signature,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSeedLength(n) => write!(f, "invalid seed length: {n}"),
            Self::InvalidHex => write!(f, "invalid hex string"),
            Self::InvalidKeyLength(n) => {
                write!(f, "invalid secret key length: expected 32 or 64 bytes, got {n}")
            }
            Self::KeypairMismatch => write!(f, "public key does not match secret key"),
            Self::InvalidAddress => write!(f, "invalid solana address"),
            Self::Signature => write!(f, "signature error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
