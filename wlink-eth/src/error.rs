//! Error types for Ethereum wallet operations.
//!
//! This module defines all errors that can occur during Ethereum
//! key derivation, address parsing and transaction signing.

#[cfg(feature = "alloc")]
use alloc::string::String;

use core::fmt;

/// Errors that can occur during Ethereum wallet operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid private key format or value.
    InvalidPrivateKey,
    /// Invalid hex string format.
    InvalidHex,
    /// Seed length outside the accepted range.
    InvalidSeedLength(usize),
    /// Address is malformed or fails its EIP-55 checksum.
    InvalidAddress,
    /// ECDSA signing failed.
    Signature,
    /// Key derivation error with details.
    #[cfg(feature = "alloc")]
    Derivation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrivateKey => write!(f, "invalid private key"),
            Self::InvalidHex => write!(f, "invalid hex string"),
            Self::InvalidSeedLength(n) => write!(f, "invalid seed length: {n}"),
            Self::InvalidAddress => write!(f, "invalid ethereum address"),
            Self::Signature => write!(f, "signing failed"),
            #[cfg(feature = "alloc")]
            Self::Derivation(msg) => write!(f, "key derivation error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
