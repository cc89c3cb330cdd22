//! Error types for core wallet operations.

use core::fmt;

/// Errors that can occur during mnemonic and seed operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid mnemonic phrase (unknown word or bad checksum).
    Mnemonic(bip39::Error),
    /// Invalid word count for mnemonic.
    InvalidWordCount(usize),
    /// Seed has a length no HD scheme accepts.
    InvalidSeedLength(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mnemonic(e) => write!(f, "invalid mnemonic: {e}"),
            Self::InvalidWordCount(n) => {
                write!(f, "invalid word count {n}, must be 12, 15, 18, 21, or 24")
            }
            Self::InvalidSeedLength(n) => {
                write!(f, "invalid seed length {n}, must be between 16 and 64 bytes")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mnemonic(e) => Some(e),
            Self::InvalidWordCount(_) | Self::InvalidSeedLength(_) => None,
        }
    }
}

impl From<bip39::Error> for Error {
    fn from(err: bip39::Error) -> Self {
        Self::Mnemonic(err)
    }
}
