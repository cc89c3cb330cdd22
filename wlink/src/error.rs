//! Facade error type.

use thiserror::Error;

/// Errors from deriving keys and building wallet records.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Mnemonic did not parse, or a seed had an unusable length.
    #[error(transparent)]
    Core(#[from] wlink_core::Error),

    /// Solana derivation failed.
    #[error(transparent)]
    Solana(#[from] wlink_sol::Error),

    /// Ethereum derivation failed.
    #[error(transparent)]
    Ethereum(#[from] wlink_eth::Error),

    /// Record construction or a vault operation failed.
    #[error(transparent)]
    Vault(#[from] wlink_vault::Error),
}

impl Error {
    /// Whether the caller should warn and carry on rather than abort.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        match self {
            Self::Core(wlink_core::Error::Mnemonic(_)) => true,
            Self::Vault(err) => err.is_warning(),
            _ => false,
        }
    }
}

/// A convenient Result type alias for wlink operations.
pub type Result<T> = std::result::Result<T, Error>;
