//! Vault error types.

use std::io;

use thiserror::Error;
use wlink_core::Chain;

/// Errors raised by the vault cipher, store and backup codec.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required password, key or name was empty.
    #[error("missing {0}")]
    MissingCredential(&'static str),

    /// The password does not match the stored gate hash.
    #[error("incorrect password")]
    WrongPassword,

    /// Decrypted bytes failed the structural check, the integrity tag did
    /// not verify, or the blob itself is unreadable.
    #[error("wrong password or corrupt file")]
    DecryptionFailure,

    /// The decrypted backup has the wrong shape or a bad record.
    #[error("{0}")]
    MalformedBackup(String),

    /// Index out of range for the chain's wallet list.
    #[error("no {chain} wallet at index {index}")]
    NoSuchWallet {
        /// Chain that was addressed.
        chain: Chain,
        /// Requested position.
        index: usize,
    },

    /// The vault has not been opened, or was locked.
    #[error("vault is locked")]
    Locked,

    /// Backing storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),

    /// Records could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Validation errors are reported as warnings and leave the calling
    /// flow running; everything else aborts the operation.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_) | Self::WrongPassword | Self::NoSuchWallet { .. }
        )
    }

    pub(crate) fn invalid_structure() -> Self {
        Self::MalformedBackup("invalid backup structure".to_owned())
    }

    pub(crate) fn invalid_wallet(detail: impl std::fmt::Display) -> Self {
        Self::MalformedBackup(format!("invalid wallet data: {detail}"))
    }
}

/// Result alias for vault operations.
pub type Result<T> = std::result::Result<T, Error>;
