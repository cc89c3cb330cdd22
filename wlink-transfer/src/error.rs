//! Error types for balance, history and send operations.

use thiserror::Error;
use wlink_core::Chain;

/// Errors from the RPC layer and the send state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Recipient is not a valid address for the chain.
    #[error("invalid {chain} address: {address}")]
    InvalidAddress {
        /// Chain the address was checked against.
        chain: Chain,
        /// The rejected input.
        address: String,
    },

    /// Amount is not a positive decimal with at most the chain's precision.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount (plus fee, where known) exceeds the balance read from chain.
    #[error("insufficient balance: have {balance}, need {amount}")]
    InsufficientBalance {
        /// Balance in base units.
        balance: u128,
        /// Required amount in base units.
        amount: u128,
    },

    /// The wallet's secret key cannot sign for its recorded address.
    #[error("invalid wallet key: {0}")]
    InvalidKey(String),

    /// The endpoint could not be reached or answered with a non-JSON body.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint returned a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the node.
        message: String,
    },

    /// A result did not have the expected shape.
    #[error("unexpected rpc response: {0}")]
    InvalidResponse(String),

    /// The chain refused the signed transaction or it failed on chain.
    #[error("transaction rejected: {0}")]
    BroadcastRejected(String),

    /// The transaction was submitted but not confirmed in time. It may still
    /// land.
    #[error("transaction {signature} not confirmed in time")]
    ConfirmationTimeout {
        /// Signature or hash of the outstanding transaction.
        signature: String,
    },
}

impl Error {
    /// Validation errors. These are surfaced as a warning and the caller may
    /// retry with corrected input; everything else aborts the send.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress { .. } | Self::InvalidAmount(_) | Self::InsufficientBalance { .. }
        )
    }

    pub(crate) fn invalid_response(method: &str, detail: impl std::fmt::Display) -> Self {
        Self::InvalidResponse(format!("{method}: {detail}"))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// A convenient Result type alias for wlink-transfer operations.
pub type Result<T> = std::result::Result<T, Error>;
