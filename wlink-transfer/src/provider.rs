//! The per-chain provider seam used by [`crate::Sender`] and the CLI.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use wlink_core::Chain;

use crate::{Error, Result};

/// Chain operations over an [`crate::RpcClient`].
///
/// Amounts and balances are in base units. Every network method surfaces
/// transport and RPC failures as errors; an empty history or a zero balance
/// is only ever returned when the node reported one.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// A transfer ready to be signed.
    type Unsigned: Send;
    /// A signed transfer ready to be broadcast.
    type Signed: Send + Sync;

    /// The chain this provider talks to.
    fn chain(&self) -> Chain;

    /// Check that `address` is a valid recipient. No network access.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if it does not parse.
    fn check_address(&self, address: &str) -> Result<()>;

    /// Current balance of `address`.
    async fn balance(&self, address: &str) -> Result<u128>;

    /// Fetch what the chain needs for a transfer (recent blockhash, nonce and
    /// gas price) and assemble it. `balance` is the value read during
    /// validation.
    async fn build(&self, from: &str, to: &str, amount: u128, balance: u128)
        -> Result<Self::Unsigned>;

    /// Sign with the wallet's stored secret key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if the key is malformed or belongs to an address
    /// other than `from`.
    fn sign(&self, unsigned: Self::Unsigned, secret_key: &str, from: &str) -> Result<Self::Signed>;

    /// Submit and return the transaction id reported by the node.
    async fn broadcast(&self, signed: &Self::Signed) -> Result<String>;

    /// Wait until the transaction is final enough to report.
    async fn confirm(&self, id: &str) -> Result<()>;

    /// Recent transactions touching `address`, newest first.
    async fn history(&self, address: &str) -> Result<Vec<HistoryEntry>>;
}

/// One transaction in an address's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Signature (Solana) or transaction hash (Ethereum).
    pub id: String,
    /// Slot or block number, when known.
    pub block: Option<u64>,
    /// Whether the transaction failed on chain.
    pub failed: bool,
    /// The node's record of the transaction, as returned.
    pub detail: Value,
}

/// Confirmation polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Give up waiting after this long.
    #[serde(with = "secs")]
    pub timeout: Duration,
    /// Delay between status queries.
    #[serde(with = "millis")]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_millis(1500),
        }
    }
}

/// Call `check` until it yields a value or `config.timeout` passes.
///
/// Network errors are retried until the deadline; any other error ends the
/// wait.
pub(crate) async fn poll_until<T, F, Fut>(config: &PollConfig, id: &str, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + config.timeout;
    loop {
        match check().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(Error::Network(reason)) => {
                tracing::warn!(id, %reason, "status query failed, retrying");
            }
            Err(err) => return Err(err),
        }
        if Instant::now() + config.interval > deadline {
            return Err(Error::ConfirmationTimeout {
                signature: id.to_owned(),
            });
        }
        tokio::time::sleep(config.interval).await;
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
