//! Solana JSON-RPC provider.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wlink_core::Chain;
use wlink_sol::transaction::{Blockhash, Message, Transaction};
use wlink_sol::{Keypair, Pubkey};

use crate::provider::{poll_until, ChainProvider, HistoryEntry, PollConfig};
use crate::{Error, Result, RpcClient};

/// Signatures fetched per history query.
pub const HISTORY_LIMIT: usize = 10;

/// How settled a result must be before the node reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Seen by the connected node.
    Processed,
    /// Voted on by a supermajority.
    #[default]
    Confirmed,
    /// Rooted.
    Finalized,
}

impl Commitment {
    /// The RPC spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(Error::InvalidResponse(format!("unknown commitment `{other}`"))),
        }
    }
}

/// [`ChainProvider`] for Solana.
#[derive(Debug)]
pub struct SolanaProvider<C> {
    client: C,
    commitment: Commitment,
    poll: PollConfig,
}

impl<C: RpcClient> SolanaProvider<C> {
    /// Create a provider at [`Commitment::Confirmed`] with default polling.
    pub fn new(client: C) -> Self {
        Self {
            client,
            commitment: Commitment::default(),
            poll: PollConfig::default(),
        }
    }

    /// Set the commitment used for reads and confirmation.
    #[must_use]
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// Set confirmation polling.
    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// A recent blockhash to anchor a transaction to.
    ///
    /// # Errors
    ///
    /// Network and RPC errors, or [`Error::InvalidResponse`] if the hash does
    /// not decode to 32 bytes.
    pub async fn latest_blockhash(&self) -> Result<Blockhash> {
        const METHOD: &str = "getLatestBlockhash";
        let result = self
            .client
            .request(METHOD, json!([{ "commitment": self.commitment }]))
            .await?;
        let encoded = result["value"]["blockhash"]
            .as_str()
            .ok_or_else(|| Error::invalid_response(METHOD, "missing blockhash"))?;

        let mut hash = [0u8; 32];
        match bs58::decode(encoded).onto(&mut hash) {
            Ok(32) => Ok(hash),
            _ => Err(Error::invalid_response(METHOD, "blockhash is not 32 bytes")),
        }
    }

    async fn signature_status(&self, signature: &str) -> Result<Option<()>> {
        const METHOD: &str = "getSignatureStatuses";
        let result = self
            .client
            .request(
                METHOD,
                json!([[signature], { "searchTransactionHistory": true }]),
            )
            .await?;
        let status = &result["value"][0];
        if status.is_null() {
            return Ok(None);
        }
        if !status["err"].is_null() {
            return Err(Error::BroadcastRejected(status["err"].to_string()));
        }
        let reached = match status["confirmationStatus"].as_str() {
            Some(level) => level.parse::<Commitment>()? >= self.commitment,
            None => false,
        };
        Ok(reached.then_some(()))
    }
}

fn parse_pubkey(address: &str) -> Result<Pubkey> {
    address.parse().map_err(|_| Error::InvalidAddress {
        chain: Chain::Solana,
        address: address.to_owned(),
    })
}

#[async_trait]
impl<C: RpcClient> ChainProvider for SolanaProvider<C> {
    type Unsigned = Message;
    type Signed = Transaction;

    fn chain(&self) -> Chain {
        Chain::Solana
    }

    fn check_address(&self, address: &str) -> Result<()> {
        parse_pubkey(address).map(drop)
    }

    async fn balance(&self, address: &str) -> Result<u128> {
        const METHOD: &str = "getBalance";
        let result = self
            .client
            .request(METHOD, json!([address, { "commitment": self.commitment }]))
            .await?;
        result["value"]
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| Error::invalid_response(METHOD, "missing lamports"))
    }

    async fn build(&self, from: &str, to: &str, amount: u128, _balance: u128) -> Result<Message> {
        let from = parse_pubkey(from)?;
        let to = parse_pubkey(to)?;
        let lamports = u64::try_from(amount)
            .map_err(|_| Error::InvalidAmount(format!("{amount} lamports does not fit in u64")))?;
        let blockhash = self.latest_blockhash().await?;
        Ok(Message::transfer(&from, &to, lamports, blockhash))
    }

    fn sign(&self, unsigned: Message, secret_key: &str, from: &str) -> Result<Transaction> {
        let keypair = Keypair::from_hex(secret_key).map_err(|e| Error::InvalidKey(e.to_string()))?;
        if keypair.address() != from {
            return Err(Error::InvalidKey(format!("secret key does not belong to {from}")));
        }
        Ok(Transaction::sign(unsigned, &keypair))
    }

    async fn broadcast(&self, signed: &Transaction) -> Result<String> {
        const METHOD: &str = "sendTransaction";
        let encoded = BASE64.encode(signed.serialize());
        let params = json!([
            encoded,
            { "encoding": "base64", "preflightCommitment": self.commitment },
        ]);
        let result = match self.client.request(METHOD, params).await {
            Ok(result) => result,
            Err(Error::Rpc { message, .. }) => return Err(Error::BroadcastRejected(message)),
            Err(err) => return Err(err),
        };
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::invalid_response(METHOD, "missing signature"))
    }

    async fn confirm(&self, id: &str) -> Result<()> {
        poll_until(&self.poll, id, || self.signature_status(id)).await
    }

    async fn history(&self, address: &str) -> Result<Vec<HistoryEntry>> {
        const METHOD: &str = "getSignaturesForAddress";
        let result = self
            .client
            .request(METHOD, json!([address, { "limit": HISTORY_LIMIT }]))
            .await?;
        let Value::Array(signatures) = result else {
            return Err(Error::invalid_response(METHOD, "expected an array"));
        };

        let mut entries = Vec::with_capacity(signatures.len());
        for info in signatures {
            let id = info["signature"]
                .as_str()
                .ok_or_else(|| Error::invalid_response(METHOD, "missing signature"))?
                .to_owned();
            let detail = self
                .client
                .request(
                    "getTransaction",
                    json!([id, { "encoding": "jsonParsed", "maxSupportedTransactionVersion": 0 }]),
                )
                .await?;
            entries.push(HistoryEntry {
                id,
                block: info["slot"].as_u64(),
                failed: !info["err"].is_null(),
                detail,
            });
        }
        Ok(entries)
    }
}
