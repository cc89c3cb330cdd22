//! Ethereum JSON-RPC provider.

use std::cmp::Reverse;
use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::{json, Value};
use wlink_core::Chain;
use wlink_eth::transaction::{SignedTransaction, Transaction};
use wlink_eth::{parse_address, Address, Signer};

use crate::provider::{poll_until, ChainProvider, HistoryEntry, PollConfig};
use crate::{Error, Result, RpcClient};

/// Transfer categories requested from `alchemy_getAssetTransfers`.
pub const TRANSFER_CATEGORIES: [&str; 5] = ["external", "internal", "erc20", "erc721", "erc1155"];

/// Transfers fetched per direction, as a hex quantity.
pub const HISTORY_MAX_COUNT: &str = "0x10";

/// [`ChainProvider`] for Ethereum and EVM networks speaking the same RPC.
#[derive(Debug)]
pub struct EthereumProvider<C> {
    client: C,
    chain_id: u64,
    poll: PollConfig,
}

impl<C: RpcClient> EthereumProvider<C> {
    /// Create a provider signing for `chain_id`.
    pub fn new(client: C, chain_id: u64) -> Self {
        Self {
            client,
            chain_id,
            poll: PollConfig::default(),
        }
    }

    /// Set confirmation polling.
    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// The EIP-155 chain id transactions are signed for.
    #[inline]
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn quantity(&self, method: &str, params: Value) -> Result<u128> {
        let result = self.client.request(method, params).await?;
        parse_quantity(method, &result)
    }

    async fn receipt_status(&self, hash: &str) -> Result<Option<()>> {
        const METHOD: &str = "eth_getTransactionReceipt";
        let receipt = self.client.request(METHOD, json!([hash])).await?;
        if receipt.is_null() {
            return Ok(None);
        }
        match receipt["status"].as_str() {
            Some("0x1") => Ok(Some(())),
            Some("0x0") => Err(Error::BroadcastRejected(format!("{hash} reverted"))),
            _ => Err(Error::invalid_response(METHOD, "missing status")),
        }
    }

    async fn transfers(&self, direction: &str, address: &str) -> Result<Vec<Value>> {
        const METHOD: &str = "alchemy_getAssetTransfers";
        let mut query = json!({
            "category": TRANSFER_CATEGORIES,
            "withMetadata": true,
            "excludeZeroValue": true,
            "maxCount": HISTORY_MAX_COUNT,
        });
        query[direction] = json!(address);
        let mut result = self.client.request(METHOD, json!([query])).await?;
        match result["transfers"].take() {
            Value::Array(transfers) => Ok(transfers),
            _ => Err(Error::invalid_response(METHOD, "missing transfers")),
        }
    }
}

/// Parse a JSON-RPC hex quantity such as `"0x1bc16d674ec80000"`.
fn parse_quantity(method: &str, value: &Value) -> Result<u128> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::invalid_response(method, "expected a hex quantity"))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| Error::invalid_response(method, format!("`{text}` lacks 0x")))?;
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| Error::invalid_response(method, format!("`{text}` is not a quantity")))
}

fn address(input: &str) -> Result<Address> {
    parse_address(input).map_err(|_| Error::InvalidAddress {
        chain: Chain::Ethereum,
        address: input.to_owned(),
    })
}

#[async_trait]
impl<C: RpcClient> ChainProvider for EthereumProvider<C> {
    type Unsigned = Transaction;
    type Signed = SignedTransaction;

    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    fn check_address(&self, input: &str) -> Result<()> {
        address(input).map(drop)
    }

    async fn balance(&self, address: &str) -> Result<u128> {
        self.quantity("eth_getBalance", json!([address, "latest"]))
            .await
    }

    async fn build(&self, from: &str, to: &str, amount: u128, balance: u128) -> Result<Transaction> {
        let to = address(to)?;
        let nonce = self
            .quantity("eth_getTransactionCount", json!([from, "pending"]))
            .await?;
        let nonce = u64::try_from(nonce)
            .map_err(|_| Error::invalid_response("eth_getTransactionCount", "nonce overflows u64"))?;
        let gas_price = self.quantity("eth_gasPrice", json!([])).await?;

        let tx = Transaction::transfer(to, amount, nonce, gas_price, self.chain_id);
        let total = amount.saturating_add(tx.max_fee());
        if total > balance {
            return Err(Error::InsufficientBalance {
                balance,
                amount: total,
            });
        }
        Ok(tx)
    }

    fn sign(&self, unsigned: Transaction, secret_key: &str, from: &str) -> Result<SignedTransaction> {
        let signer = Signer::from_hex(secret_key).map_err(|e| Error::InvalidKey(e.to_string()))?;
        if signer.address() != address(from)? {
            return Err(Error::InvalidKey(format!("secret key does not belong to {from}")));
        }
        unsigned
            .sign(&signer)
            .map_err(|e| Error::InvalidKey(e.to_string()))
    }

    async fn broadcast(&self, signed: &SignedTransaction) -> Result<String> {
        const METHOD: &str = "eth_sendRawTransaction";
        let result = match self.client.request(METHOD, json!([signed.to_hex()])).await {
            Ok(result) => result,
            Err(Error::Rpc { message, .. }) => return Err(Error::BroadcastRejected(message)),
            Err(err) => return Err(err),
        };
        let hash = result
            .as_str()
            .ok_or_else(|| Error::invalid_response(METHOD, "missing transaction hash"))?;
        let local = format!("0x{}", hex::encode(signed.tx_hash()));
        if !hash.eq_ignore_ascii_case(&local) {
            tracing::warn!(%hash, %local, "node reported a different transaction hash");
        }
        Ok(hash.to_owned())
    }

    async fn confirm(&self, id: &str) -> Result<()> {
        poll_until(&self.poll, id, || self.receipt_status(id)).await
    }

    /// Transfers sent from and received by `address`, merged.
    async fn history(&self, address: &str) -> Result<Vec<HistoryEntry>> {
        let mut transfers = self.transfers("fromAddress", address).await?;
        transfers.extend(self.transfers("toAddress", address).await?);

        let mut seen = HashSet::new();
        let mut entries: Vec<HistoryEntry> = transfers
            .into_iter()
            .filter(|t| {
                let key = t["uniqueId"].as_str().or_else(|| t["hash"].as_str());
                key.map_or(true, |k| seen.insert(k.to_owned()))
            })
            .map(|detail| HistoryEntry {
                id: detail["hash"].as_str().unwrap_or_default().to_owned(),
                block: parse_quantity("alchemy_getAssetTransfers", &detail["blockNum"])
                    .ok()
                    .and_then(|n| u64::try_from(n).ok()),
                failed: false,
                detail,
            })
            .collect();
        entries.sort_by_key(|entry| Reverse(entry.block));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("m", &json!("0x0")).unwrap(), 0);
        assert_eq!(parse_quantity("m", &json!("0x")).unwrap(), 0);
        assert_eq!(
            parse_quantity("m", &json!("0x1bc16d674ec80000")).unwrap(),
            2_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_parse_quantity_rejects() {
        for bad in [json!(null), json!(12), json!("12"), json!("0xzz")] {
            let err = parse_quantity("eth_getBalance", &bad).unwrap_err();
            assert!(matches!(err, Error::InvalidResponse(_)), "{bad}");
            assert!(!err.is_warning());
        }
    }

    #[test]
    fn test_address_errors_are_warnings() {
        let err = address("0x1234").unwrap_err();
        assert!(err.is_warning());
        assert!(address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
    }
}
