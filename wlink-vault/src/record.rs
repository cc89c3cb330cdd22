//! Wallet records as stored in the vault.
//!
//! On the wire a record is a flat JSON object:
//!
//! ```json
//! {"type":"solana","walletName":"W1","mnemonic":"...","publicKey":"...","secretKey":"..."}
//! ```
//!
//! Parsing routes on `type` and rejects records with a missing field or an
//! empty name or key, so an invalid record never reaches the store.

use std::fmt;

use serde::{Deserialize, Serialize};
use wlink_core::{Chain, KeyPair};
use zeroize::Zeroizing;

use crate::Error;

/// Fields shared by every chain's record.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletEntry {
    /// User label. Uniqueness is not enforced.
    pub wallet_name: String,
    /// Mnemonic the keys were derived from.
    pub mnemonic: Zeroizing<String>,
    /// Chain-native address.
    pub public_key: String,
    /// Hex-encoded secret key. The merge key on restore.
    pub secret_key: Zeroizing<String>,
}

impl fmt::Debug for WalletEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletEntry")
            .field("wallet_name", &self.wallet_name)
            .field("public_key", &self.public_key)
            .field("mnemonic", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// A wallet record, one variant per chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord", into = "RawRecord")]
pub enum WalletRecord {
    /// Ed25519 wallet.
    Solana(WalletEntry),
    /// Secp256k1 wallet.
    Ethereum(WalletEntry),
}

impl WalletRecord {
    /// Build a record from a derived key pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if `wallet_name` is empty.
    pub fn new(wallet_name: &str, mnemonic: &str, key_pair: KeyPair) -> Result<Self, Error> {
        let wallet_name = wallet_name.trim();
        if wallet_name.is_empty() {
            return Err(Error::MissingCredential("wallet name"));
        }
        let entry = WalletEntry {
            wallet_name: wallet_name.to_owned(),
            mnemonic: Zeroizing::new(mnemonic.to_owned()),
            public_key: key_pair.public_key,
            secret_key: key_pair.secret_key,
        };
        Ok(Self::from_entry(key_pair.chain, entry))
    }

    /// Wrap an entry in the variant for `chain`.
    #[must_use]
    pub const fn from_entry(chain: Chain, entry: WalletEntry) -> Self {
        match chain {
            Chain::Solana => Self::Solana(entry),
            Chain::Ethereum => Self::Ethereum(entry),
        }
    }

    /// The chain tag.
    #[must_use]
    pub const fn chain(&self) -> Chain {
        match self {
            Self::Solana(_) => Chain::Solana,
            Self::Ethereum(_) => Chain::Ethereum,
        }
    }

    /// Shared fields.
    #[must_use]
    pub const fn entry(&self) -> &WalletEntry {
        match self {
            Self::Solana(entry) | Self::Ethereum(entry) => entry,
        }
    }

    /// User label.
    #[inline]
    #[must_use]
    pub fn wallet_name(&self) -> &str {
        &self.entry().wallet_name
    }

    /// Chain-native address.
    #[inline]
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.entry().public_key
    }

    /// Hex-encoded secret key.
    #[inline]
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.entry().secret_key
    }

    /// Mnemonic phrase.
    #[inline]
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.entry().mnemonic
    }
}

/// Flat wire form.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(rename = "type")]
    chain: Chain,
    wallet_name: String,
    mnemonic: String,
    public_key: String,
    secret_key: String,
}

impl TryFrom<RawRecord> for WalletRecord {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        for (field, value) in [
            ("walletName", &raw.wallet_name),
            ("publicKey", &raw.public_key),
            ("secretKey", &raw.secret_key),
        ] {
            if value.trim().is_empty() {
                return Err(format!("empty field `{field}`"));
            }
        }
        let entry = WalletEntry {
            wallet_name: raw.wallet_name,
            mnemonic: Zeroizing::new(raw.mnemonic),
            public_key: raw.public_key,
            secret_key: Zeroizing::new(raw.secret_key),
        };
        Ok(Self::from_entry(raw.chain, entry))
    }
}

impl From<WalletRecord> for RawRecord {
    fn from(record: WalletRecord) -> Self {
        let chain = record.chain();
        let (WalletRecord::Solana(entry) | WalletRecord::Ethereum(entry)) = record;
        Self {
            chain,
            wallet_name: entry.wallet_name,
            mnemonic: entry.mnemonic.to_string(),
            public_key: entry.public_key,
            secret_key: entry.secret_key.to_string(),
        }
    }
}

/// Parse one chain's stored record list.
pub(crate) fn parse_list(bytes: &[u8]) -> Result<Vec<WalletRecord>, Error> {
    serde_json::from_slice(bytes).map_err(|_| Error::DecryptionFailure)
}

/// Serialize a record list, zeroized on drop.
pub(crate) fn encode_list(records: &[WalletRecord]) -> Result<Zeroizing<Vec<u8>>, Error> {
    Ok(Zeroizing::new(serde_json::to_vec(records)?))
}
