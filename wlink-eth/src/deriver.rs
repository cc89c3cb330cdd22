//! Ethereum address derivation from an HD wallet seed.

use alloc::format;
use alloc::string::{String, ToString};

use bip32::{DerivationPath, XPrv};
use wlink_core::{Chain, KeyPair, Wallet};
use zeroize::Zeroizing;

use crate::{Error, Signer};

/// Accepted seed lengths, as in BIP-32.
const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

/// A derived Ethereum address with associated keys.
#[derive(Debug, Clone)]
pub struct DerivedAddress {
    /// Derivation path used (e.g., `m/44'/60'/0'/0/0`).
    pub path: String,
    /// Private key in hex without 0x prefix (zeroized on drop).
    pub private_key_hex: Zeroizing<String>,
    /// Public key in uncompressed hex format.
    pub public_key_hex: String,
    /// Checksummed Ethereum address (EIP-55).
    pub address: String,
}

impl DerivedAddress {
    /// Convert into the chain-agnostic key pair stored in wallet records.
    #[must_use]
    pub fn into_key_pair(self) -> KeyPair {
        KeyPair {
            chain: Chain::Ethereum,
            public_key: self.address,
            secret_key: self.private_key_hex,
        }
    }
}

/// Ethereum address deriver over a seed.
///
/// Uses BIP-32 along `m/44'/60'/0'/0/{index}`. Wallet generation always
/// takes index 0.
#[derive(Debug)]
pub struct Deriver<'a> {
    seed: &'a [u8],
}

impl<'a> Deriver<'a> {
    /// Create a new Ethereum deriver from a wallet.
    #[inline]
    #[must_use]
    pub fn new(wallet: &'a Wallet) -> Self {
        Self {
            seed: wallet.seed(),
        }
    }

    /// Create a deriver over raw seed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeedLength`] unless the seed is 16 to 64 bytes.
    pub fn from_seed(seed: &'a [u8]) -> Result<Self, Error> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(Error::InvalidSeedLength(seed.len()));
        }
        Ok(Self { seed })
    }

    /// Derivation path for an address index.
    #[must_use]
    pub fn path(index: u32) -> String {
        format!("m/44'/60'/0'/0/{index}")
    }

    /// Derive the address at `m/44'/60'/0'/0/{index}`.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    pub fn derive(&self, index: u32) -> Result<DerivedAddress, Error> {
        let path = Self::path(index);
        let parsed: DerivationPath = path
            .parse()
            .map_err(|e| Error::Derivation(format!("invalid path {path}: {e}")))?;
        let xprv = XPrv::derive_from_path(self.seed, &parsed)
            .map_err(|e| Error::Derivation(e.to_string()))?;
        let signer = Signer::new(xprv.private_key().clone());

        Ok(DerivedAddress {
            path,
            private_key_hex: signer.secret_hex(),
            public_key_hex: signer.public_key_hex(),
            address: signer.checksum_address(),
        })
    }
}
