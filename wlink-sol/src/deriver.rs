//! Solana address derivation from an HD wallet seed.

use alloc::format;
use alloc::string::String;

use wlink_core::{Chain, KeyPair, Wallet};
use zeroize::Zeroizing;

use crate::slip10::DerivedKey;
use crate::{Error, Keypair};

/// Accepted seed lengths, as in BIP-32.
const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

/// A derived Solana address with associated keys.
#[derive(Debug, Clone)]
pub struct DerivedAddress {
    /// Derivation path used (e.g., `m/44'/501'/0'/0'`).
    pub path: String,
    /// 64-byte keypair (secret 32B + public 32B) in hex, zeroized on drop.
    pub keypair_hex: Zeroizing<String>,
    /// Same 64-byte keypair in base58, the Phantom/Solflare import format.
    pub keypair_base58: Zeroizing<String>,
    /// Solana address (Base58 encoded public key).
    pub address: String,
}

impl DerivedAddress {
    /// Convert into the chain-agnostic key pair stored in wallet records.
    #[must_use]
    pub fn into_key_pair(self) -> KeyPair {
        KeyPair {
            chain: Chain::Solana,
            public_key: self.address,
            secret_key: self.keypair_hex,
        }
    }
}

/// Solana address deriver over a seed.
///
/// Uses SLIP-0010 along `m/44'/501'/{account}'/0'`.
#[derive(Debug)]
pub struct Deriver<'a> {
    seed: &'a [u8],
}

impl<'a> Deriver<'a> {
    /// Create a new Solana deriver from a wallet.
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

    /// Derivation path for an account index.
    #[must_use]
    pub fn path(account: u32) -> String {
        format!("m/44'/501'/{account}'/0'")
    }

    /// Derive the address at `m/44'/501'/{account}'/0'`.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    pub fn derive(&self, account: u32) -> Result<DerivedAddress, Error> {
        let derived = DerivedKey::derive_account(self.seed, account)?;
        let keypair = Keypair::from_seed(&derived.private_key);

        Ok(DerivedAddress {
            path: Self::path(account),
            keypair_hex: keypair.keypair_hex(),
            keypair_base58: keypair.keypair_base58(),
            address: keypair.address(),
        })
    }
}
