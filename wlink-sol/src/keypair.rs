//! Ed25519 keypair reconstructed from a stored secret key.

use alloc::string::String;
use core::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use crate::{Error, Pubkey};

/// A Solana signing keypair.
///
/// Wallet records store the 64-byte form (32-byte secret seed followed by
/// the 32-byte public key) in hex. Both that form and the bare 32-byte seed
/// are accepted.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Create a keypair from a raw 32-byte secret seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create a keypair from raw bytes, 32 (seed) or 64 (seed || public key).
    ///
    /// # Errors
    ///
    /// Returns an error if the length is wrong or the public half of a 64-byte
    /// keypair disagrees with the secret half.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match bytes.len() {
            32 => {
                let mut seed = Zeroizing::new([0u8; 32]);
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(&seed))
            }
            64 => {
                let mut seed = Zeroizing::new([0u8; 32]);
                seed.copy_from_slice(&bytes[..32]);
                let keypair = Self::from_seed(&seed);
                if keypair.signing_key.verifying_key().as_bytes()[..] != bytes[32..] {
                    return Err(Error::KeypairMismatch);
                }
                Ok(keypair)
            }
            n => Err(Error::InvalidKeyLength(n)),
        }
    }

    /// Create a keypair from a hex-encoded secret key.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or the key is malformed.
    pub fn from_hex(hex_key: &str) -> Result<Self, Error> {
        let hex_key = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let bytes = Zeroizing::new(hex::decode(hex_key).map_err(|_| Error::InvalidHex)?);
        Self::from_bytes(&bytes)
    }

    /// The account address.
    #[must_use]
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Base58 address string.
    #[inline]
    #[must_use]
    pub fn address(&self) -> String {
        self.pubkey().to_base58()
    }

    /// The 64-byte keypair (secret seed || public key), zeroized on drop.
    #[must_use]
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// The 64-byte keypair in hex, as stored in wallet records.
    #[must_use]
    pub fn keypair_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_keypair_bytes().as_slice()))
    }

    /// The 64-byte keypair in base58, the import format of browser wallets.
    #[must_use]
    pub fn keypair_base58(&self) -> Zeroizing<String> {
        Zeroizing::new(bs58::encode(self.to_keypair_bytes().as_slice()).into_string())
    }

    /// Produce a detached ed25519 signature over `message`.
    #[must_use]
    pub fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

/// Verify a detached signature against a base58 address.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the address does not decode to a curve
/// point, or [`Error::Signature`] if the signature does not verify.
pub fn verify_message(message: &[u8], signature: &[u8; 64], address: &str) -> Result<(), Error> {
    let pubkey: Pubkey = address.parse()?;
    let verifying_key =
        VerifyingKey::from_bytes(pubkey.as_bytes()).map_err(|_| Error::InvalidAddress)?;
    verifying_key
        .verify(message, &Signature::from_bytes(signature))
        .map_err(|_| Error::Signature)
}
