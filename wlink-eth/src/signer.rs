//! secp256k1 signing key bound to its Ethereum address.

use alloc::string::String;

use alloy_primitives::Address;
use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::address::{public_key_to_address, to_checksum_address};
use crate::{eip191, Error};

/// A recoverable ECDSA signature split into its Ethereum components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// `r` scalar, big-endian.
    pub r: [u8; 32],
    /// `s` scalar, big-endian (low-s normalized).
    pub s: [u8; 32],
    /// Recovery id, 0 or 1.
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// 65-byte `r || s || v` form with `v = 27 + recovery_id`.
    #[must_use]
    pub fn to_rsv(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = 27 + self.recovery_id;
        out
    }
}

/// An Ethereum signer reconstructed from a raw secret key.
#[derive(Clone)]
pub struct Signer {
    signing_key: SigningKey,
    address: Address,
}

impl Signer {
    /// Wrap an existing signing key.
    #[must_use]
    pub fn new(signing_key: SigningKey) -> Self {
        let point = signing_key.verifying_key().to_encoded_point(false);
        let address = public_key_to_address(point.as_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Create a signer from 32 secret key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if the bytes are not a valid
    /// secp256k1 scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self::new(signing_key))
    }

    /// Create a signer from a hex secret key, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] on malformed hex, or
    /// [`Error::InvalidPrivateKey`] if the key is not 32 valid bytes.
    pub fn from_hex(secret: &str) -> Result<Self, Error> {
        let digits = secret.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        let bytes = Zeroizing::new(hex::decode(digits).map_err(|_| Error::InvalidHex)?);
        if bytes.len() != 32 {
            return Err(Error::InvalidPrivateKey);
        }
        Self::from_bytes(&bytes)
    }

    /// The signer's address.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The signer's EIP-55 checksummed address.
    #[must_use]
    pub fn checksum_address(&self) -> String {
        to_checksum_address(&self.address)
    }

    /// Secret key as lowercase hex without a prefix, zeroized on drop.
    #[must_use]
    pub fn secret_hex(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(hex::encode(bytes.as_slice()))
    }

    /// Uncompressed SEC1 public key as hex.
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        hex::encode(point.as_bytes())
    }

    /// Sign a 32-byte digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signature`] if the underlying ECDSA operation fails.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<RecoverableSignature, Error> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|_| Error::Signature)?;
        let (r, s) = signature.split_bytes();

        let mut out = RecoverableSignature {
            r: [0u8; 32],
            s: [0u8; 32],
            recovery_id: recovery_id.to_byte(),
        };
        out.r.copy_from_slice(&r);
        out.s.copy_from_slice(&s);
        Ok(out)
    }

    /// Sign a message with the EIP-191 personal-message prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signature`] if signing fails.
    pub fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, Error> {
        self.sign_hash(&eip191::hash_message(message))
    }
}

impl core::fmt::Debug for Signer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.checksum_address())
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}
