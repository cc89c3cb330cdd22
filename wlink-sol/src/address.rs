//! Base58 Solana public keys.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::Error;

/// A 32-byte Solana public key (account address).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    /// The system program, `11111111111111111111111111111111`.
    pub const SYSTEM_PROGRAM: Self = Self([0u8; 32]);

    /// Create from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base58 string form.
    #[must_use]
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl FromStr for Pubkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 32 bytes never encode to more than 44 base58 characters.
        if s.is_empty() || s.len() > 44 {
            return Err(Error::InvalidAddress);
        }
        let mut bytes = [0u8; 32];
        let written = bs58::decode(s)
            .onto(&mut bytes)
            .map_err(|_| Error::InvalidAddress)?;
        if written != 32 {
            return Err(Error::InvalidAddress);
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
