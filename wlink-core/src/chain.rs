//! Chain tags.

use core::fmt;
use core::str::FromStr;

/// The chains a wallet record can belong to.
///
/// The lowercase name doubles as the record `type` tag and as the key of a
/// multi-chain backup object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Chain {
    /// Ed25519 chain, SLIP-0010 derivation, base58 addresses.
    Solana,
    /// Secp256k1 chain, BIP-32 derivation, EIP-55 addresses.
    #[cfg_attr(feature = "serde", serde(alias = "Ethereum"))]
    Ethereum,
}

impl Chain {
    /// All supported chains in display order.
    pub const ALL: [Chain; 2] = [Chain::Solana, Chain::Ethereum];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Solana => "solana",
            Self::Ethereum => "ethereum",
        }
    }

    /// Ticker of the native asset.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Solana => "SOL",
            Self::Ethereum => "ETH",
        }
    }

    /// Number of decimals between the display unit and the base unit.
    #[must_use]
    pub const fn decimals(self) -> u32 {
        match self {
            Self::Solana => 9,
            Self::Ethereum => 18,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown chain name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseChainError;

impl fmt::Display for ParseChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown chain, expected one of: solana, ethereum")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseChainError {}

impl FromStr for Chain {
    type Err = ParseChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("solana") || s.eq_ignore_ascii_case("sol") {
            Ok(Self::Solana)
        } else if s.eq_ignore_ascii_case("ethereum") || s.eq_ignore_ascii_case("eth") {
            Ok(Self::Ethereum)
        } else {
            Err(ParseChainError)
        }
    }
}
