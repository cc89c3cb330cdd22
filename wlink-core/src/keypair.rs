//! Chain-agnostic key pair.

use alloc::string::String;
use core::fmt;

use zeroize::Zeroizing;

use crate::Chain;

/// A derived key pair in the form stored in wallet records.
///
/// `public_key` is the chain-native address string and `secret_key` the raw
/// key bytes in hex. The chain derivers are the only constructors that
/// compute both halves, so the address always matches the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// Chain the key pair belongs to.
    pub chain: Chain,
    /// Chain-native address (base58 for Solana, EIP-55 hex for Ethereum).
    pub public_key: String,
    /// Secret key bytes in hex (zeroized on drop).
    pub secret_key: Zeroizing<String>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("chain", &self.chain)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
