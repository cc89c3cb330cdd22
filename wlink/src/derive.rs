//! Chain-polymorphic key derivation.

use wlink_core::{Chain, KeyPair};

use crate::Result;

/// Derive the key pair for `chain` at `index` from a BIP39 seed.
///
/// | chain    | path                      |
/// |----------|---------------------------|
/// | Solana   | `m/44'/501'/{index}'/0'`  |
/// | Ethereum | `m/44'/60'/0'/0/{index}`  |
///
/// The result depends only on the inputs.
///
/// # Errors
///
/// Returns an error if the seed is not 16 to 64 bytes or derivation fails.
pub fn derive(chain: Chain, seed: &[u8], index: u32) -> Result<KeyPair> {
    let pair = match chain {
        Chain::Solana => wlink_sol::Deriver::from_seed(seed)?
            .derive(index)?
            .into_key_pair(),
        Chain::Ethereum => wlink_eth::Deriver::from_seed(seed)?
            .derive(index)?
            .into_key_pair(),
    };
    Ok(pair)
}

/// The derivation path [`derive`] uses for `chain` and `index`.
#[must_use]
pub fn path(chain: Chain, index: u32) -> String {
    match chain {
        Chain::Solana => wlink_sol::Deriver::path(index),
        Chain::Ethereum => wlink_eth::Deriver::path(index),
    }
}
