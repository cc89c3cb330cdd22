//! BIP-39 mnemonic service.
//!
//! Generation, validation and seed derivation. Validation never fails loudly:
//! it answers `false` and leaves it to the caller to surface a warning.

use alloc::string::{String, ToString};

use bip39::Mnemonic;
use zeroize::Zeroizing;

use crate::{Error, SEED_LEN};

/// Word count used when the user supplies no mnemonic.
pub const DEFAULT_WORD_COUNT: usize = 12;

/// Generate a fresh mnemonic from the operating system RNG.
///
/// # Errors
///
/// Returns an error if the word count is not 12, 15, 18, 21, or 24.
#[cfg(feature = "rand")]
pub fn generate(word_count: usize) -> Result<Zeroizing<String>, Error> {
    if !matches!(word_count, 12 | 15 | 18 | 21 | 24) {
        return Err(Error::InvalidWordCount(word_count));
    }
    let mnemonic = Mnemonic::generate(word_count)?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Check wordlist membership and checksum of a candidate phrase.
#[must_use]
pub fn validate(candidate: &str) -> bool {
    candidate.parse::<Mnemonic>().is_ok()
}

/// Derive the 64-byte seed for a phrase and BIP39 passphrase.
///
/// # Errors
///
/// Returns an error if the phrase is not a valid mnemonic.
pub fn seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>, Error> {
    let mnemonic: Mnemonic = phrase.parse()?;
    Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
}
