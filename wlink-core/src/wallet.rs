//! Mnemonic-backed HD wallet root.

use alloc::string::{String, ToString};
use core::fmt;

use bip39::Mnemonic;
use zeroize::Zeroizing;

use crate::{Error, SEED_LEN};

/// A mnemonic together with the seed derived from it.
///
/// The seed is recomputed every time a `Wallet` is built and lives only as
/// long as the value; nothing here is persisted.
pub struct Wallet {
    /// BIP39 mnemonic phrase.
    mnemonic: Zeroizing<String>,
    /// Seed derived from mnemonic + passphrase.
    seed: Zeroizing<[u8; SEED_LEN]>,
}

impl Wallet {
    /// Generate a new wallet with a random mnemonic.
    ///
    /// # Errors
    ///
    /// Returns an error if the word count is invalid.
    #[cfg(feature = "rand")]
    pub fn generate(word_count: usize, passphrase: Option<&str>) -> Result<Self, Error> {
        let phrase = crate::mnemonic::generate(word_count)?;
        Self::from_mnemonic(&phrase, passphrase)
    }

    /// Create a wallet from an existing mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns an error if the mnemonic is invalid.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self, Error> {
        let mnemonic: Mnemonic = phrase.parse()?;
        let seed_bytes = mnemonic.to_seed(passphrase.unwrap_or(""));

        Ok(Self {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            seed: Zeroizing::new(seed_bytes),
        })
    }

    /// Build from user input: an empty (or blank) phrase generates a fresh
    /// 12-word mnemonic, anything else must parse.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty phrase is not a valid mnemonic.
    #[cfg(feature = "rand")]
    pub fn from_input(phrase: &str) -> Result<Self, Error> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            Self::generate(crate::mnemonic::DEFAULT_WORD_COUNT, None)
        } else {
            Self::from_mnemonic(phrase, None)
        }
    }

    /// Get the mnemonic phrase.
    #[inline]
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get the seed bytes for key derivation.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> &[u8; SEED_LEN] {
        &self.seed
    }

    /// Get the word count of the mnemonic.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.mnemonic.split_whitespace().count()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("word_count", &self.word_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[cfg(feature = "rand")]
    #[test]
    fn test_generate_12_words() {
        let wallet = Wallet::generate(12, None).unwrap();
        assert_eq!(wallet.word_count(), 12);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_from_input_blank_generates() {
        let wallet = Wallet::from_input("   ").unwrap();
        assert_eq!(wallet.word_count(), 12);
        assert!(crate::mnemonic::validate(wallet.mnemonic()));
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_from_input_uses_phrase() {
        let wallet = Wallet::from_input(TEST_MNEMONIC).unwrap();
        assert_eq!(wallet.mnemonic(), TEST_MNEMONIC);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_from_input_rejects_bad_phrase() {
        // a bad phrase is an error, never a fresh mnemonic
        let result = Wallet::from_input("abandon abandon abandon");
        assert!(matches!(result, Err(Error::Mnemonic(_))));
    }

    #[test]
    fn test_from_mnemonic_rejects_checksum() {
        let result = Wallet::from_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
            None,
        );
        assert!(matches!(result, Err(Error::Mnemonic(_))));
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let wallet1 = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        let wallet2 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("password")).unwrap();
        assert_ne!(wallet1.seed(), wallet2.seed());
    }

    #[test]
    fn test_debug_hides_mnemonic() {
        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        let debug = alloc::format!("{wallet:?}");
        assert!(!debug.contains("abandon"));
    }
}
