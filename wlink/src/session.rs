//! Wallet generation.

use wlink_core::{Chain, Wallet};
use wlink_vault::WalletRecord;

use crate::{derive, Result};

/// Builds wallet records from mnemonic input.
///
/// Solana wallets take their account index from a counter that starts at
/// zero for every `Session` and advances after each successful generation.
/// Ethereum wallets always use index 0. The counter is not persisted, so two
/// sessions hand out the same indices; since each generation normally uses
/// a fresh mnemonic this only changes which path a new wallet sits on.
#[derive(Debug, Default)]
pub struct Session {
    next_solana_account: u32,
}

impl Session {
    /// A session whose Solana counter starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The index the next wallet for `chain` will be derived at.
    #[must_use]
    pub const fn next_index(&self, chain: Chain) -> u32 {
        match chain {
            Chain::Solana => self.next_solana_account,
            Chain::Ethereum => 0,
        }
    }

    /// Generate a wallet record for `chain`.
    ///
    /// A blank `mnemonic` generates a new 12-word phrase; otherwise the
    /// phrase must be a valid BIP39 mnemonic. The name is required.
    ///
    /// # Errors
    ///
    /// - [`wlink_vault::Error::MissingCredential`] if `wallet_name` is blank
    /// - an invalid-mnemonic error for a phrase that does not parse
    ///
    /// Both are warnings ([`crate::Error::is_warning`]). The counter only
    /// advances on success.
    pub fn generate(&mut self, chain: Chain, mnemonic: &str, wallet_name: &str) -> Result<WalletRecord> {
        if wallet_name.trim().is_empty() {
            return Err(wlink_vault::Error::MissingCredential("wallet name").into());
        }
        let wallet = Wallet::from_input(mnemonic)?;
        let index = self.next_index(chain);
        let pair = derive(chain, wallet.seed(), index)?;
        let record = WalletRecord::new(wallet_name, wallet.mnemonic(), pair)?;

        if chain == Chain::Solana {
            self.next_solana_account += 1;
        }
        tracing::debug!(%chain, index, "generated wallet");
        Ok(record)
    }
}
