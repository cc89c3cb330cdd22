//! Mnemonic utilities.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use wlink::mnemonic;

/// Mnemonic utility operations.
#[derive(Args)]
pub struct MnemonicCommand {
    #[command(subcommand)]
    command: MnemonicSubcommand,
}

#[derive(Subcommand)]
enum MnemonicSubcommand {
    /// Generate a new mnemonic without storing anything.
    New {
        /// Number of words (12, 15, 18, 21, or 24).
        #[arg(short, long, default_value = "12")]
        words: usize,
    },

    /// Check a mnemonic's words and checksum.
    Check {
        /// BIP39 mnemonic phrase.
        phrase: String,
    },
}

impl MnemonicCommand {
    /// Execute the mnemonic command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            MnemonicSubcommand::New { words } => {
                let phrase = mnemonic::generate(words).map_err(wlink::Error::from)?;
                println!();
                println!("      {}     {}", "Mnemonic".cyan().bold(), phrase.as_str().green());
                println!();
            }
            MnemonicSubcommand::Check { phrase } => {
                // the parse error says which word or checksum is wrong
                wlink::Wallet::from_mnemonic(&phrase, None).map_err(wlink::Error::from)?;
                let words = phrase.split_whitespace().count();
                println!();
                println!("      {}        {}", "Valid".cyan().bold(), format!("{words} words").green());
                println!();
            }
        }
        Ok(())
    }
}
