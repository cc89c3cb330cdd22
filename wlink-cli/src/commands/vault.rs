//! Backup and restore.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use wlink::vault::{backup, BACKUP_FILE_NAME};
use wlink::Chain;

use super::Context;

/// Vault backup operations.
#[derive(Args)]
pub struct VaultCommand {
    #[command(subcommand)]
    command: VaultSubcommand,
}

#[derive(Subcommand)]
enum VaultSubcommand {
    /// Write every wallet to a backup sealed under the vault password.
    Backup {
        /// Output file.
        #[arg(short, long, default_value = BACKUP_FILE_NAME)]
        out: PathBuf,
    },

    /// Merge a backup into the vault. Wallets whose secret key is already
    /// stored are skipped.
    Restore {
        /// Backup file.
        file: PathBuf,

        /// Password the backup was sealed with, if not the vault password.
        #[arg(long, env = "WLINK_BACKUP_PASSWORD", hide_env_values = true)]
        backup_password: Option<String>,
    },
}

impl VaultCommand {
    /// Execute the vault command.
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self.command {
            VaultSubcommand::Backup { out } => {
                let vault = ctx.open_vault().await?;
                let blob = vault.export(&Chain::ALL).await?;
                backup::write_file(&out, &blob)
                    .with_context(|| format!("failed to write {}", out.display()))?;

                println!();
                for chain in Chain::ALL {
                    let count = vault.list(chain).await?.len();
                    println!("      {:<9}  {count}", chain.to_string().cyan().bold());
                }
                println!("      {}     {}", "Written".cyan().bold(), out.display().to_string().green());
                println!();
            }
            VaultSubcommand::Restore {
                file,
                backup_password,
            } => {
                let vault = ctx.open_vault().await?;
                let blob = backup::read_file(&file)?;
                let password = match backup_password.as_deref() {
                    Some(password) => password,
                    None => ctx.password()?,
                };
                let merged = vault.import(&blob, password).await?;

                println!();
                for chain in Chain::ALL {
                    println!(
                        "      {:<9}  {} new",
                        chain.to_string().cyan().bold(),
                        merged.added(chain)
                    );
                }
                if merged.is_empty() {
                    println!("      {}", "Nothing to restore".dimmed());
                }
                println!();
            }
        }
        Ok(())
    }
}
