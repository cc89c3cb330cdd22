//! Password-sealed wallet vault for wlink.
//!
//! - [`cipher`]: PBKDF2-SHA256 key stretching and AES-256-CTR blobs
//! - [`gate`]: the unlock check, kept apart from the cipher key
//! - [`Vault`]: per-chain record lists over an injected [`Storage`]
//! - [`backup`]: export/import with merge by secret key
//!
//! # Usage
//!
//! ```no_run
//! # async fn run() -> wlink_vault::Result<()> {
//! use wlink_vault::{FileStorage, Vault, VaultConfig};
//! use wlink_core::Chain;
//!
//! let vault = Vault::new(FileStorage::open("./wlink-data")?, VaultConfig::default());
//! vault.open("correct horse").await?;
//! for record in vault.list(Chain::Solana).await? {
//!     println!("{} {}", record.wallet_name(), record.public_key());
//! }
//! vault.lock().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod backup;
mod blob;
pub mod cipher;
mod config;
mod error;
pub mod gate;
mod record;
mod storage;
mod store;

pub use backup::MergeResult;
pub use blob::EncryptedBlob;
pub use config::VaultConfig;
pub use error::{Error, Result};
pub use record::{WalletEntry, WalletRecord};
pub use storage::{
    wallets_key, FileStorage, MemoryStorage, Storage, BACKUP_FILE_NAME, ETHEREUM_WALLETS_KEY,
    PASSWORD_KEY, SOLANA_WALLETS_KEY,
};
pub use store::Vault;
