//! # wlink
//!
//! Mnemonic-derived Solana and Ethereum wallets, sealed at rest under a
//! password, with backup/restore and native transfers.
//!
//! | crate            | concern                                              |
//! |------------------|------------------------------------------------------|
//! | `wlink-core`     | mnemonic, seed, [`Chain`], [`KeyPair`]               |
//! | `wlink-sol`      | SLIP-0010 ed25519 keys and SOL transfers             |
//! | `wlink-eth`      | BIP-32 secp256k1 keys and legacy ETH transfers       |
//! | `wlink-vault`    | password-sealed records, backup and restore          |
//! | `wlink-transfer` | JSON-RPC balance, history and the send state machine |
//!
//! ## Example
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use wlink::vault::{FileStorage, Vault, VaultConfig};
//! use wlink::{Chain, Session};
//!
//! let vault = Vault::new(FileStorage::open("./wlink-data")?, VaultConfig::default());
//! vault.open("correct horse").await?;
//!
//! // an empty phrase generates a fresh mnemonic
//! let record = Session::new().generate(Chain::Solana, "", "Main")?;
//! println!("{}", record.public_key());
//! vault.add(record).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod derive;
mod error;
mod session;

pub use derive::{derive, path};
pub use error::{Error, Result};
pub use session::Session;

pub use wlink_core::{mnemonic, Chain, KeyPair, Wallet};
pub use wlink_eth as eth;
pub use wlink_sol as sol;
pub use wlink_transfer as transfer;
pub use wlink_vault as vault;
pub use wlink_vault::WalletRecord;
