//! Balances, history and native transfers for wlink wallets.
//!
//! Network access goes through the [`RpcClient`] trait so the providers and
//! the [`Sender`] state machine can run against any JSON-RPC endpoint or a
//! test double.
//!
//! # Usage
//!
//! ```no_run
//! # async fn run(record: wlink_vault::WalletRecord) -> wlink_transfer::Result<()> {
//! use std::time::Duration;
//! use wlink_transfer::{HttpRpcClient, Sender, SolanaProvider};
//!
//! let client = HttpRpcClient::new("https://api.devnet.solana.com", Duration::from_secs(30))?;
//! let provider = SolanaProvider::new(client);
//!
//! let mut sender = Sender::new(&provider);
//! let receipt = sender
//!     .send(&record, "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", "0.01")
//!     .await?;
//! println!("sent {} in {}", receipt.amount, receipt.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod amount;
mod error;
pub mod ethereum;
mod provider;
mod rpc;
mod sender;
pub mod solana;

pub use amount::Amount;
pub use error::{Error, Result};
pub use ethereum::EthereumProvider;
pub use provider::{ChainProvider, HistoryEntry, PollConfig};
pub use rpc::{HttpRpcClient, RpcClient};
pub use sender::{Receipt, SendState, Sender};
pub use solana::{Commitment, SolanaProvider};
