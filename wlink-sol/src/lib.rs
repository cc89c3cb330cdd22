//! Solana wallet support for wlink.
//!
//! Provides SLIP-0010 ed25519 key derivation from a [`wlink_core::Wallet`]
//! seed, keypair reconstruction from stored secret keys, base58 address
//! handling and the wire encoding of native SOL transfers.
//!
//! # Features
//!
//! - `std` (default): Enable standard library support
//! - `alloc`: Enable heap allocation without full std (for `no_std` environments)
//!
//! # Usage
//!
//! ```
//! use wlink_core::Wallet;
//! use wlink_sol::Deriver;
//!
//! let wallet = Wallet::from_mnemonic(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     None
//! ).unwrap();
//!
//! let deriver = Deriver::new(&wallet);
//! let addr = deriver.derive(0).unwrap();
//! assert_eq!(addr.path, "m/44'/501'/0'/0'");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod address;
#[cfg(feature = "alloc")]
mod deriver;
mod error;
#[cfg(feature = "alloc")]
mod keypair;
mod slip10;
#[cfg(feature = "alloc")]
pub mod transaction;

#[cfg(feature = "alloc")]
pub use address::Pubkey;
#[cfg(feature = "alloc")]
pub use deriver::{DerivedAddress, Deriver};
pub use error::Error;
#[cfg(feature = "alloc")]
pub use keypair::{verify_message, Keypair};

/// A convenient Result type alias for wlink-sol operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
