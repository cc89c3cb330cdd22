//! Core wallet types for the wlink multi-chain wallet.
//!
//! This crate provides the unified [`Wallet`] type that holds a BIP39 mnemonic
//! and the seed derived from it, the [`Chain`] tag shared by every other crate,
//! and the chain-agnostic [`KeyPair`] produced by the chain derivers.
//!
//! # Example
//!
//! ```
//! use wlink_core::{mnemonic, Wallet};
//!
//! // Generate a new wallet
//! let wallet = Wallet::generate(12, None)?;
//! assert!(mnemonic::validate(wallet.mnemonic()));
//!
//! // The same mnemonic always yields the same seed
//! let again = Wallet::from_mnemonic(wallet.mnemonic(), None)?;
//! assert_eq!(wallet.seed(), again.seed());
//! # Ok::<(), wlink_core::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod chain;
mod error;
#[cfg(feature = "alloc")]
mod keypair;
#[cfg(feature = "alloc")]
pub mod mnemonic;
#[cfg(feature = "alloc")]
mod wallet;

pub use chain::{Chain, ParseChainError};
pub use error::Error;
#[cfg(feature = "alloc")]
pub use keypair::KeyPair;
#[cfg(feature = "alloc")]
pub use wallet::Wallet;

/// Length in bytes of a BIP39 seed.
pub const SEED_LEN: usize = 64;
