//! Ethereum wallet support for wlink.
//!
//! Provides BIP-32 secp256k1 address derivation from a unified
//! [`wlink_core::Wallet`], EIP-55 address handling, and signing of legacy
//! EIP-155 value transfers.
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
//! use wlink_eth::Deriver;
//!
//! let wallet = Wallet::from_mnemonic(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     None
//! ).unwrap();
//!
//! let deriver = Deriver::new(&wallet);
//! let addr = deriver.derive(0).unwrap();
//! assert_eq!(addr.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod address;
#[cfg(feature = "alloc")]
mod deriver;
pub mod eip191;
mod error;
#[cfg(feature = "alloc")]
mod signer;
#[cfg(feature = "alloc")]
pub mod transaction;

#[cfg(feature = "alloc")]
pub use address::{parse_address, public_key_to_address, to_checksum_address};
#[cfg(feature = "alloc")]
pub use deriver::{DerivedAddress, Deriver};
pub use error::Error;
#[cfg(feature = "alloc")]
pub use signer::{RecoverableSignature, Signer};

pub use alloy_primitives::Address;

/// A convenient Result type alias for wlink-eth operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Wei per ether.
pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Gas consumed by a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;
