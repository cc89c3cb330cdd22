//! The send state machine.
//!
//! ```text
//! Idle -> Validating -> Building -> Signing -> Broadcasting -> Confirmed
//!             |            |          |             |
//!             +------------+----------+-------------+--> Rejected
//! ```
//!
//! Validation failures (bad amount, bad recipient, balance too low) are
//! warnings: the machine falls back to `Idle` and nothing was signed.
//! Anything after that ends in `Rejected`. Balances are always read from
//! the chain; nothing here keeps a local running balance.

use std::fmt;

use wlink_vault::WalletRecord;

use crate::{Amount, ChainProvider, Error, Result};

/// Where a send currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendState {
    /// Nothing in flight.
    Idle,
    /// Checking amount, recipient and balance.
    Validating,
    /// Fetching blockhash or nonce and gas price.
    Building,
    /// Signing with the wallet's key.
    Signing,
    /// Submitted; waiting for confirmation.
    Broadcasting,
    /// Confirmed on chain.
    Confirmed,
    /// Failed after validation.
    Rejected,
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Building => "building",
            Self::Signing => "signing",
            Self::Broadcasting => "broadcasting",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A confirmed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Signature or transaction hash.
    pub id: String,
    /// Amount sent.
    pub amount: Amount,
    /// Recipient address as given.
    pub to: String,
}

/// Drives one send at a time through [`SendState`].
#[derive(Debug)]
pub struct Sender<'a, P: ?Sized> {
    provider: &'a P,
    state: SendState,
    visited: Vec<SendState>,
}

impl<'a, P: ChainProvider + ?Sized> Sender<'a, P> {
    /// Create an idle sender over `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            state: SendState::Idle,
            visited: Vec::new(),
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SendState {
        self.state
    }

    /// States entered by the last send, in order.
    #[inline]
    #[must_use]
    pub fn visited(&self) -> &[SendState] {
        &self.visited
    }

    /// Send `amount` (a decimal in the display unit) from `record` to `to`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAmount`], [`Error::InvalidAddress`] or
    ///   [`Error::InsufficientBalance`] (warnings; the sender returns to
    ///   [`SendState::Idle`])
    /// - [`Error::InvalidKey`] if the record's key cannot sign for its address
    /// - network, RPC, [`Error::BroadcastRejected`] and
    ///   [`Error::ConfirmationTimeout`] errors. After a timeout the
    ///   transaction may still land.
    pub async fn send(&mut self, record: &WalletRecord, to: &str, amount: &str) -> Result<Receipt> {
        self.visited.clear();
        let result = self.run(record, to, amount).await;
        match &result {
            Ok(receipt) => {
                tracing::info!(chain = %self.provider.chain(), id = %receipt.id, "transfer confirmed");
            }
            Err(err) if err.is_warning() => {
                tracing::warn!(chain = %self.provider.chain(), %err, "transfer not started");
                self.enter(SendState::Idle);
            }
            Err(err) => {
                tracing::warn!(chain = %self.provider.chain(), state = %self.state, %err, "transfer rejected");
                self.enter(SendState::Rejected);
            }
        }
        result
    }

    async fn run(&mut self, record: &WalletRecord, to: &str, amount: &str) -> Result<Receipt> {
        let chain = self.provider.chain();
        let from = record.public_key();

        self.enter(SendState::Validating);
        if record.chain() != chain {
            return Err(Error::InvalidKey(format!(
                "{} wallet cannot send on {chain}",
                record.chain()
            )));
        }
        let amount = Amount::parse(chain, amount)?;
        if amount.is_zero() {
            return Err(Error::InvalidAmount("amount must be greater than zero".into()));
        }
        self.provider.check_address(to)?;
        let balance = self.provider.balance(from).await?;
        if amount.base_units() > balance {
            return Err(Error::InsufficientBalance {
                balance,
                amount: amount.base_units(),
            });
        }

        self.enter(SendState::Building);
        let unsigned = self
            .provider
            .build(from, to, amount.base_units(), balance)
            .await?;

        self.enter(SendState::Signing);
        let signed = self.provider.sign(unsigned, record.secret_key(), from)?;

        self.enter(SendState::Broadcasting);
        let id = self.provider.broadcast(&signed).await?;
        tracing::info!(%chain, %id, %amount, "transfer submitted");
        self.provider.confirm(&id).await?;

        self.enter(SendState::Confirmed);
        Ok(Receipt {
            id,
            amount,
            to: to.to_owned(),
        })
    }

    fn enter(&mut self, state: SendState) {
        tracing::debug!(from = %self.state, to = %state, "send state");
        self.state = state;
        self.visited.push(state);
    }
}
