//! Native asset amounts.
//!
//! Amounts travel as base units (`u128`): lamports for SOL, wei for ETH.
//! User input is a plain decimal in the display unit and is parsed exactly,
//! without going through floating point.

use core::fmt;

use wlink_core::Chain;

use crate::{Error, Result};

/// An amount of a chain's native asset in base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    chain: Chain,
    base_units: u128,
}

impl Amount {
    /// Create from base units.
    #[must_use]
    pub const fn new(chain: Chain, base_units: u128) -> Self {
        Self { chain, base_units }
    }

    /// Parse a display-unit decimal such as `"0.25"`.
    ///
    /// # Errors
    ///
    /// See [`parse_units`].
    pub fn parse(chain: Chain, input: &str) -> Result<Self> {
        Ok(Self::new(chain, parse_units(input, chain.decimals())?))
    }

    /// The chain this amount is denominated in.
    #[inline]
    #[must_use]
    pub const fn chain(&self) -> Chain {
        self.chain
    }

    /// Raw base units.
    #[inline]
    #[must_use]
    pub const fn base_units(&self) -> u128 {
        self.base_units
    }

    /// Whether this is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.base_units == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            format_units(self.base_units, self.chain.decimals()),
            self.chain.symbol()
        )
    }
}

/// Parse a non-negative decimal into base units with `decimals` places.
///
/// Accepts `"1"`, `"1.5"`, `".5"` and `"1."`. Surrounding whitespace is
/// ignored.
///
/// # Errors
///
/// [`Error::InvalidAmount`] for signs, exponents, stray characters, more
/// fractional digits than `decimals`, or a value that overflows `u128`.
pub fn parse_units(input: &str, decimals: u32) -> Result<u128> {
    let input = input.trim();
    let invalid = || Error::InvalidAmount(format!("`{input}` is not a decimal number"));

    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidAmount(format!(
            "`{input}` has more than {decimals} decimal places"
        )));
    }

    let overflow = || Error::InvalidAmount(format!("`{input}` is too large"));
    let scale = 10u128.checked_pow(decimals).ok_or_else(overflow)?;
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let fraction: u128 = if fraction.is_empty() {
        0
    } else {
        let padding = 10u128.pow(decimals - fraction.len() as u32);
        fraction.parse::<u128>().map_err(|_| overflow())? * padding
    };

    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(overflow)
}

/// Format base units as a display-unit decimal with trailing zeros removed.
#[must_use]
pub fn format_units(value: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1", 9).unwrap(), 1_000_000_000);
        assert_eq!(parse_units("0.5", 9).unwrap(), 500_000_000);
        assert_eq!(parse_units(".25", 9).unwrap(), 250_000_000);
        assert_eq!(parse_units("2.", 9).unwrap(), 2_000_000_000);
        assert_eq!(parse_units(" 0.000000001 ", 9).unwrap(), 1);
        assert_eq!(parse_units("0", 18).unwrap(), 0);
        assert_eq!(
            parse_units("1.000000000000000001", 18).unwrap(),
            1_000_000_000_000_000_001
        );
    }

    #[test]
    fn test_parse_units_rejects() {
        for bad in ["", ".", "-1", "+1", "1e9", "1,5", "abc", "1.2.3", "0x10"] {
            assert!(
                matches!(parse_units(bad, 9), Err(Error::InvalidAmount(_))),
                "{bad}"
            );
        }
        assert!(parse_units("0.0000000001", 9).is_err());
        assert!(parse_units("999999999999999999999999999999999999999", 18).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(0, 9), "0");
        assert_eq!(format_units(1_500_000_000, 9), "1.5");
        assert_eq!(format_units(1, 9), "0.000000001");
        assert_eq!(format_units(3_000_000_000_000_000_000, 18), "3");
    }

    #[test]
    fn test_amount_display() {
        let sol = Amount::parse(Chain::Solana, "1.25").unwrap();
        assert_eq!(sol.base_units(), 1_250_000_000);
        assert_eq!(sol.to_string(), "1.25 SOL");

        let eth = Amount::new(Chain::Ethereum, 10u128.pow(15));
        assert_eq!(eth.to_string(), "0.001 ETH");
        assert!(!eth.is_zero());
        assert!(Amount::new(Chain::Ethereum, 0).is_zero());
    }
}
