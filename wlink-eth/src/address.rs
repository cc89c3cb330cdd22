//! Ethereum address encoding and validation.

use alloc::string::String;

use alloy_primitives::{keccak256, Address};

use crate::Error;

/// Render an address in EIP-55 mixed-case checksum form.
#[must_use]
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_slice());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - i % 2))) & 0xf;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Address of a secp256k1 public key: the last 20 bytes of
/// `keccak256(x || y)`. A leading `0x04` SEC1 tag is skipped.
#[must_use]
pub fn public_key_to_address(public_key: &[u8]) -> Address {
    let xy = match public_key {
        [0x04, rest @ ..] if rest.len() == 64 => rest,
        other => other,
    };
    Address::from_slice(&keccak256(xy)[12..])
}

/// Parse a `0x`-prefixed hex address.
///
/// All-lowercase and all-uppercase inputs are accepted as-is; mixed-case
/// inputs must carry a valid EIP-55 checksum.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] on bad length, non-hex digits or a
/// checksum mismatch.
pub fn parse_address(s: &str) -> Result<Address, Error> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(Error::InvalidAddress)?;
    if digits.len() != 40 {
        return Err(Error::InvalidAddress);
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| Error::InvalidAddress)?;
    let address = Address::from(bytes);

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum_address(&address)[2..] != *digits {
        return Err(Error::InvalidAddress);
    }
    Ok(address)
}
