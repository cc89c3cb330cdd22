//! Legacy (EIP-155) value transfers.
//!
//! A transfer is encoded as the RLP list
//! `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`; before signing
//! the last three items are `[chainId, 0, 0]`.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address};

use crate::{Error, Signer, TRANSFER_GAS_LIMIT};

/// An unsigned legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Sender account nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient.
    pub to: Address,
    /// Value in wei.
    pub value: u128,
    /// Call data.
    pub data: Vec<u8>,
    /// EIP-155 chain id.
    pub chain_id: u64,
}

impl Transaction {
    /// A plain value transfer with the standard 21000 gas limit.
    #[must_use]
    pub fn transfer(to: Address, value: u128, nonce: u64, gas_price: u128, chain_id: u64) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit: TRANSFER_GAS_LIMIT,
            to,
            value,
            data: Vec::new(),
            chain_id,
        }
    }

    /// Maximum fee this transaction can burn, in wei.
    #[must_use]
    pub fn max_fee(&self) -> u128 {
        self.gas_price.saturating_mul(u128::from(self.gas_limit))
    }

    /// Hash signed by the sender (EIP-155).
    #[must_use]
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut items = self.base_items();
        items.push(rlp_encode_u64(self.chain_id));
        items.push(rlp_encode_u64(0));
        items.push(rlp_encode_u64(0));
        keccak256(rlp_encode_list(&items)).0
    }

    /// Sign with the sender's key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signature`] if signing fails.
    pub fn sign(self, signer: &Signer) -> Result<SignedTransaction, Error> {
        let sig = signer.sign_hash(&self.signing_hash())?;
        let v = self.chain_id * 2 + 35 + u64::from(sig.recovery_id);
        Ok(SignedTransaction {
            tx: self,
            v,
            r: sig.r,
            s: sig.s,
        })
    }

    fn base_items(&self) -> Vec<Vec<u8>> {
        vec![
            rlp_encode_u64(self.nonce),
            rlp_encode_u128(self.gas_price),
            rlp_encode_u64(self.gas_limit),
            rlp_encode_bytes(self.to.as_slice()),
            rlp_encode_u128(self.value),
            rlp_encode_bytes(&self.data),
        ]
    }
}

/// A signed legacy transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The transaction that was signed.
    pub tx: Transaction,
    /// `chain_id * 2 + 35 + recovery_id`.
    pub v: u64,
    /// Signature `r`.
    pub r: [u8; 32],
    /// Signature `s`.
    pub s: [u8; 32],
}

impl SignedTransaction {
    /// RLP-encoded raw transaction.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut items = self.tx.base_items();
        items.push(rlp_encode_u64(self.v));
        items.push(rlp_encode_bytes(trim_leading_zeros(&self.r)));
        items.push(rlp_encode_bytes(trim_leading_zeros(&self.s)));
        rlp_encode_list(&items)
    }

    /// Raw transaction as `0x`-prefixed hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut out = String::from("0x");
        out.push_str(&hex::encode(self.to_bytes()));
        out
    }

    /// Transaction hash, as the network will report it.
    #[must_use]
    pub fn tx_hash(&self) -> [u8; 32] {
        keccak256(self.to_bytes()).0
    }
}

fn rlp_encode_u64(value: u64) -> Vec<u8> {
    rlp_encode_u128(u128::from(value))
}

fn rlp_encode_u128(value: u128) -> Vec<u8> {
    if value == 0 {
        return vec![0x80];
    }
    let bytes = value.to_be_bytes();
    rlp_encode_bytes(trim_leading_zeros(&bytes))
}

fn rlp_encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return vec![bytes[0]];
    }
    let mut out = rlp_header(0x80, bytes.len());
    out.extend_from_slice(bytes);
    out
}

fn rlp_encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = items.iter().map(Vec::len).sum();
    let mut out = rlp_header(0xc0, total);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// String (`0x80`) or list (`0xc0`) header for a payload of `len` bytes.
fn rlp_header(offset: u8, len: usize) -> Vec<u8> {
    if len <= 55 {
        return vec![offset + len as u8];
    }
    let len_bytes = (len as u64).to_be_bytes();
    let len_bytes = trim_leading_zeros(&len_bytes);
    let mut out = Vec::with_capacity(1 + len_bytes.len() + len);
    out.push(offset + 55 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
    out
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}
