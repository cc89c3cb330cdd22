//! Native SOL transfer transactions.
//!
//! Builds a legacy message with a single System Program `Transfer`
//! instruction, signs it with the sender keypair and serializes it in the
//! wire format accepted by `sendTransaction`.

use alloc::vec;
use alloc::vec::Vec;

use crate::{Keypair, Pubkey};

/// System Program instruction index for `Transfer`.
const SYSTEM_TRANSFER: u32 = 2;

/// A 32-byte recent blockhash the network uses to bound transaction lifetime.
pub type Blockhash = [u8; 32];

/// A compiled instruction referencing accounts by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    /// Index of the program account.
    pub program_id_index: u8,
    /// Indices of the instruction's accounts.
    pub accounts: Vec<u8>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

/// A legacy transaction message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Number of signatures required (signers lead `account_keys`).
    pub num_required_signatures: u8,
    /// Signed accounts that are read-only.
    pub num_readonly_signed_accounts: u8,
    /// Unsigned accounts that are read-only.
    pub num_readonly_unsigned_accounts: u8,
    /// All accounts referenced by the message.
    pub account_keys: Vec<Pubkey>,
    /// Recent blockhash.
    pub recent_blockhash: Blockhash,
    /// Instructions.
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// A transfer of `lamports` from `from` to `to`, `from` paying the fee.
    #[must_use]
    pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64, recent_blockhash: Blockhash) -> Self {
        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
        data.extend_from_slice(&lamports.to_le_bytes());

        // A self-transfer references the one account twice.
        let (account_keys, accounts) = if from == to {
            (vec![*from, Pubkey::SYSTEM_PROGRAM], vec![0, 0])
        } else {
            (vec![*from, *to, Pubkey::SYSTEM_PROGRAM], vec![0, 1])
        };
        let program_id_index = (account_keys.len() - 1) as u8;

        Self {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
            account_keys,
            recent_blockhash,
            instructions: vec![CompiledInstruction {
                program_id_index,
                accounts,
                data,
            }],
        }
    }

    /// Serialize the message; these are the bytes that get signed.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = vec![
            self.num_required_signatures,
            self.num_readonly_signed_accounts,
            self.num_readonly_unsigned_accounts,
        ];

        encode_length(&mut out, self.account_keys.len());
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&self.recent_blockhash);

        encode_length(&mut out, self.instructions.len());
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_length(&mut out, ix.accounts.len());
            out.extend_from_slice(&ix.accounts);
            encode_length(&mut out, ix.data.len());
            out.extend_from_slice(&ix.data);
        }
        out
    }
}

/// A signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// One signature per required signer.
    pub signatures: Vec<[u8; 64]>,
    /// The signed message.
    pub message: Message,
}

impl Transaction {
    /// Sign a single-signer message.
    #[must_use]
    pub fn sign(message: Message, payer: &Keypair) -> Self {
        let signature = payer.sign_message(&message.serialize());
        Self {
            signatures: vec![signature],
            message,
        }
    }

    /// The first signature, which identifies the transaction on chain.
    #[must_use]
    pub fn signature(&self) -> Option<&[u8; 64]> {
        self.signatures.first()
    }

    /// Serialize to wire format.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let message = self.message.serialize();
        let mut out = Vec::with_capacity(1 + self.signatures.len() * 64 + message.len());
        encode_length(&mut out, self.signatures.len());
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
        out.extend_from_slice(&message);
        out
    }
}

/// Append a compact-u16 length prefix.
fn encode_length(out: &mut Vec<u8>, len: usize) {
    let mut rem = len as u16;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}
