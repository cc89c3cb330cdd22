//! Unlock gate: a one-way password hash compared on open.
//!
//! Kept apart from [`derive_encryption_key`](crate::cipher::derive_encryption_key):
//! the stored gate string never feeds the cipher, and the cipher key is
//! never stored.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::blob::SALT_LEN;
use crate::cipher::KDF_ITERATIONS;

const HASH_LEN: usize = 32;
const GATE_LABEL: &[u8] = b"wlink-gate:";

/// Hash `password` for storage under the gate key, as
/// `hex(salt):hex(hash)`.
#[must_use]
pub fn hash_for_gate_check(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let hash = gate_hash(password, &salt);
    format!("{}:{}", hex::encode(salt), hex::encode(hash))
}

/// Compare `password` against a stored gate string in constant time.
///
/// An unreadable stored string never matches.
#[must_use]
pub fn verify_gate(password: &str, stored: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.trim().split_once(':') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };
    if expected.len() != HASH_LEN {
        return false;
    }
    gate_hash(password, &salt)[..].ct_eq(&expected).into()
}

fn gate_hash(password: &str, salt: &[u8]) -> [u8; HASH_LEN] {
    let mut labelled = Vec::with_capacity(GATE_LABEL.len() + salt.len());
    labelled.extend_from_slice(GATE_LABEL);
    labelled.extend_from_slice(salt);

    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &labelled, KDF_ITERATIONS, &mut out);
    out
}
