//! EIP-191 personal message hashing.

use alloy_primitives::Keccak256;

/// Compute the EIP-191 hash of a personal message.
///
/// Hashes `"\x19Ethereum Signed Message:\n" || len(message) || message`
/// where the length is written in decimal.
#[must_use]
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let (len_buf, len_used) = format_usize(message.len());

    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(&len_buf[..len_used]);
    hasher.update(message);
    hasher.finalize().0
}

/// Decimal digits of `n`, left-aligned in a fixed buffer.
fn format_usize(mut n: usize) -> ([u8; 20], usize) {
    let mut buf = [0u8; 20];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    let len = buf.len() - i;
    buf.copy_within(i.., 0);
    (buf, len)
}
