//! Password-based AES-256-CTR sealing.
//!
//! The key is PBKDF2-HMAC-SHA256 over the raw password with a fresh 16-byte
//! salt (100,000 iterations, 32-byte output). The 16-byte IV is the initial
//! counter block; the low 64 bits count, big-endian.
//!
//! Plain blobs carry no MAC: decrypting with the wrong password returns
//! garbage, and callers detect it by validating the plaintext structure.
//! With [`VaultConfig::authenticate`] set, a tag is appended and checked.

use aes::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::blob::{EncryptedBlob, IV_LEN, SALT_LEN};
use crate::{Error, Result, VaultConfig};

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;
/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

/// Domain label for the integrity subkey.
const MAC_LABEL: &[u8] = b"wlink-vault/integrity";

type Aes256Ctr64 = ctr::Ctr64BE<aes::Aes256>;
type Aes256Ctr128 = ctr::Ctr128BE<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Stretch the raw password into an encryption key.
///
/// Deterministic in `(password, salt)`. This is the only place the vault
/// password feeds a cipher; the unlock check uses
/// [`hash_for_gate_check`](crate::gate::hash_for_gate_check) instead.
#[must_use]
pub fn derive_encryption_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, KDF_ITERATIONS, key.as_mut());
    key
}

/// Encrypt `plaintext` under `password` without an integrity tag.
///
/// # Errors
///
/// See [`encrypt_with`].
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<EncryptedBlob> {
    encrypt_with(plaintext, password, &VaultConfig::default())
}

/// Encrypt `plaintext` under `password`, tagging the blob when the config
/// asks for it.
///
/// # Errors
///
/// Fails only if the integrity MAC cannot be keyed.
pub fn encrypt_with(
    plaintext: &[u8],
    password: &str,
    config: &VaultConfig,
) -> Result<EncryptedBlob> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let key = derive_encryption_key(password, &salt);
    let mut ciphertext = plaintext.to_vec();
    Aes256Ctr64::new((&*key).into(), (&iv).into()).apply_keystream(&mut ciphertext);

    let mut blob = EncryptedBlob {
        salt,
        iv,
        ciphertext,
        tag: None,
    };
    if config.authenticate {
        let mut mac = integrity_mac(&key)?;
        mac.update(&blob.authenticated_data());
        blob.tag = Some(mac.finalize().into_bytes().into());
    }
    Ok(blob)
}

/// Decrypt a blob with `password`.
///
/// # Errors
///
/// Only a tagged blob can fail here, with [`Error::DecryptionFailure`] when
/// its tag does not verify. An untagged blob always "decrypts".
pub fn decrypt(blob: &EncryptedBlob, password: &str) -> Result<Zeroizing<Vec<u8>>> {
    let key = derive_encryption_key(password, &blob.salt);

    if let Some(tag) = &blob.tag {
        let mut mac = integrity_mac(&key)?;
        mac.update(&blob.authenticated_data());
        mac.verify_slice(tag).map_err(|_| Error::DecryptionFailure)?;
    }

    let mut plaintext = Zeroizing::new(blob.ciphertext.clone());
    Aes256Ctr64::new((&*key).into(), (&blob.iv).into()).apply_keystream(&mut plaintext);
    Ok(plaintext)
}

/// HMAC keyed with a subkey of the encryption key.
fn integrity_mac(key: &[u8; KEY_LEN]) -> Result<HmacSha256> {
    let mut derive =
        <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| Error::DecryptionFailure)?;
    derive.update(MAC_LABEL);
    let subkey = Zeroizing::new(derive.finalize().into_bytes());
    <HmacSha256 as Mac>::new_from_slice(&subkey).map_err(|_| Error::DecryptionFailure)
}

/// A single secret key sealed in the legacy per-key format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedKey {
    /// Ciphertext as hex.
    pub encrypted: String,
    /// KDF salt as hex.
    pub salt: String,
    /// Initial counter block as hex.
    pub nonce: String,
}

/// Seal a hex-encoded secret key.
///
/// Uses the same KDF as the vault but a full 128-bit counter, and stores
/// the three parts separately rather than as one blob string.
///
/// # Errors
///
/// [`Error::MissingCredential`] for an empty key or password,
/// [`Error::MalformedBackup`] if the key is not hex.
pub fn seal_secret_key(secret_hex: &str, password: &str) -> Result<SealedKey> {
    if secret_hex.is_empty() {
        return Err(Error::MissingCredential("private key"));
    }
    if password.is_empty() {
        return Err(Error::MissingCredential("password"));
    }
    let mut bytes = Zeroizing::new(
        hex::decode(secret_hex).map_err(|e| Error::invalid_wallet(format!("secret key: {e}")))?,
    );

    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_encryption_key(password, &salt);
    Aes256Ctr128::new((&*key).into(), (&nonce).into()).apply_keystream(&mut bytes);

    Ok(SealedKey {
        encrypted: hex::encode(bytes.as_slice()),
        salt: hex::encode(salt),
        nonce: hex::encode(nonce),
    })
}

/// Open a [`SealedKey`], returning the secret key as hex.
///
/// As with untagged blobs, a wrong password yields a wrong key rather than
/// an error.
///
/// # Errors
///
/// [`Error::DecryptionFailure`] if any part is not valid hex or the nonce
/// is not 16 bytes.
pub fn open_secret_key(sealed: &SealedKey, password: &str) -> Result<Zeroizing<String>> {
    let salt = hex::decode(&sealed.salt).map_err(|_| Error::DecryptionFailure)?;
    let mut nonce = [0u8; IV_LEN];
    hex::decode_to_slice(&sealed.nonce, &mut nonce).map_err(|_| Error::DecryptionFailure)?;
    let mut bytes =
        Zeroizing::new(hex::decode(&sealed.encrypted).map_err(|_| Error::DecryptionFailure)?);

    let key = derive_encryption_key(password, &salt);
    Aes256Ctr128::new((&*key).into(), (&nonce).into()).apply_keystream(&mut bytes);
    Ok(Zeroizing::new(hex::encode(bytes.as_slice())))
}
