//! SLIP-0010 Ed25519 key derivation.
//!
//! Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::Error;

type HmacSha512 = Hmac<Sha512>;

const ED25519_CURVE: &[u8] = b"ed25519 seed";

/// BIP-44 purpose.
const PURPOSE: u32 = 44;
/// SLIP-44 coin type for Solana.
const COIN_TYPE: u32 = 501;

/// SLIP-0010 derived key pair.
pub(crate) struct DerivedKey {
    /// 32-byte private key.
    pub private_key: Zeroizing<[u8; 32]>,
    /// 32-byte chain code.
    pub chain_code: Zeroizing<[u8; 32]>,
}

impl DerivedKey {
    /// Derive master key from seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, Error> {
        let mut mac = HmacSha512::new_from_slice(ED25519_CURVE)
            .map_err(|_| Error::InvalidSeedLength(seed.len()))?;
        mac.update(seed);
        Ok(Self::split(&mac.finalize().into_bytes()))
    }

    /// Derive child key at hardened index.
    ///
    /// SLIP-0010 only supports hardened derivation for Ed25519.
    pub fn derive_hardened(&self, index: u32) -> Result<Self, Error> {
        let hardened_index = index | 0x8000_0000;

        let mut mac = HmacSha512::new_from_slice(&*self.chain_code)
            .map_err(|_| Error::InvalidSeedLength(self.chain_code.len()))?;

        // 0x00 || private_key || index
        mac.update(&[0x00]);
        mac.update(&*self.private_key);
        mac.update(&hardened_index.to_be_bytes());

        Ok(Self::split(&mac.finalize().into_bytes()))
    }

    /// Walk a fully hardened path from the master key.
    pub fn derive_path(seed: &[u8], path: &[u32]) -> Result<Self, Error> {
        path.iter()
            .try_fold(Self::from_seed(seed)?, |key, &index| key.derive_hardened(index))
    }

    /// Derive the account key at `m/44'/501'/account'/0'`.
    pub fn derive_account(seed: &[u8], account: u32) -> Result<Self, Error> {
        Self::derive_path(seed, &[PURPOSE, COIN_TYPE, account, 0])
    }

    fn split(output: &[u8]) -> Self {
        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        private_key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..64]);
        Self {
            private_key,
            chain_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_vector() {
        // SLIP-0010 ed25519 test vector 1
        let seed = hex_literal::hex!("000102030405060708090a0b0c0d0e0f");
        let master = DerivedKey::from_seed(&seed).unwrap();

        assert_eq!(
            *master.private_key,
            hex_literal::hex!("2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7")
        );
        assert_eq!(
            *master.chain_code,
            hex_literal::hex!("90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb")
        );
    }

    #[test]
    fn test_hardened_child_vectors() {
        // SLIP-0010 ed25519 test vector 1, chains m/0' and m/0'/1'
        let seed = hex_literal::hex!("000102030405060708090a0b0c0d0e0f");

        let child = DerivedKey::derive_path(&seed, &[0]).unwrap();
        assert_eq!(
            *child.private_key,
            hex_literal::hex!("68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3")
        );
        assert_eq!(
            *child.chain_code,
            hex_literal::hex!("8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69")
        );

        let grandchild = DerivedKey::derive_path(&seed, &[0, 1]).unwrap();
        assert_eq!(
            *grandchild.private_key,
            hex_literal::hex!("b1d0bad404bf35da785a64ca1ac54b2617211d2777696fbffaf208f746ae84f2")
        );
        assert_eq!(
            *grandchild.chain_code,
            hex_literal::hex!("a320425f77d1b5c2505a6b1b27382b37368ee640e3557c315416801243552f14")
        );
    }

    #[test]
    fn test_account_path_matches_manual_walk() {
        let seed = [7u8; 64];
        let direct = DerivedKey::derive_account(&seed, 3).unwrap();
        let walked = DerivedKey::from_seed(&seed)
            .and_then(|k| k.derive_hardened(44))
            .and_then(|k| k.derive_hardened(501))
            .and_then(|k| k.derive_hardened(3))
            .and_then(|k| k.derive_hardened(0))
            .unwrap();

        assert_eq!(*direct.private_key, *walked.private_key);
    }
}
