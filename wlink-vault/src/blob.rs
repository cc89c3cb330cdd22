//! Text form of one encryption: `hex(salt):hex(iv):hex(ciphertext)`.
//!
//! Blobs sealed with an integrity tag carry a fourth `:hex(tag)` segment.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Initial counter block length in bytes.
pub const IV_LEN: usize = 16;
/// HMAC-SHA256 tag length in bytes.
pub const TAG_LEN: usize = 32;

/// Output of a single [`encrypt`](crate::cipher::encrypt) call.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// KDF salt, fresh per call.
    pub salt: [u8; SALT_LEN],
    /// Initial counter block, fresh per call.
    pub iv: [u8; IV_LEN],
    /// AES-256-CTR ciphertext, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Optional HMAC-SHA256 over `salt || iv || ciphertext`.
    pub tag: Option<[u8; TAG_LEN]>,
}

impl EncryptedBlob {
    /// Bytes covered by the integrity tag.
    pub(crate) fn authenticated_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(SALT_LEN + IV_LEN + self.ciphertext.len());
        data.extend_from_slice(&self.salt);
        data.extend_from_slice(&self.iv);
        data.extend_from_slice(&self.ciphertext);
        data
    }
}

impl fmt::Display for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.salt),
            hex::encode(self.iv),
            hex::encode(&self.ciphertext)
        )?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", hex::encode(tag))?;
        }
        Ok(())
    }
}

impl fmt::Debug for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedBlob")
            .field("salt", &hex::encode(self.salt))
            .field("iv", &hex::encode(self.iv))
            .field("ciphertext_len", &self.ciphertext.len())
            .field("tagged", &self.tag.is_some())
            .finish()
    }
}

impl FromStr for EncryptedBlob {
    type Err = Error;

    /// Any malformed segment is reported as [`Error::DecryptionFailure`]:
    /// to the caller an unreadable file and a wrong password look alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let (salt, iv, ciphertext, tag) = match parts.as_slice() {
            [salt, iv, ct] => (salt, iv, ct, None),
            [salt, iv, ct, tag] => (salt, iv, ct, Some(tag)),
            _ => return Err(Error::DecryptionFailure),
        };

        let mut blob = Self {
            salt: [0u8; SALT_LEN],
            iv: [0u8; IV_LEN],
            ciphertext: hex::decode(ciphertext).map_err(|_| Error::DecryptionFailure)?,
            tag: None,
        };
        hex::decode_to_slice(salt, &mut blob.salt).map_err(|_| Error::DecryptionFailure)?;
        hex::decode_to_slice(iv, &mut blob.iv).map_err(|_| Error::DecryptionFailure)?;
        if let Some(tag) = tag {
            let mut out = [0u8; TAG_LEN];
            hex::decode_to_slice(tag, &mut out).map_err(|_| Error::DecryptionFailure)?;
            blob.tag = Some(out);
        }
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncryptedBlob {
        EncryptedBlob {
            salt: [0x11; SALT_LEN],
            iv: [0x22; IV_LEN],
            ciphertext: vec![0xde, 0xad, 0xbe, 0xef],
            tag: None,
        }
    }

    #[test]
    fn test_text_form() {
        assert_eq!(
            sample().to_string(),
            "11111111111111111111111111111111:22222222222222222222222222222222:deadbeef"
        );
    }

    #[test]
    fn test_parse_three_and_four_segments() {
        let plain = sample();
        assert_eq!(plain.to_string().parse::<EncryptedBlob>().unwrap(), plain);

        let tagged = EncryptedBlob {
            tag: Some([0x33; TAG_LEN]),
            ..sample()
        };
        let text = tagged.to_string();
        assert_eq!(text.split(':').count(), 4);
        assert_eq!(text.parse::<EncryptedBlob>().unwrap(), tagged);
    }

    #[test]
    fn test_parse_tolerates_trailing_newline() {
        let text = format!("{}\n", sample());
        assert_eq!(text.parse::<EncryptedBlob>().unwrap(), sample());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "",
            "not a blob",
            "11:22:33",
            "11111111111111111111111111111111:22222222222222222222222222222222:zz",
            "[{\"walletName\":\"W1\"}]",
            "a:b:c:d:e",
        ] {
            assert!(
                matches!(bad.parse::<EncryptedBlob>(), Err(Error::DecryptionFailure)),
                "{bad:?} parsed"
            );
        }
    }

    #[test]
    fn test_empty_ciphertext() {
        let text = format!("{}:{}:", "00".repeat(SALT_LEN), "00".repeat(IV_LEN));
        let blob: EncryptedBlob = text.parse().unwrap();
        assert!(blob.ciphertext.is_empty());
    }
}
