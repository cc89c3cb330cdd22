//! Backup payload decoding and restore merge.
//!
//! A backup decrypts to either a flat array of records (single-chain
//! backups) or an object keyed by chain name. Both are decoded in full
//! before anything is merged, so a bad element rejects the whole file.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use wlink_core::Chain;
use zeroize::Zeroizing;

use crate::{EncryptedBlob, Error, Result, WalletRecord};

/// Records of a decoded backup, grouped by chain.
pub type ChainRecords = BTreeMap<Chain, Vec<WalletRecord>>;

/// New records appended per chain by an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    added: BTreeMap<Chain, usize>,
}

impl MergeResult {
    /// Records added for `chain`.
    #[must_use]
    pub fn added(&self, chain: Chain) -> usize {
        self.added.get(&chain).copied().unwrap_or(0)
    }

    /// Records added across all chains.
    #[must_use]
    pub fn total(&self) -> usize {
        self.added.values().sum()
    }

    /// Whether the import changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub(crate) fn record(&mut self, chain: Chain, count: usize) {
        *self.added.entry(chain).or_default() += count;
    }
}

impl fmt::Display for MergeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for chain in Chain::ALL {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{} {chain}", self.added(chain))?;
        }
        Ok(())
    }
}

/// Decode decrypted backup bytes.
///
/// # Errors
///
/// - [`Error::DecryptionFailure`] if the bytes are not JSON (wrong password
///   or a corrupt file)
/// - [`Error::MalformedBackup`] with "invalid backup structure" if the JSON
///   is neither an array nor an object of known chains to arrays
/// - [`Error::MalformedBackup`] with "invalid wallet data" if any element is
///   not a complete record, or sits under the wrong chain
pub fn decode(plaintext: &[u8]) -> Result<ChainRecords> {
    let value: Value = serde_json::from_slice(plaintext).map_err(|_| Error::DecryptionFailure)?;

    let mut out = ChainRecords::new();
    match value {
        Value::Array(items) => {
            for item in items {
                let record = parse_record(item)?;
                out.entry(record.chain()).or_default().push(record);
            }
        }
        Value::Object(map) => {
            for (key, items) in map {
                let chain: Chain = key.parse().map_err(|_| Error::invalid_structure())?;
                let Value::Array(items) = items else {
                    return Err(Error::invalid_structure());
                };
                let records = out.entry(chain).or_default();
                for item in items {
                    let record = parse_record(item)?;
                    if record.chain() != chain {
                        return Err(Error::invalid_wallet(format!(
                            "{} record under `{key}`",
                            record.chain()
                        )));
                    }
                    records.push(record);
                }
            }
        }
        _ => return Err(Error::invalid_structure()),
    }
    Ok(out)
}

fn parse_record(item: Value) -> Result<WalletRecord> {
    if !item.is_object() {
        return Err(Error::invalid_wallet("element is not an object"));
    }
    serde_json::from_value(item).map_err(Error::invalid_wallet)
}

/// Encode the multi-chain backup object `{chain: [records...]}`.
pub(crate) fn encode(records: &ChainRecords) -> Result<Zeroizing<Vec<u8>>> {
    let object: BTreeMap<&str, &Vec<WalletRecord>> = records
        .iter()
        .map(|(chain, list)| (chain.name(), list))
        .collect();
    Ok(Zeroizing::new(serde_json::to_vec(&object)?))
}

/// Append the records of `incoming` whose secret key is not yet in
/// `existing`, in order. Returns how many were appended.
///
/// Only `secretKey` identifies a wallet here; names and addresses may repeat.
pub fn merge(existing: &mut Vec<WalletRecord>, incoming: Vec<WalletRecord>) -> usize {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|record| record.secret_key().to_owned())
        .collect();
    let before = existing.len();
    for record in incoming {
        if seen.insert(record.secret_key().to_owned()) {
            existing.push(record);
        }
    }
    existing.len() - before
}

/// Write a backup blob to `path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_file(path: impl AsRef<Path>, blob: &EncryptedBlob) -> io::Result<()> {
    fs::write(path, blob.to_string())
}

/// Read a backup blob from `path`.
///
/// # Errors
///
/// [`Error::Storage`] if the file cannot be read, [`Error::DecryptionFailure`]
/// if it does not hold a blob.
pub fn read_file(path: impl AsRef<Path>) -> Result<EncryptedBlob> {
    fs::read_to_string(path)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chain: &str, name: &str, secret: &str) -> Value {
        serde_json::json!({
            "type": chain,
            "walletName": name,
            "mnemonic": "abandon",
            "publicKey": format!("pub-{secret}"),
            "secretKey": secret,
        })
    }

    fn records(values: Vec<Value>) -> Vec<WalletRecord> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_decode_flat_array() {
        let json = serde_json::to_vec(&vec![
            record("solana", "A", "aa"),
            record("Ethereum", "B", "bb"),
        ])
        .unwrap();
        let decoded = decode(&json).unwrap();
        assert_eq!(decoded[&Chain::Solana].len(), 1);
        assert_eq!(decoded[&Chain::Ethereum].len(), 1);
    }

    #[test]
    fn test_decode_object() {
        let json = serde_json::to_vec(&serde_json::json!({
            "solana": [record("solana", "A", "aa")],
            "ethereum": [record("ethereum", "B", "bb"), record("ethereum", "C", "cc")],
        }))
        .unwrap();
        let decoded = decode(&json).unwrap();
        assert_eq!(decoded[&Chain::Solana].len(), 1);
        assert_eq!(decoded[&Chain::Ethereum].len(), 2);
        assert_eq!(decoded[&Chain::Ethereum][1].wallet_name(), "C");
    }

    #[test]
    fn test_decode_not_json() {
        assert!(matches!(decode(b"\x01\xffnope"), Err(Error::DecryptionFailure)));
    }

    #[test]
    fn test_decode_wrong_shape() {
        for bad in [
            &b"42"[..],
            b"\"text\"",
            b"null",
            b"{\"bitcoin\": []}",
            b"{\"solana\": {}}",
        ] {
            match decode(bad) {
                Err(Error::MalformedBackup(msg)) => assert_eq!(msg, "invalid backup structure"),
                other => panic!("{other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_bad_element_rejects_everything() {
        let mut incomplete = record("solana", "B", "bb");
        incomplete.as_object_mut().unwrap().remove("mnemonic");
        let json = serde_json::to_vec(&vec![record("solana", "A", "aa"), incomplete]).unwrap();
        match decode(&json) {
            Err(Error::MalformedBackup(msg)) => assert!(msg.starts_with("invalid wallet data")),
            other => panic!("{other:?}"),
        }

        let json = serde_json::to_vec(&vec![serde_json::json!(7)]).unwrap();
        assert!(matches!(decode(&json), Err(Error::MalformedBackup(_))));
    }

    #[test]
    fn test_decode_chain_mismatch() {
        let json = serde_json::to_vec(&serde_json::json!({
            "solana": [record("ethereum", "A", "aa")],
        }))
        .unwrap();
        assert!(matches!(decode(&json), Err(Error::MalformedBackup(_))));
    }

    #[test]
    fn test_encode_decode() {
        let mut grouped = ChainRecords::new();
        grouped.insert(Chain::Solana, records(vec![record("solana", "A", "aa")]));
        grouped.insert(Chain::Ethereum, records(vec![record("ethereum", "B", "bb")]));

        let bytes = encode(&grouped).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value.get("solana").is_some());
        assert!(value.get("ethereum").is_some());
        assert_eq!(decode(&bytes).unwrap(), grouped);
    }

    #[test]
    fn test_merge_by_secret_key() {
        let mut existing = records(vec![record("solana", "A", "aa")]);
        let incoming = records(vec![
            record("solana", "renamed", "aa"),
            record("solana", "B", "bb"),
            record("solana", "B again", "bb"),
        ]);
        assert_eq!(merge(&mut existing, incoming), 1);
        assert_eq!(existing.len(), 2);
        assert_eq!(existing[0].wallet_name(), "A");
        assert_eq!(existing[1].wallet_name(), "B");
    }

    #[test]
    fn test_merge_idempotent() {
        let backup = records(vec![record("solana", "A", "aa"), record("solana", "B", "bb")]);
        let mut vault = Vec::new();
        assert_eq!(merge(&mut vault, backup.clone()), 2);
        assert_eq!(merge(&mut vault, backup.clone()), 0);
        assert_eq!(vault, backup);
    }

    #[test]
    fn test_merge_result_counts() {
        let mut result = MergeResult::default();
        assert!(result.is_empty());
        result.record(Chain::Ethereum, 1);
        result.record(Chain::Solana, 0);
        assert_eq!(result.added(Chain::Solana), 0);
        assert_eq!(result.added(Chain::Ethereum), 1);
        assert_eq!(result.total(), 1);
        assert_eq!(result.to_string(), "0 solana, 1 ethereum");
    }

    #[test]
    fn test_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::BACKUP_FILE_NAME);
        let blob = crate::cipher::encrypt(b"[]", "pw").unwrap();
        write_file(&path, &blob).unwrap();
        assert_eq!(read_file(&path).unwrap(), blob);

        fs::write(&path, "{\"plain\": true}").unwrap();
        assert!(matches!(read_file(&path), Err(Error::DecryptionFailure)));
    }
}
