//! Key-value backends holding the vault's persisted strings.
//!
//! The vault stores one blob string per chain plus the gate hash, each under
//! a well-known key. Backends only move strings; they never see plaintext.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wlink_core::Chain;

/// Storage key of the Solana wallet blob.
pub const SOLANA_WALLETS_KEY: &str = "WlinkSolanaWallets";
/// Storage key of the Ethereum wallet blob.
pub const ETHEREUM_WALLETS_KEY: &str = "WlinkEthereumWallets";
/// Storage key of the unlock gate hash.
pub const PASSWORD_KEY: &str = "wLinkSolPass";
/// Default file name for exported backups.
pub const BACKUP_FILE_NAME: &str = "wallets_backup.json";

/// Storage key of `chain`'s wallet blob.
#[must_use]
pub const fn wallets_key(chain: Chain) -> &'static str {
    match chain {
        Chain::Solana => SOLANA_WALLETS_KEY,
        Chain::Ethereum => ETHEREUM_WALLETS_KEY,
    }
}

/// A string key-value store.
///
/// `set` must replace the value atomically: a reader sees either the old or
/// the new string, never a torn write.
pub trait Storage: Send + Sync {
    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the backend cannot be read.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the backend cannot be written.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            ));
        }
        Ok(self.root.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path(key)?;
        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process storage, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory storage poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}
