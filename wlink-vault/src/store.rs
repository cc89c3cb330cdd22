//! The wallet vault: per-chain record lists sealed at rest.
//!
//! A [`Vault`] is opened with the password, which is checked against the
//! stored gate hash (or becomes it, on first open) and then held for the
//! session until [`Vault::lock`]. Every mutation is one full
//! read-decrypt-modify-encrypt-write cycle under the write half of a
//! [`RwLock`], so writers are serialized and readers never observe a cycle
//! in progress.

use std::io;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wlink_core::Chain;
use zeroize::Zeroizing;

use crate::backup::{self, ChainRecords, MergeResult};
use crate::record::{encode_list, parse_list};
use crate::storage::{wallets_key, PASSWORD_KEY};
use crate::{cipher, gate, EncryptedBlob, Error, Result, Storage, VaultConfig, WalletRecord};

/// A sealed list waiting to be written, with the value it replaces.
struct PendingWrite {
    key: &'static str,
    previous: Option<String>,
    value: String,
}

/// Unlocked session state.
struct Session {
    password: Zeroizing<String>,
}

/// A password-sealed wallet vault over an injected [`Storage`].
pub struct Vault<S> {
    storage: S,
    config: VaultConfig,
    session: RwLock<Option<Session>>,
}

impl<S: Storage> Vault<S> {
    /// A locked vault over `storage`.
    pub fn new(storage: S, config: VaultConfig) -> Self {
        Self {
            storage,
            config,
            session: RwLock::new(None),
        }
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether a gate hash has been stored, i.e. the vault was opened before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the backend cannot be read.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.storage.get(PASSWORD_KEY)?.is_some())
    }

    /// Whether the vault is open.
    pub async fn is_open(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Open the vault.
    ///
    /// On first open the password's gate hash is stored; afterwards the
    /// password must match it.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] for an empty password
    /// - [`Error::WrongPassword`] if the gate check fails
    /// - [`Error::Storage`] if the backend fails
    pub async fn open(&self, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(Error::MissingCredential("password"));
        }
        let mut session = self.session.write().await;
        let candidate = Zeroizing::new(password.to_owned());

        match self.storage.get(PASSWORD_KEY)? {
            Some(stored) => {
                let pw = candidate.clone();
                if !blocking(move || gate::verify_gate(&pw, &stored)).await? {
                    warn!("vault unlock rejected");
                    return Err(Error::WrongPassword);
                }
            }
            None => {
                let pw = candidate.clone();
                let hash = blocking(move || gate::hash_for_gate_check(&pw)).await?;
                self.storage.set(PASSWORD_KEY, &hash)?;
                info!("vault password set");
            }
        }

        *session = Some(Session {
            password: candidate,
        });
        debug!("vault opened");
        Ok(())
    }

    /// Drop the session password. Later calls fail with [`Error::Locked`]
    /// until the vault is opened again.
    pub async fn lock(&self) {
        *self.session.write().await = None;
        debug!("vault locked");
    }

    /// Append a record to its chain's list. Returns the new list length.
    ///
    /// # Errors
    ///
    /// [`Error::Locked`], or any error from reading or writing the list.
    pub async fn add(&self, record: WalletRecord) -> Result<usize> {
        let session = self.session.write().await;
        let password = unlocked(&session)?;
        let chain = record.chain();

        let mut records = self.load(chain, password).await?;
        records.push(record);
        self.save(chain, &records, password).await?;

        info!(%chain, count = records.len(), "wallet added");
        Ok(records.len())
    }

    /// Decrypt and return `chain`'s records in insertion order.
    ///
    /// An empty list is returned when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// [`Error::Locked`], [`Error::DecryptionFailure`] if the stored blob
    /// does not decrypt to a record list, or [`Error::Storage`].
    pub async fn list(&self, chain: Chain) -> Result<Vec<WalletRecord>> {
        let session = self.session.read().await;
        let password = unlocked(&session)?;
        self.load(chain, password).await
    }

    /// Remove the record at `index` in `chain`'s list and return it.
    ///
    /// Indices are positions, so later records shift down by one.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchWallet`] if `index` is out of range, or as for
    /// [`Vault::add`].
    pub async fn delete(&self, chain: Chain, index: usize) -> Result<WalletRecord> {
        let session = self.session.write().await;
        let password = unlocked(&session)?;

        let mut records = self.load(chain, password).await?;
        if index >= records.len() {
            return Err(Error::NoSuchWallet { chain, index });
        }
        let removed = records.remove(index);
        self.save(chain, &records, password).await?;

        info!(%chain, index, remaining = records.len(), "wallet deleted");
        Ok(removed)
    }

    /// Seal the records of `chains` into one backup blob under the vault
    /// password, with its own fresh salt and IV.
    ///
    /// # Errors
    ///
    /// As for [`Vault::list`].
    pub async fn export(&self, chains: &[Chain]) -> Result<EncryptedBlob> {
        let session = self.session.read().await;
        let password = unlocked(&session)?;

        let mut grouped = ChainRecords::new();
        for &chain in chains {
            grouped.insert(chain, self.load(chain, password).await?);
        }
        let plaintext = backup::encode(&grouped)?;
        let blob = self.seal(plaintext, password).await?;

        info!(
            chains = grouped.len(),
            wallets = grouped.values().map(Vec::len).sum::<usize>(),
            "backup exported"
        );
        Ok(blob)
    }

    /// Restore a backup sealed under `password`, merging by secret key.
    ///
    /// Records whose secret key is already present are skipped, so
    /// importing the same backup again changes nothing. The backup is
    /// decoded in full before any list is written.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] for an empty password
    /// - [`Error::DecryptionFailure`] for a wrong password or corrupt file
    /// - [`Error::MalformedBackup`] for a bad shape or record
    /// - [`Error::Locked`], or storage errors
    pub async fn import(&self, blob: &EncryptedBlob, password: &str) -> Result<MergeResult> {
        if password.is_empty() {
            return Err(Error::MissingCredential("password"));
        }
        let session = self.session.write().await;
        let vault_password = unlocked(&session)?;

        let sealed = blob.clone();
        let pw = Zeroizing::new(password.to_owned());
        let plaintext = blocking(move || cipher::decrypt(&sealed, &pw)).await??;
        let incoming = backup::decode(&plaintext)?;

        let mut result = MergeResult::default();
        let mut pending = Vec::new();
        for (chain, records) in incoming {
            let key = wallets_key(chain);
            let previous = self.storage.get(key)?;
            let mut merged = self.load(chain, vault_password).await?;
            let added = backup::merge(&mut merged, records);
            result.record(chain, added);
            if added > 0 {
                let sealed = self.seal(encode_list(&merged)?, vault_password).await?;
                pending.push(PendingWrite {
                    key,
                    previous,
                    value: sealed.to_string(),
                });
            }
        }
        self.write_all(&pending)?;

        info!(%result, "backup imported");
        Ok(result)
    }

    /// Apply `writes` in order. If one fails, the keys already written are
    /// put back to their previous values before the error is returned.
    fn write_all(&self, writes: &[PendingWrite]) -> Result<()> {
        for (done, write) in writes.iter().enumerate() {
            if let Err(err) = self.storage.set(write.key, &write.value) {
                for applied in writes[..done].iter().rev() {
                    let restored = match &applied.previous {
                        Some(value) => self.storage.set(applied.key, value),
                        None => self.storage.remove(applied.key),
                    };
                    if let Err(rollback) = restored {
                        warn!(key = applied.key, %rollback, "could not restore wallet list");
                    }
                }
                warn!(key = write.key, %err, "import write failed, rolled back");
                return Err(err.into());
            }
        }
        Ok(())
    }

    async fn load(&self, chain: Chain, password: &Zeroizing<String>) -> Result<Vec<WalletRecord>> {
        let Some(stored) = self.storage.get(wallets_key(chain))? else {
            return Ok(Vec::new());
        };
        let blob: EncryptedBlob = stored.parse()?;
        let pw = password.clone();
        let plaintext = blocking(move || cipher::decrypt(&blob, &pw)).await??;
        parse_list(&plaintext)
    }

    async fn save(
        &self,
        chain: Chain,
        records: &[WalletRecord],
        password: &Zeroizing<String>,
    ) -> Result<()> {
        let blob = self.seal(encode_list(records)?, password).await?;
        self.storage.set(wallets_key(chain), &blob.to_string())?;
        debug!(%chain, count = records.len(), "wallet list written");
        Ok(())
    }

    async fn seal(
        &self,
        plaintext: Zeroizing<Vec<u8>>,
        password: &Zeroizing<String>,
    ) -> Result<EncryptedBlob> {
        let pw = password.clone();
        let config = self.config;
        blocking(move || cipher::encrypt_with(&plaintext, &pw, &config)).await?
    }
}

impl<S> std::fmt::Debug for Vault<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn unlocked(session: &Option<Session>) -> Result<&Zeroizing<String>> {
    session
        .as_ref()
        .map(|s| &s.password)
        .ok_or(Error::Locked)
}

/// Run CPU-bound key stretching off the async workers.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Storage(io::Error::new(io::ErrorKind::Other, e)))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::MemoryStorage;
    use wlink_core::KeyPair;

    fn sample(chain: Chain, name: &str, secret: &str) -> WalletRecord {
        let pair = KeyPair {
            chain,
            public_key: format!("pub-{secret}"),
            secret_key: Zeroizing::new(secret.to_owned()),
        };
        WalletRecord::new(name, "abandon about", pair).unwrap()
    }

    async fn open_vault() -> Vault<MemoryStorage> {
        let vault = Vault::new(MemoryStorage::new(), VaultConfig::default());
        vault.open("correct").await.unwrap();
        vault
    }

    #[tokio::test]
    async fn test_locked_by_default() {
        let vault = Vault::new(MemoryStorage::new(), VaultConfig::default());
        assert!(!vault.is_open().await);
        assert!(matches!(vault.list(Chain::Solana).await, Err(Error::Locked)));
        assert!(matches!(
            vault.add(sample(Chain::Solana, "W1", "aa")).await,
            Err(Error::Locked)
        ));
    }

    #[tokio::test]
    async fn test_open_sets_then_checks_gate() {
        let vault = Vault::new(MemoryStorage::new(), VaultConfig::default());
        assert!(!vault.is_initialized().unwrap());
        assert!(matches!(vault.open("").await, Err(Error::MissingCredential(_))));

        vault.open("correct").await.unwrap();
        assert!(vault.is_initialized().unwrap());
        vault.lock().await;
        assert!(!vault.is_open().await);

        assert!(matches!(vault.open("wrong").await, Err(Error::WrongPassword)));
        assert!(!vault.is_open().await);
        vault.open("correct").await.unwrap();
        assert!(vault.is_open().await);
    }

    #[tokio::test]
    async fn test_add_list_delete() {
        let vault = open_vault().await;
        assert!(vault.list(Chain::Solana).await.unwrap().is_empty());

        assert_eq!(vault.add(sample(Chain::Solana, "W1", "aa")).await.unwrap(), 1);
        assert_eq!(vault.add(sample(Chain::Solana, "W2", "bb")).await.unwrap(), 2);
        assert_eq!(vault.add(sample(Chain::Ethereum, "E1", "cc")).await.unwrap(), 1);

        let sol = vault.list(Chain::Solana).await.unwrap();
        assert_eq!(
            sol.iter().map(WalletRecord::wallet_name).collect::<Vec<_>>(),
            ["W1", "W2"]
        );

        let removed = vault.delete(Chain::Solana, 0).await.unwrap();
        assert_eq!(removed.wallet_name(), "W1");
        let sol = vault.list(Chain::Solana).await.unwrap();
        assert_eq!(sol.len(), 1);
        assert_eq!(sol[0].wallet_name(), "W2");
        assert_eq!(vault.list(Chain::Ethereum).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let vault = open_vault().await;
        vault.add(sample(Chain::Solana, "W1", "aa")).await.unwrap();
        let err = vault.delete(Chain::Solana, 1).await.unwrap_err();
        assert!(matches!(err, Error::NoSuchWallet { index: 1, .. }));
        assert!(err.is_warning());
        assert_eq!(vault.list(Chain::Solana).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blob_rewritten_with_fresh_salt() {
        let vault = open_vault().await;
        vault.add(sample(Chain::Solana, "W1", "aa")).await.unwrap();
        let first = vault.storage().get(wallets_key(Chain::Solana)).unwrap().unwrap();
        vault.add(sample(Chain::Solana, "W2", "bb")).await.unwrap();
        let second = vault.storage().get(wallets_key(Chain::Solana)).unwrap().unwrap();

        let a: EncryptedBlob = first.parse().unwrap();
        let b: EncryptedBlob = second.parse().unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.iv, b.iv);
        assert!(!second.contains("W2"));
    }

    #[tokio::test]
    async fn test_corrupt_list_is_not_empty_list() {
        let vault = open_vault().await;
        let garbage = cipher::encrypt(b"not json", "correct").unwrap();
        vault
            .storage()
            .set(wallets_key(Chain::Solana), &garbage.to_string())
            .unwrap();
        assert!(matches!(
            vault.list(Chain::Solana).await,
            Err(Error::DecryptionFailure)
        ));
    }

    /// Memory storage whose `set` fails once, on a chosen call.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        sets: AtomicUsize,
        fail_at: AtomicUsize,
    }

    impl FlakyStorage {
        fn fail_next_but_one(&self) {
            let sets = self.sets.load(Ordering::SeqCst);
            self.fail_at.store(sets + 2, Ordering::SeqCst);
        }
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> io::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> io::Result<()> {
            let call = self.sets.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_at.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> io::Result<()> {
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn test_failed_import_write_leaves_vault_unchanged() {
        let source = open_vault().await;
        source.add(sample(Chain::Solana, "W2", "bb")).await.unwrap();
        source.add(sample(Chain::Ethereum, "E1", "cc")).await.unwrap();
        let blob = source.export(&Chain::ALL).await.unwrap();

        let vault = Vault::new(FlakyStorage::default(), VaultConfig::default());
        vault.open("correct").await.unwrap();
        vault.add(sample(Chain::Solana, "W1", "aa")).await.unwrap();
        let sol_before = vault.storage().get(wallets_key(Chain::Solana)).unwrap();

        // the first list is written, the second write fails
        vault.storage().fail_next_but_one();
        let err = vault.import(&blob, "correct").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(!err.is_warning());

        assert_eq!(vault.storage().get(wallets_key(Chain::Solana)).unwrap(), sol_before);
        assert_eq!(vault.storage().get(wallets_key(Chain::Ethereum)).unwrap(), None);
        let sol = vault.list(Chain::Solana).await.unwrap();
        assert_eq!(sol.len(), 1);
        assert_eq!(sol[0].wallet_name(), "W1");
        assert!(vault.list(Chain::Ethereum).await.unwrap().is_empty());

        // the same backup goes through once the storage recovers
        let merged = vault.import(&blob, "correct").await.unwrap();
        assert_eq!(merged.added(Chain::Solana), 1);
        assert_eq!(merged.added(Chain::Ethereum), 1);
    }

    #[tokio::test]
    async fn test_authenticated_vault() {
        let vault = Vault::new(MemoryStorage::new(), VaultConfig { authenticate: true });
        vault.open("correct").await.unwrap();
        vault.add(sample(Chain::Solana, "W1", "aa")).await.unwrap();

        let stored = vault.storage().get(wallets_key(Chain::Solana)).unwrap().unwrap();
        assert_eq!(stored.split(':').count(), 4);
        assert_eq!(vault.list(Chain::Solana).await.unwrap().len(), 1);
    }
}
