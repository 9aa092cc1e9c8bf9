//! Vault store: vault directories and their credential records.
//!
//! Each vault is a directory `<root>/<name>/`. A vault is openable only when
//! the directory holds a member credential record; a bare directory counts as
//! no vault at all.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{self, CredentialError, HashParams};
use crate::fs::{NameError, validate_vault_name, write_atomic};

use super::access::Role;
use super::config::{
    ADMIN_CREDENTIAL_FILE, CredentialStorage, DEFAULT_LOCK_TIMEOUT, MEMBER_CREDENTIAL_FILE,
    VaultSettings,
};
use super::lock::{LockError, with_vault_lock};
use super::operations::VaultOperations;

#[derive(Error, Debug)]
pub enum VaultStoreError {
    #[error("Invalid vault name: {0}")]
    InvalidName(#[from] NameError),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultStoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        VaultStoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors that can occur during vault creation.
#[derive(Error, Debug)]
pub enum VaultCreationError {
    #[error("Vault name and passkey are both required")]
    MissingFields,

    #[error("Vault already exists: {0}")]
    VaultAlreadyExists(String),

    #[error("Failed to derive credential record: {0}")]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Store(#[from] VaultStoreError),
}

/// Credential records of one vault, as read from disk.
pub(crate) struct StoredCredentials {
    pub(crate) member: Zeroizing<String>,
    /// Absent when the record is missing; that tier then matches nothing.
    pub(crate) admin: Option<Zeroizing<String>>,
}

/// Maps vault names to directories under a root folder.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    credential_storage: CredentialStorage,
    hash_params: HashParams,
    lock_timeout: Duration,
}

impl VaultStore {
    /// Open the store at `root`, creating the root directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, VaultStoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| VaultStoreError::io(&root, e))?;
        tracing::debug!("Opened vault store at {}", root.display());

        Ok(Self {
            root,
            credential_storage: CredentialStorage::default(),
            hash_params: HashParams::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    pub fn from_settings(settings: &VaultSettings) -> Result<Self, VaultStoreError> {
        Ok(Self::open(&settings.root)?
            .with_credential_storage(settings.credential_storage)
            .with_hash_params(settings.hash_params)
            .with_lock_timeout(settings.lock_timeout))
    }

    pub fn with_credential_storage(mut self, storage: CredentialStorage) -> Self {
        self.credential_storage = storage;
        self
    }

    pub fn with_hash_params(mut self, params: HashParams) -> Self {
        self.hash_params = params;
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Directory for `name`, without touching the filesystem.
    pub fn vault_path(&self, name: &str) -> Result<PathBuf, VaultStoreError> {
        Ok(self.root.join(validate_vault_name(name)?))
    }

    /// Create the directory for `name` if absent and return it. Idempotent.
    pub fn ensure_vault_directory(&self, name: &str) -> Result<PathBuf, VaultStoreError> {
        let path = self.vault_path(name)?;
        std::fs::create_dir_all(&path).map_err(|e| VaultStoreError::io(&path, e))?;
        Ok(path)
    }

    /// Whether `name` is an openable vault: directory plus member record.
    ///
    /// Names that cannot be vault names are simply not vaults.
    pub fn vault_exists(&self, name: &str) -> bool {
        match self.vault_path(name) {
            Ok(path) => path.is_dir() && path.join(MEMBER_CREDENTIAL_FILE).is_file(),
            Err(_) => false,
        }
    }

    /// Create a vault protected by `passkey` and return the creator's role.
    ///
    /// Both credential records are derived from `passkey`. The admin record
    /// is written first, so an interrupted creation leaves a directory with no
    /// member record, which is still "no vault" rather than a half-made one.
    ///
    /// # Errors
    /// * `VaultCreationError::MissingFields` if `name` or `passkey` is empty;
    ///   nothing is written in that case
    /// * `VaultCreationError::VaultAlreadyExists` if the vault is already openable
    pub fn create_vault(&self, name: &str, passkey: &str) -> Result<Role, VaultCreationError> {
        if name.is_empty() || passkey.is_empty() {
            return Err(VaultCreationError::MissingFields);
        }

        let dir = self.ensure_vault_directory(name)?;

        with_vault_lock(&dir, self.lock_timeout, || {
            let member_path = dir.join(MEMBER_CREDENTIAL_FILE);
            if member_path.is_file() {
                return Err(VaultCreationError::VaultAlreadyExists(name.to_string()));
            }

            let admin_path = dir.join(ADMIN_CREDENTIAL_FILE);
            let admin_record = self.credential_record(passkey)?;
            write_atomic(&admin_path, admin_record.as_bytes())
                .map_err(|e| VaultStoreError::io(&admin_path, e))?;

            let member_record = self.credential_record(passkey)?;
            write_atomic(&member_path, member_record.as_bytes())
                .map_err(|e| VaultStoreError::io(&member_path, e))?;

            tracing::info!(
                vault = name,
                storage = ?self.credential_storage,
                "Created vault"
            );
            Ok(Role::VaultAdmin)
        })
    }

    /// File-management handle for `name`. Does not check that the vault exists.
    pub(crate) fn operations(&self, name: &str) -> Result<VaultOperations, VaultStoreError> {
        let path = self.vault_path(name)?;
        Ok(VaultOperations::new(name, path, self.lock_timeout))
    }

    pub(crate) fn read_credentials(&self, name: &str) -> Result<StoredCredentials, VaultStoreError> {
        let dir = self.vault_path(name)?;

        let member_path = dir.join(MEMBER_CREDENTIAL_FILE);
        let member = std::fs::read_to_string(&member_path)
            .map(Zeroizing::new)
            .map_err(|e| VaultStoreError::io(&member_path, e))?;

        let admin_path = dir.join(ADMIN_CREDENTIAL_FILE);
        let admin = match std::fs::read_to_string(&admin_path) {
            Ok(record) => Some(Zeroizing::new(record)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(vault = name, "Admin credential record missing");
                None
            }
            Err(e) => return Err(VaultStoreError::io(&admin_path, e)),
        };

        Ok(StoredCredentials { member, admin })
    }

    fn credential_record(&self, passkey: &str) -> Result<Zeroizing<String>, CredentialError> {
        match self.credential_storage {
            CredentialStorage::Hashed => {
                crypto::hash_passkey(passkey, self.hash_params).map(Zeroizing::new)
            }
            CredentialStorage::Plaintext => Ok(Zeroizing::new(passkey.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> VaultStore {
        VaultStore::open(temp.path().join("vaults"))
            .unwrap()
            .with_hash_params(HashParams::new(4, 8, 1))
    }

    #[test]
    fn test_open_creates_root() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert!(store.root().is_dir());
    }

    #[test]
    fn test_ensure_vault_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let first = store.ensure_vault_directory("choir").unwrap();
        let second = store.ensure_vault_directory("choir").unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
        // A bare directory is not a vault
        assert!(!store.vault_exists("choir"));
    }

    #[test]
    fn test_ensure_vault_directory_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert!(matches!(
            store.ensure_vault_directory("../outside"),
            Err(VaultStoreError::InvalidName(_))
        ));
        assert!(!temp.path().join("outside").exists());
    }

    #[test]
    fn test_create_vault_writes_both_records() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let role = store.create_vault("choir", "abc123").unwrap();
        assert_eq!(role, Role::VaultAdmin);
        assert!(store.vault_exists("choir"));

        let dir = store.vault_path("choir").unwrap();
        let member = std::fs::read_to_string(dir.join(MEMBER_CREDENTIAL_FILE)).unwrap();
        let admin = std::fs::read_to_string(dir.join(ADMIN_CREDENTIAL_FILE)).unwrap();
        assert!(crypto::is_hashed(&member));
        assert!(crypto::is_hashed(&admin));
        assert!(!member.contains("abc123"));
        assert!(crypto::verify_passkey("abc123", &member).unwrap());
        assert!(crypto::verify_passkey("abc123", &admin).unwrap());
    }

    #[test]
    fn test_create_vault_plaintext_storage() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).with_credential_storage(CredentialStorage::Plaintext);

        store.create_vault("choir", "abc123").unwrap();
        let dir = store.vault_path("choir").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join(MEMBER_CREDENTIAL_FILE)).unwrap(),
            "abc123"
        );
        assert_eq!(
            std::fs::read_to_string(dir.join(ADMIN_CREDENTIAL_FILE)).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_create_vault_missing_fields_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        assert!(matches!(
            store.create_vault("", "abc123"),
            Err(VaultCreationError::MissingFields)
        ));
        assert!(matches!(
            store.create_vault("choir", ""),
            Err(VaultCreationError::MissingFields)
        ));
        assert!(!store.vault_path("choir").unwrap().exists());
    }

    #[test]
    fn test_create_vault_twice_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).with_credential_storage(CredentialStorage::Plaintext);

        store.create_vault("choir", "abc123").unwrap();
        let err = store.create_vault("choir", "hijack").unwrap_err();
        assert!(matches!(err, VaultCreationError::VaultAlreadyExists(ref n) if n == "choir"));

        // Original credentials untouched
        let dir = store.vault_path("choir").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join(MEMBER_CREDENTIAL_FILE)).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_create_vault_over_bare_directory_keeps_files() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let dir = store.ensure_vault_directory("choir").unwrap();
        std::fs::write(dir.join("old.png"), b"png").unwrap();

        store.create_vault("choir", "abc123").unwrap();
        assert!(store.vault_exists("choir"));
        assert_eq!(std::fs::read(dir.join("old.png")).unwrap(), b"png");
    }

    #[test]
    fn test_vault_exists_for_invalid_names() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert!(!store.vault_exists(""));
        assert!(!store.vault_exists(".."));
        assert!(!store.vault_exists("a/b"));
    }

    #[test]
    fn test_read_credentials_without_admin_record() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).with_credential_storage(CredentialStorage::Plaintext);

        store.create_vault("choir", "abc123").unwrap();
        let dir = store.vault_path("choir").unwrap();
        std::fs::remove_file(dir.join(ADMIN_CREDENTIAL_FILE)).unwrap();

        let creds = store.read_credentials("choir").unwrap();
        assert_eq!(creds.member.as_str(), "abc123");
        assert!(creds.admin.is_none());
    }
}
