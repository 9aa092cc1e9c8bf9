//! Library-level configuration for vaults.
//!
//! Everything the vault components need is passed in explicitly through
//! [`VaultSettings`]; nothing is read from ambient process state except by
//! [`MasterKey::resolve`], which callers invoke once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::crypto::HashParams;

/// Default vaults root, relative to the working directory.
pub const DEFAULT_VAULTS_DIR: &str = "vaults";

/// Environment variable holding the master admin key.
pub const MASTER_KEY_ENV: &str = "WVAULT_MASTER_KEY";

/// Master key used when none is configured. Anyone who knows it has admin
/// rights on every vault; deployments must override it.
pub const FALLBACK_MASTER_KEY: &str = "YOUR_MASTER_KEY";

/// Member-level credential record inside each vault directory.
pub const MEMBER_CREDENTIAL_FILE: &str = ".vault_pass";

/// Admin-level credential record inside each vault directory.
pub const ADMIN_CREDENTIAL_FILE: &str = ".admin_pass";

/// Advisory lock file serializing mutations of one vault.
pub const LOCK_FILE: &str = ".lock";

/// Default timeout for acquiring a vault lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// How new credential records are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStorage {
    /// Salted scrypt digest.
    #[default]
    Hashed,
    /// The passkey itself, as older vaults store it.
    Plaintext,
}

/// Where the master key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKeySource {
    Configured,
    Environment,
    Fallback,
}

/// The process-wide master admin key.
#[derive(Debug)]
pub struct MasterKey {
    key: SecretString,
    source: MasterKeySource,
}

impl MasterKey {
    /// Use an explicitly configured key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
            source: MasterKeySource::Configured,
        }
    }

    /// Resolve the master key: `WVAULT_MASTER_KEY`, then `configured`, then
    /// the hardcoded fallback. Empty values count as unset.
    pub fn resolve(configured: Option<String>) -> Self {
        if let Ok(key) = std::env::var(MASTER_KEY_ENV)
            && !key.is_empty()
        {
            return Self {
                key: SecretString::from(key),
                source: MasterKeySource::Environment,
            };
        }

        if let Some(key) = configured.filter(|k| !k.is_empty()) {
            return Self::new(key);
        }

        tracing::warn!(
            "No master key configured (set {} or [security] master_key); \
             using the insecure built-in default",
            MASTER_KEY_ENV
        );
        Self {
            key: SecretString::from(FALLBACK_MASTER_KEY.to_string()),
            source: MasterKeySource::Fallback,
        }
    }

    pub fn source(&self) -> MasterKeySource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == MasterKeySource::Fallback
    }

    /// Constant-time check of a presented key.
    pub fn matches(&self, presented: &str) -> bool {
        crate::crypto::constant_time_eq(presented.as_bytes(), self.key.expose_secret().as_bytes())
    }
}

/// Configuration for the vault store and access control.
#[derive(Debug)]
pub struct VaultSettings {
    pub root: PathBuf,
    pub master_key: MasterKey,
    pub credential_storage: CredentialStorage,
    pub hash_params: HashParams,
    pub lock_timeout: Duration,
}

impl VaultSettings {
    pub fn new(root: impl AsRef<Path>, master_key: MasterKey) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            master_key,
            credential_storage: CredentialStorage::default(),
            hash_params: HashParams::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_matches() {
        let key = MasterKey::new("s3cret");
        assert!(key.matches("s3cret"));
        assert!(!key.matches("s3cre"));
        assert!(!key.matches(""));
        assert_eq!(key.source(), MasterKeySource::Configured);
    }

    #[test]
    fn test_master_key_debug_is_redacted() {
        let key = MasterKey::new("s3cret");
        assert!(!format!("{key:?}").contains("s3cret"));
    }

    #[test]
    fn test_default_settings() {
        let settings = VaultSettings::new(DEFAULT_VAULTS_DIR, MasterKey::new("m"));
        assert_eq!(settings.credential_storage, CredentialStorage::Hashed);
        assert_eq!(settings.hash_params, HashParams::default());
        assert_eq!(settings.lock_timeout, DEFAULT_LOCK_TIMEOUT);
    }

    #[test]
    fn test_settings_builder() {
        let settings = VaultSettings::new("/tmp/vaults", MasterKey::new("m"))
            .with_credential_storage(CredentialStorage::Plaintext)
            .with_hash_params(HashParams::new(4, 8, 1))
            .with_lock_timeout(Duration::from_millis(10));
        assert_eq!(settings.root, PathBuf::from("/tmp/vaults"));
        assert_eq!(settings.credential_storage, CredentialStorage::Plaintext);
        assert_eq!(settings.hash_params.log_n, 4);
        assert_eq!(settings.lock_timeout, Duration::from_millis(10));
    }
}
