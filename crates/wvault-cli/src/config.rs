//! Configuration file support for the wvault CLI.
//!
//! Configuration is read from `$WVAULT_CONFIG_DIR/config.toml` when that
//! variable is set, else from `~/.config/wvault/config.toml` (XDG) or
//! `~/Library/Application Support/com.worship.wvault/config.toml` on macOS.
//! A missing file means defaults.
//!
//! # Example configuration
//!
//! ```toml
//! [defaults]
//! root = "/srv/vaults"
//! credential_storage = "hashed"
//! lock_timeout_secs = 5
//! verbosity = 1
//!
//! [security]
//! master_key = "change-me"
//! scrypt_log_n = 15
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use wvault_core::crypto::{HashParams, MAX_LOG_N};
use wvault_core::vault::config::{DEFAULT_LOCK_TIMEOUT, DEFAULT_VAULTS_DIR};
use wvault_core::vault::{CredentialStorage, MasterKey, VaultSettings};

/// Overrides the directory holding `config.toml`.
pub const CONFIG_DIR_ENV: &str = "WVAULT_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default settings applied to all commands
    #[serde(default)]
    pub defaults: Defaults,

    /// Master key and credential hashing
    #[serde(default)]
    pub security: Security,
}

/// Default settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Directory holding the vaults
    pub root: Option<PathBuf>,

    /// How new credential records are written (hashed, plaintext)
    pub credential_storage: Option<CredentialStorage>,

    /// Seconds to wait for another process holding a vault lock
    pub lock_timeout_secs: Option<u64>,

    /// Default verbosity level (0-3)
    pub verbosity: Option<u8>,
}

/// Security settings. No `Debug`: holds the master key.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Security {
    /// Master admin key; `WVAULT_MASTER_KEY` takes precedence
    pub master_key: Option<String>,

    /// scrypt cost (log2 N) for new credential records
    pub scrypt_log_n: Option<u8>,
}

impl Config {
    /// Load configuration from the default path, or return defaults if absent.
    pub fn load() -> Result<Self> {
        let path = config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if let Some(log_n) = config.security.scrypt_log_n
            && log_n > MAX_LOG_N
        {
            anyhow::bail!("security.scrypt_log_n = {log_n} is above the maximum of {MAX_LOG_N}");
        }
        Ok(config)
    }

    /// Library settings from this config, with `root_override` (from
    /// `--root` / `WVAULT_ROOT`) taking precedence over `defaults.root`.
    pub fn vault_settings(&self, root_override: Option<PathBuf>) -> VaultSettings {
        let root = root_override
            .or_else(|| self.defaults.root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VAULTS_DIR));

        let master_key = MasterKey::resolve(self.security.master_key.clone());

        let mut hash_params = HashParams::default();
        if let Some(log_n) = self.security.scrypt_log_n {
            hash_params.log_n = log_n;
        }

        let lock_timeout = self
            .defaults
            .lock_timeout_secs
            .map_or(DEFAULT_LOCK_TIMEOUT, Duration::from_secs);

        VaultSettings::new(root, master_key)
            .with_credential_storage(self.defaults.credential_storage.unwrap_or_default())
            .with_hash_params(hash_params)
            .with_lock_timeout(lock_timeout)
    }
}

/// Get the path to the configuration file.
///
/// Uses `WVAULT_CONFIG_DIR` if set, else the XDG config directory on Linux
/// and Application Support on macOS.
pub fn config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir).join(CONFIG_FILE));
    }

    let base_dirs = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

    #[cfg(target_os = "macos")]
    {
        let config_dir = base_dirs
            .home_dir()
            .join("Library/Application Support/com.worship.wvault");
        Ok(config_dir.join(CONFIG_FILE))
    }

    #[cfg(not(target_os = "macos"))]
    {
        let config_dir = base_dirs.config_dir().join("wvault");
        Ok(config_dir.join(CONFIG_FILE))
    }
}
