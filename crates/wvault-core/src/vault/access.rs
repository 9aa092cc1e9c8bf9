//! Access control: passkey to role resolution.
//!
//! Resolution order, first match wins:
//!
//! 1. vault not openable -> [`AuthError::VaultNotFound`]
//! 2. master key -> [`Role::MasterAdmin`]
//! 3. admin credential -> [`Role::VaultAdmin`]
//! 4. member credential -> [`Role::Member`]
//! 5. otherwise -> [`AuthError::IncorrectPassword`]
//!
//! All three secrets are always checked, so how long a rejection takes does
//! not reveal which tiers exist. An unreadable member record fails
//! authentication for every key except the master key; an unreadable admin
//! record only disables the admin tier.

use serde::Serialize;
use thiserror::Error;

use crate::crypto::{self, CredentialError};

use super::config::{MasterKey, VaultSettings};
use super::session::Session;
use super::store::{VaultCreationError, VaultStore, VaultStoreError};

/// Capability tier of an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Upload, view and rename.
    Member,
    /// Everything a member can do, plus delete.
    VaultAdmin,
    /// Opened with the master key; same capabilities as a vault admin.
    MasterAdmin,
}

impl Role {
    pub fn can_delete(self) -> bool {
        self.is_admin()
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::VaultAdmin | Role::MasterAdmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Member => "MEMBER",
            Role::VaultAdmin => "VAULT_ADMIN",
            Role::MasterAdmin => "MASTER_ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Vault not found: {0}")]
    VaultNotFound(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Unreadable credential record: {0}")]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Store(#[from] VaultStoreError),
}

/// Resolves passkeys into roles and opens sessions.
#[derive(Debug)]
pub struct AccessControl {
    store: VaultStore,
    master_key: MasterKey,
}

impl AccessControl {
    pub fn new(store: VaultStore, master_key: MasterKey) -> Self {
        Self { store, master_key }
    }

    /// Open the store described by `settings` and take its master key.
    pub fn from_settings(settings: VaultSettings) -> Result<Self, VaultStoreError> {
        let store = VaultStore::from_settings(&settings)?;
        Ok(Self::new(store, settings.master_key))
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Resolve the role `presented_key` grants on `vault_name`.
    pub fn authenticate(&self, vault_name: &str, presented_key: &str) -> Result<Role, AuthError> {
        if !self.store.vault_exists(vault_name) {
            tracing::debug!(vault = vault_name, "Vault not found");
            return Err(AuthError::VaultNotFound(vault_name.to_string()));
        }

        let is_master = self.master_key.matches(presented_key);
        let records = self.check_records(vault_name, presented_key);

        let role = if is_master {
            if let Err(e) = &records {
                tracing::warn!(vault = vault_name, "Master key used over unreadable credentials: {}", e);
            }
            Role::MasterAdmin
        } else {
            match records? {
                (true, _) => Role::VaultAdmin,
                (false, true) => Role::Member,
                (false, false) => {
                    tracing::info!(vault = vault_name, "Rejected incorrect passkey");
                    return Err(AuthError::IncorrectPassword);
                }
            }
        };

        if role == Role::MasterAdmin && self.master_key.is_fallback() {
            tracing::warn!(vault = vault_name, "Vault opened with the built-in default master key");
        }
        tracing::info!(vault = vault_name, role = %role, "Authenticated");
        Ok(role)
    }

    /// Whether `presented_key` matches the admin and member records.
    ///
    /// A malformed admin record disables the admin tier, like a missing one.
    fn check_records(&self, vault_name: &str, presented_key: &str) -> Result<(bool, bool), AuthError> {
        let credentials = self.store.read_credentials(vault_name)?;

        let is_admin = match &credentials.admin {
            Some(record) => crypto::verify_passkey(presented_key, record).unwrap_or_else(|e| {
                tracing::warn!(vault = vault_name, "Ignoring admin credential record: {}", e);
                false
            }),
            None => false,
        };
        let is_member = crypto::verify_passkey(presented_key, &credentials.member)?;

        Ok((is_admin, is_member))
    }

    /// Authenticate and open a session on the vault.
    pub fn open_vault(&self, vault_name: &str, presented_key: &str) -> Result<Session, AuthError> {
        let role = self.authenticate(vault_name, presented_key)?;
        let ops = self.store.operations(vault_name)?;
        Ok(Session::new(ops, role))
    }

    /// Create a vault and open a session on it as its admin.
    pub fn create_vault(&self, vault_name: &str, passkey: &str) -> Result<Session, VaultCreationError> {
        let role = self.store.create_vault(vault_name, passkey)?;
        let ops = self.store.operations(vault_name)?;
        Ok(Session::new(ops, role))
    }
}
