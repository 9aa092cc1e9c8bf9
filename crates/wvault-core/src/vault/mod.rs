//! Vault store, access control and file management.

pub mod access;
pub mod config;
pub mod lock;
pub mod operations;
pub mod session;
pub mod store;

pub use access::{AccessControl, AuthError, Role};
pub use config::{CredentialStorage, MasterKey, MasterKeySource, VaultSettings};
pub use lock::{LockError, VaultLock};
pub use operations::{FileEntry, VaultOperationError, VaultOperations};
pub use session::{Session, View};
pub use store::{VaultCreationError, VaultStore, VaultStoreError};
