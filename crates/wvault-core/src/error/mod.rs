//! Error types for vault operations.
//!
//! Each component defines its own error enum next to the code that raises it;
//! they are collected here so callers can match on them from one place.

pub use crate::crypto::CredentialError;
pub use crate::fs::NameError;
pub use crate::vault::access::AuthError;
pub use crate::vault::lock::LockError;
pub use crate::vault::operations::VaultOperationError;
pub use crate::vault::store::{VaultCreationError, VaultStoreError};
