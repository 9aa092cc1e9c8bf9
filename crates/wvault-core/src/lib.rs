//! Passkey-gated file vaults.
//!
//! A vault is a directory under a configured root holding user files plus two
//! credential records. [`vault::AccessControl`] resolves a presented passkey
//! into a [`vault::Role`] and hands out a [`vault::Session`] scoped to that
//! vault; file management goes through the session so the role gate on
//! deletion is always applied.
//!
//! ```no_run
//! use wvault_core::vault::{AccessControl, MasterKey, VaultSettings};
//!
//! let settings = VaultSettings::new("vaults", MasterKey::resolve(None));
//! let access = AccessControl::from_settings(settings)?;
//!
//! let session = access.create_vault("choir", "abc123")?;
//! session.save_file("setlist.pdf", b"%PDF-1.7")?;
//! assert_eq!(session.list_files()?, vec!["setlist.pdf".to_string()]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod crypto;
pub mod error;
pub mod fs;
pub mod vault;

pub use error::{AuthError, VaultCreationError, VaultOperationError};
pub use vault::{AccessControl, Role, Session, VaultOperations, VaultSettings};
