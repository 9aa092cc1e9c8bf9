//! Exit codes for the CLI.
//!
//! These follow common Unix conventions and let scripts tell apart the ways
//! opening or changing a vault can fail.

/// Successful execution
pub const SUCCESS: u8 = 0;

/// General/unspecified error
pub const GENERAL_ERROR: u8 = 1;

/// Command-line usage error (bad arguments, invalid vault or file name)
pub const USAGE_ERROR: u8 = 2;

/// Passkey matched no credential
pub const AUTH_FAILED: u8 = 3;

/// No vault with that name
pub const VAULT_NOT_FOUND: u8 = 4;

/// Role may not perform the operation, or filesystem access denied
pub const PERMISSION_DENIED: u8 = 5;

/// Vault already exists
pub const ALREADY_EXISTS: u8 = 6;

/// File not found inside the vault
pub const NOT_FOUND: u8 = 7;

/// Operation cancelled or interrupted
pub const CANCELLED: u8 = 8;
