//! Shared harness for vault integration tests.

#![allow(dead_code)]

use tempfile::TempDir;
use wvault_core::crypto::HashParams;
use wvault_core::vault::{AccessControl, MasterKey, VaultSettings};

pub const MASTER_KEY: &str = "integration-master-key";

/// Cheap scrypt cost so hashed vaults stay fast under test.
pub const TEST_HASH_PARAMS: HashParams = HashParams::new(4, 8, 1);

/// Sample PNG header, enough to pass image sniffing.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";

/// Access control over a fresh temporary root. Keep the `TempDir` alive.
pub fn test_access() -> (TempDir, AccessControl) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let settings = VaultSettings::new(temp_dir.path().join("vaults"), MasterKey::new(MASTER_KEY))
        .with_hash_params(TEST_HASH_PARAMS);
    let access = AccessControl::from_settings(settings).expect("Failed to open vault store");
    (temp_dir, access)
}
