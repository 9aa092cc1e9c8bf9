//! Advisory per-vault locking.
//!
//! Mutations of a vault directory (vault creation, save, rename, delete) run
//! while holding an exclusive `fs2` lock on `<vault>/.lock`, so concurrent
//! processes working on the same vault are serialized. Reads take no lock.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

use super::config::LOCK_FILE;

/// How long to sleep between lock attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum LockError {
    #[error(
        "Timed out after {waited:?} waiting for vault lock {}; another process may be holding it",
        .path.display()
    )]
    Timeout { path: PathBuf, waited: Duration },

    #[error("Failed to lock {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Held exclusive lock on a vault directory. Released on drop.
#[derive(Debug)]
pub struct VaultLock {
    file: File,
    path: PathBuf,
}

impl VaultLock {
    /// Acquire the lock for `vault_dir`, polling until `timeout` elapses.
    pub fn acquire(vault_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = vault_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Io {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => break,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    let waited = start.elapsed();
                    if waited > timeout {
                        return Err(LockError::Timeout { path, waited });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(source) => return Err(LockError::Io { path, source }),
            }
        }

        tracing::trace!("Acquired vault lock {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release vault lock {}: {}", self.path.display(), e);
        }
    }
}

/// Run `f` while holding the lock for `vault_dir`.
pub fn with_vault_lock<F, R, E>(vault_dir: &Path, timeout: Duration, f: F) -> Result<R, E>
where
    F: FnOnce() -> Result<R, E>,
    E: From<LockError>,
{
    let _guard = VaultLock::acquire(vault_dir, timeout)?;
    f()
}
