//! File management scoped to one vault directory.
//!
//! [`VaultOperations`] performs no role checks; [`super::Session`] gates the
//! operations that need them. Mutations hold the vault lock, reads do not.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::fs::preview::SNIFF_LEN;
use crate::fs::{Gallery, GalleryItem, NameError, PreviewKind, RESERVED_PREFIX, validate_file_name, write_atomic};

use super::access::Role;
use super::lock::{LockError, with_vault_lock};

#[derive(Error, Debug)]
pub enum VaultOperationError {
    #[error("Invalid file name: {0}")]
    InvalidName(#[from] NameError),

    #[error("File not found in vault '{vault}': {name}")]
    FileNotFound { vault: String, name: String },

    #[error("Permission denied: {role} cannot {action}")]
    PermissionDenied { role: Role, action: &'static str },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultOperationError {
    fn io(path: &Path, source: io::Error) -> Self {
        VaultOperationError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A stored file with its size, for long listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

/// File operations on a single vault.
#[derive(Debug, Clone)]
pub struct VaultOperations {
    vault_name: String,
    vault_path: PathBuf,
    lock_timeout: Duration,
}

impl VaultOperations {
    pub(crate) fn new(vault_name: &str, vault_path: PathBuf, lock_timeout: Duration) -> Self {
        Self {
            vault_name: vault_name.to_string(),
            vault_path,
            lock_timeout,
        }
    }

    pub fn vault_name(&self) -> &str {
        &self.vault_name
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }

    /// Names of the stored files, sorted case-insensitively.
    ///
    /// Only regular files are listed. Names starting with the reserved prefix
    /// (credential records, the lock file, in-flight uploads) are skipped, as
    /// are names that are not valid UTF-8.
    pub fn list_files(&self) -> Result<Vec<String>, VaultOperationError> {
        Ok(self
            .list_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Like [`list_files`](Self::list_files), with file sizes.
    pub fn list_entries(&self) -> Result<Vec<FileEntry>, VaultOperationError> {
        let dir = &self.vault_path;
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir).map_err(|e| VaultOperationError::io(dir, e))? {
            let entry = entry.map_err(|e| VaultOperationError::io(dir, e))?;
            let Some(file_type) = skip_vanished(&entry.path(), entry.file_type())? else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!("Skipping non-UTF-8 name in {}", dir.display());
                continue;
            };
            if name.starts_with(RESERVED_PREFIX) {
                continue;
            }

            let Some(metadata) = skip_vanished(&entry.path(), entry.metadata())? else {
                continue;
            };
            entries.push(FileEntry {
                name,
                size: metadata.len(),
            });
        }

        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        tracing::debug!(vault = %self.vault_name, count = entries.len(), "Listed files");
        Ok(entries)
    }

    /// Store `contents` under `name`, replacing any file of that name.
    pub fn save_file(&self, name: &str, contents: &[u8]) -> Result<(), VaultOperationError> {
        let path = self.file_path(name)?;

        with_vault_lock(&self.vault_path, self.lock_timeout, || {
            write_atomic(&path, contents).map_err(|e| VaultOperationError::io(&path, e))
        })?;

        tracing::debug!(vault = %self.vault_name, file = name, bytes = contents.len(), "Saved file");
        Ok(())
    }

    /// Full content of `name`.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, VaultOperationError> {
        let path = self.existing_file(name)?;
        fs::read(&path).map_err(|e| self.not_found_or_io(name, &path, e))
    }

    /// Rename `old` to `new`, replacing any file named `new`.
    ///
    /// Returns `false` without touching anything when `old` is not a stored file.
    pub fn rename_file(&self, old: &str, new: &str) -> Result<bool, VaultOperationError> {
        let from = self.file_path(old)?;
        let to = self.file_path(new)?;

        with_vault_lock(&self.vault_path, self.lock_timeout, || {
            if !is_regular_file(&from) {
                tracing::debug!(vault = %self.vault_name, file = old, "Rename source not found");
                return Ok(false);
            }
            fs::rename(&from, &to).map_err(|e| VaultOperationError::io(&from, e))?;
            tracing::debug!(vault = %self.vault_name, "Renamed {} -> {}", old, new);
            Ok(true)
        })
    }

    /// Remove `name`. Returns `false` when it is not a stored file.
    pub fn delete_file(&self, name: &str) -> Result<bool, VaultOperationError> {
        let path = self.file_path(name)?;

        with_vault_lock(&self.vault_path, self.lock_timeout, || {
            if !is_regular_file(&path) {
                return Ok(false);
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(vault = %self.vault_name, file = name, "Deleted file");
                    Ok(true)
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(VaultOperationError::io(&path, e)),
            }
        })
    }

    /// Gallery view of the vault, in listing order.
    ///
    /// Image files are confirmed by their header bytes; one that cannot be
    /// read or recognized is marked unavailable rather than failing the view.
    pub fn gallery(&self) -> Result<Gallery, VaultOperationError> {
        let items = self
            .list_files()?
            .into_iter()
            .map(|name| {
                let kind = match PreviewKind::for_file_name(&name) {
                    PreviewKind::Image => match self.read_head(&name) {
                        Ok(head) => PreviewKind::for_content(&name, &head),
                        Err(e) => {
                            tracing::debug!(vault = %self.vault_name, file = %name, "Preview unavailable: {}", e);
                            PreviewKind::Unavailable
                        }
                    },
                    kind => kind,
                };
                GalleryItem { name, kind }
            })
            .collect();

        Ok(Gallery { items })
    }

    /// Path of `name` inside the vault, after validation.
    fn file_path(&self, name: &str) -> Result<PathBuf, VaultOperationError> {
        Ok(self.vault_path.join(validate_file_name(name)?))
    }

    fn existing_file(&self, name: &str) -> Result<PathBuf, VaultOperationError> {
        let path = self.file_path(name)?;
        if is_regular_file(&path) {
            Ok(path)
        } else {
            Err(self.file_not_found(name))
        }
    }

    fn read_head(&self, name: &str) -> Result<Vec<u8>, VaultOperationError> {
        let path = self.existing_file(name)?;
        let file = fs::File::open(&path).map_err(|e| self.not_found_or_io(name, &path, e))?;

        let mut head = Vec::with_capacity(SNIFF_LEN);
        file.take(SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .map_err(|e| VaultOperationError::io(&path, e))?;
        Ok(head)
    }

    fn file_not_found(&self, name: &str) -> VaultOperationError {
        VaultOperationError::FileNotFound {
            vault: self.vault_name.clone(),
            name: name.to_string(),
        }
    }

    fn not_found_or_io(&self, name: &str, path: &Path, e: io::Error) -> VaultOperationError {
        if e.kind() == io::ErrorKind::NotFound {
            self.file_not_found(name)
        } else {
            VaultOperationError::io(path, e)
        }
    }
}

/// `None` for an entry deleted by another process since `read_dir` saw it.
fn skip_vanished<T>(path: &Path, result: io::Result<T>) -> Result<Option<T>, VaultOperationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Entry vanished during listing: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(VaultOperationError::io(path, e)),
    }
}

/// Regular file, not following symlinks.
fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.is_file())
}
