//! File-level helpers: name validation, atomic writes, preview classification.

pub mod name;
pub mod preview;

use std::io::{self, Write};
use std::path::Path;

pub use name::{NameContext, NameError, RESERVED_PREFIX, validate_file_name, validate_vault_name};
pub use preview::{Gallery, GalleryItem, IMAGE_EXTENSIONS, PreviewKind};

/// Write `contents` to `target` atomically.
///
/// The bytes go to a temporary file in the same directory (hidden by the
/// reserved prefix), which is then renamed over `target`. Readers see either
/// the old content or the new, never a partial write.
pub fn write_atomic(target: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "target has no parent"))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".upload-")
        .tempfile_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a.png");

        write_atomic(&target, b"first").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"first");

        write_atomic(&target, b"second").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"second");

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("a.png")]);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("missing").join("a.png");
        let err = write_atomic(&target, b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
