//! Per-user session on an open vault.

use super::access::Role;
use super::operations::{FileEntry, VaultOperationError, VaultOperations};
use crate::fs::Gallery;

/// Which view of the vault is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// File listing with upload, rename and delete.
    #[default]
    Vault,
    /// Image grid.
    Gallery,
}

/// An authenticated session: the open vault, the role it was opened with and
/// the current view. Dropping or [closing](Session::close) it returns home.
#[derive(Debug)]
pub struct Session {
    ops: VaultOperations,
    role: Role,
    view: View,
}

impl Session {
    pub(crate) fn new(ops: VaultOperations, role: Role) -> Self {
        tracing::debug!(vault = ops.vault_name(), role = %role, "Session opened");
        Self {
            ops,
            role,
            view: View::default(),
        }
    }

    pub fn vault_name(&self) -> &str {
        self.ops.vault_name()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show_gallery(&mut self) {
        self.view = View::Gallery;
    }

    pub fn show_vault(&mut self) {
        self.view = View::Vault;
    }

    pub fn list_files(&self) -> Result<Vec<String>, VaultOperationError> {
        self.ops.list_files()
    }

    pub fn list_entries(&self) -> Result<Vec<FileEntry>, VaultOperationError> {
        self.ops.list_entries()
    }

    pub fn save_file(&self, name: &str, contents: &[u8]) -> Result<(), VaultOperationError> {
        self.ops.save_file(name, contents)
    }

    /// Save every `(name, contents)` pair in order and return how many were
    /// stored. Stops at the first failure; earlier files stay saved.
    pub fn upload<I, N, C>(&self, files: I) -> Result<usize, VaultOperationError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<[u8]>,
    {
        let mut saved = 0;
        for (name, contents) in files {
            self.ops.save_file(name.as_ref(), contents.as_ref())?;
            saved += 1;
        }
        tracing::info!(vault = self.vault_name(), count = saved, "Uploaded files");
        Ok(saved)
    }

    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, VaultOperationError> {
        self.ops.read_file(name)
    }

    pub fn rename_file(&self, old: &str, new: &str) -> Result<bool, VaultOperationError> {
        self.ops.rename_file(old, new)
    }

    /// Delete `name`; admin roles only.
    ///
    /// # Errors
    /// `VaultOperationError::PermissionDenied` when opened as a member.
    pub fn delete_file(&self, name: &str) -> Result<bool, VaultOperationError> {
        if !self.role.can_delete() {
            tracing::info!(vault = self.vault_name(), file = name, "Member delete refused");
            return Err(VaultOperationError::PermissionDenied {
                role: self.role,
                action: "delete files",
            });
        }
        self.ops.delete_file(name)
    }

    pub fn gallery(&self) -> Result<Gallery, VaultOperationError> {
        self.ops.gallery()
    }

    /// Back to home: ends the session.
    pub fn close(self) {
        tracing::debug!(vault = self.vault_name(), "Session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::config::DEFAULT_LOCK_TIMEOUT;
    use tempfile::TempDir;

    fn session(temp: &TempDir, role: Role) -> Session {
        let ops = VaultOperations::new("choir", temp.path().to_path_buf(), DEFAULT_LOCK_TIMEOUT);
        Session::new(ops, role)
    }

    #[test]
    fn test_views() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp, Role::Member);
        assert_eq!(session.view(), View::Vault);
        session.show_gallery();
        assert_eq!(session.view(), View::Gallery);
        session.show_vault();
        assert_eq!(session.view(), View::Vault);
    }

    #[test]
    fn test_upload_counts() {
        let temp = TempDir::new().unwrap();
        let session = session(&temp, Role::Member);

        let saved = session
            .upload([("a.png", b"a".to_vec()), ("b.pdf", b"b".to_vec())])
            .unwrap();
        assert_eq!(saved, 2);
        assert_eq!(session.list_files().unwrap(), vec!["a.png", "b.pdf"]);
    }

    #[test]
    fn test_upload_stops_at_invalid_name() {
        let temp = TempDir::new().unwrap();
        let session = session(&temp, Role::Member);

        let err = session
            .upload([("a.png", &b"a"[..]), (".vault_pass", &b"x"[..]), ("c.png", &b"c"[..])])
            .unwrap_err();
        assert!(matches!(err, VaultOperationError::InvalidName(_)));
        assert_eq!(session.list_files().unwrap(), vec!["a.png"]);
    }

    #[test]
    fn test_member_cannot_delete() {
        let temp = TempDir::new().unwrap();
        let session = session(&temp, Role::Member);
        session.save_file("a.png", b"a").unwrap();

        assert!(matches!(
            session.delete_file("a.png"),
            Err(VaultOperationError::PermissionDenied { role: Role::Member, .. })
        ));
        assert_eq!(session.list_files().unwrap(), vec!["a.png"]);
        // Members may still rename
        assert!(session.rename_file("a.png", "b.png").unwrap());
    }

    #[test]
    fn test_admins_can_delete() {
        for role in [Role::VaultAdmin, Role::MasterAdmin] {
            let temp = TempDir::new().unwrap();
            let session = session(&temp, role);
            session.save_file("a.png", b"a").unwrap();
            assert!(session.delete_file("a.png").unwrap());
            session.close();
        }
    }
}
