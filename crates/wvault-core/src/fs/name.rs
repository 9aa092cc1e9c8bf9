//! Vault and file name validation.
//!
//! Names are joined onto filesystem paths, so each must be exactly one
//! ordinary path component. File names additionally may not use the reserved
//! `.` prefix that marks credential records and other bookkeeping files.

use thiserror::Error;

/// Leading character of names hidden from listings (credential records, lock file).
pub const RESERVED_PREFIX: char = '.';

/// Longest name most filesystems accept for a single component.
pub const MAX_NAME_BYTES: usize = 255;

/// Context for name errors: which kind of name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    Vault,
    File,
}

impl std::fmt::Display for NameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameContext::Vault => f.write_str("vault name"),
            NameContext::File => f.write_str("file name"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} is empty")]
    Empty(NameContext),

    #[error("{context} '{name}' contains a path separator")]
    PathSeparator { context: NameContext, name: String },

    #[error("{context} '{name}' is a relative path segment")]
    DotSegment { context: NameContext, name: String },

    #[error("{0} contains a NUL byte")]
    Nul(NameContext),

    #[error("{context} '{name}' starts with the reserved '.' prefix")]
    Reserved { context: NameContext, name: String },

    #[error("{context} is {len} bytes, longer than {MAX_NAME_BYTES}")]
    TooLong { context: NameContext, len: usize },
}

/// Validate a vault name (the vault's directory name under the root).
pub fn validate_vault_name(name: &str) -> Result<&str, NameError> {
    validate_component(name, NameContext::Vault)
}

/// Validate a file name inside a vault.
pub fn validate_file_name(name: &str) -> Result<&str, NameError> {
    let name = validate_component(name, NameContext::File)?;
    if is_reserved(name) {
        return Err(NameError::Reserved {
            context: NameContext::File,
            name: name.to_string(),
        });
    }
    Ok(name)
}

/// Whether a directory entry is bookkeeping rather than a user file.
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

fn validate_component(name: &str, context: NameContext) -> Result<&str, NameError> {
    if name.is_empty() {
        return Err(NameError::Empty(context));
    }
    if name.contains('\0') {
        return Err(NameError::Nul(context));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(NameError::PathSeparator {
            context,
            name: name.to_string(),
        });
    }
    if name == "." || name == ".." {
        return Err(NameError::DotSegment {
            context,
            name: name.to_string(),
        });
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(NameError::TooLong {
            context,
            len: name.len(),
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ordinary_names_pass() {
        for name in ["a.png", "Setlist 2024.pdf", "émojis-🚀.jpg", "no_extension", "..hidden.."] {
            assert_eq!(validate_vault_name(name), Ok(name));
        }
        assert_eq!(validate_file_name("a.png"), Ok("a.png"));
        assert_eq!(validate_file_name("x..y"), Ok("x..y"));
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(matches!(
            validate_file_name("../escape.png"),
            Err(NameError::PathSeparator { .. })
        ));
        assert!(matches!(
            validate_file_name("sub\\dir.png"),
            Err(NameError::PathSeparator { .. })
        ));
        assert!(matches!(
            validate_vault_name(".."),
            Err(NameError::DotSegment { .. })
        ));
        assert!(matches!(
            validate_vault_name("."),
            Err(NameError::DotSegment { .. })
        ));
        assert!(matches!(
            validate_vault_name("/etc"),
            Err(NameError::PathSeparator { .. })
        ));
    }

    #[test]
    fn test_reserved_prefix_only_applies_to_files() {
        assert!(matches!(
            validate_file_name(".vault_pass"),
            Err(NameError::Reserved { .. })
        ));
        assert!(matches!(
            validate_file_name(".admin_pass"),
            Err(NameError::Reserved { .. })
        ));
        assert_eq!(validate_vault_name(".choir"), Ok(".choir"));
    }

    #[test]
    fn test_empty_nul_and_long_names() {
        assert_eq!(
            validate_file_name(""),
            Err(NameError::Empty(NameContext::File))
        );
        assert_eq!(
            validate_vault_name("a\0b"),
            Err(NameError::Nul(NameContext::Vault))
        );
        let long = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(matches!(
            validate_file_name(&long),
            Err(NameError::TooLong { len, .. }) if len == MAX_NAME_BYTES + 1
        ));
        assert!(validate_file_name(&"x".repeat(MAX_NAME_BYTES)).is_ok());
    }

    #[test]
    fn test_error_messages_name_the_context() {
        let err = validate_file_name("a/b").unwrap_err();
        assert_eq!(err.to_string(), "file name 'a/b' contains a path separator");
        let err = validate_vault_name("").unwrap_err();
        assert_eq!(err.to_string(), "vault name is empty");
        let err = validate_file_name("a\0b.png").unwrap_err();
        assert_eq!(err.to_string(), "file name contains a NUL byte");
    }

    proptest! {
        #[test]
        fn prop_accepted_names_are_single_components(name in "\\PC{1,40}") {
            if let Ok(valid) = validate_file_name(&name) {
                let path = std::path::Path::new("root").join(valid);
                prop_assert_eq!(path.parent(), Some(std::path::Path::new("root")));
                prop_assert!(!valid.starts_with(RESERVED_PREFIX));
            }
        }

        #[test]
        fn prop_names_with_separators_rejected(
            prefix in "[a-z]{0,8}",
            sep in prop::sample::select(vec!['/', '\\']),
            suffix in "[a-z]{0,8}",
        ) {
            let name = format!("{prefix}{sep}{suffix}");
            prop_assert!(validate_file_name(&name).is_err());
            prop_assert!(validate_vault_name(&name).is_err());
        }
    }
}
