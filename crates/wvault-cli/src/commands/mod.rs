pub mod cat;
pub mod completions;
pub mod create;
pub mod export;
pub mod gallery;
pub mod ls;
pub mod mv;
pub mod open;
pub mod rm;
pub mod upload;

use std::path::Path;

use anyhow::{Result, anyhow};

/// The final component of a local path, as a vault file name.
pub fn local_file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?
        .to_str()
        .ok_or_else(|| anyhow!("File name is not valid UTF-8: {}", path.display()))
}
