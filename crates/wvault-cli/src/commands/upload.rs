//! Upload command - save local files into a vault.
//!
//! Each file is stored under its own file name, replacing any file of the
//! same name already in the vault.
//!
//! # Examples
//!
//! ```bash
//! wvault upload choir setlist.pdf photos/stage.png
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use wvault_core::vault::Session;

use super::local_file_name;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Local files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[instrument(level = "info", name = "cmd::upload", skip_all, fields(count = args.files.len()))]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    // Read everything first so a missing local file uploads nothing
    let mut uploads = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if !path.is_file() {
            anyhow::bail!("Not a file: {}", path.display());
        }
        let name = local_file_name(path)?;
        let contents =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        uploads.push((name, contents));
    }

    let saved = session.upload(uploads)?;
    tracing::debug!("Uploaded {} file(s)", saved);

    println!("Uploaded!");
    Ok(())
}
