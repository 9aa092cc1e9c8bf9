//! Export command - copy a file out of a vault.
//!
//! # Examples
//!
//! ```bash
//! # Export into the current directory
//! wvault export choir setlist.pdf
//!
//! # Export into a directory, or to an explicit path
//! wvault export choir stage.png ~/Downloads/
//! wvault export choir stage.png ~/Downloads/stage-2026.png
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use wvault_core::vault::Session;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// File name within the vault
    pub file: String,

    /// Destination file or directory (default: current directory)
    pub dest: Option<PathBuf>,

    /// Overwrite an existing local file
    #[arg(short, long)]
    pub force: bool,
}

#[instrument(level = "info", name = "cmd::export", skip_all, fields(file = %args.file))]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    let contents = session.read_file(&args.file)?;

    let dest = match &args.dest {
        Some(dest) if dest.is_dir() => dest.join(&args.file),
        Some(dest) => dest.clone(),
        None => PathBuf::from(&args.file),
    };

    if dest.exists() && !args.force {
        anyhow::bail!(
            "Destination '{}' already exists (use --force to overwrite)",
            dest.display()
        );
    }

    fs::write(&dest, &contents)
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    println!("{} -> {}", args.file, dest.display());
    Ok(())
}
