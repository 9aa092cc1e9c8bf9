use anyhow::Result;
use clap::Args as ClapArgs;
use std::io::{self, Write};
use tracing::instrument;

use wvault_core::vault::Session;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// File name within the vault
    pub file: String,
}

#[instrument(level = "info", name = "cmd::cat", skip_all, fields(file = %args.file))]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    let contents = session.read_file(&args.file)?;
    io::stdout().write_all(&contents)?;
    Ok(())
}
