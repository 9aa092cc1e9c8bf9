use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use wvault_core::error::VaultOperationError;
use wvault_core::vault::Session;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// File name within the vault
    pub file: String,

    /// Ignore a nonexistent file
    #[arg(short, long)]
    pub force: bool,
}

#[instrument(level = "info", name = "cmd::rm", skip_all, fields(file = %args.file, force = args.force))]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    if session.delete_file(&args.file)? {
        println!("{} deleted", args.file);
    } else if !args.force {
        return Err(VaultOperationError::FileNotFound {
            vault: session.vault_name().to_string(),
            name: args.file.clone(),
        }
        .into());
    }

    Ok(())
}
