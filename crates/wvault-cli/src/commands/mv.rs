use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use wvault_core::error::VaultOperationError;
use wvault_core::vault::Session;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Current file name
    pub old: String,

    /// New file name; an existing file of that name is replaced
    pub new: String,
}

#[instrument(level = "info", name = "cmd::mv", skip_all, fields(old = %args.old, new = %args.new))]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    if !session.rename_file(&args.old, &args.new)? {
        return Err(VaultOperationError::FileNotFound {
            vault: session.vault_name().to_string(),
            name: args.old.clone(),
        }
        .into());
    }

    println!("{} -> {}", args.old, args.new);
    Ok(())
}
