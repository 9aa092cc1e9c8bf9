use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use wvault_core::vault::AccessControl;

use crate::{PasskeyOptions, get_new_passkey};

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Name of the vault to create
    pub vault: String,
}

#[instrument(level = "info", name = "cmd::create", skip_all, fields(vault = %args.vault))]
pub fn execute(access: &AccessControl, args: &Args, passkey_opts: &PasskeyOptions) -> Result<()> {
    let passkey = get_new_passkey(passkey_opts)?;

    let session = access
        .create_vault(&args.vault, &passkey)
        .with_context(|| format!("Failed to create vault '{}'", args.vault))?;

    println!("Created vault '{}'", session.vault_name());
    session.close();
    Ok(())
}
