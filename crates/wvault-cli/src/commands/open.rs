use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use wvault_core::vault::{Role, Session};

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct OpenOutput<'a> {
    vault: &'a str,
    role: Role,
    files: usize,
}

#[instrument(level = "info", name = "cmd::open", skip_all)]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    let files = session.list_files()?.len();

    if args.json {
        let output = OpenOutput {
            vault: session.vault_name(),
            role: session.role(),
            files,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", session.role());
    }

    Ok(())
}
