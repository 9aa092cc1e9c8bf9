//! Shell completion generation for the wvault CLI.
//!
//! ```bash
//! # Bash (add to ~/.bashrc)
//! eval "$(wvault completions bash)"
//!
//! # Fish
//! wvault completions fish > ~/.config/fish/completions/wvault.fish
//! ```

use std::io;

use anyhow::Result;
use clap::{Args as ClapArgs, CommandFactory};
use clap_complete::{Shell, generate};

use crate::Cli;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute(args: &Args) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "wvault", &mut io::stdout());
    Ok(())
}
