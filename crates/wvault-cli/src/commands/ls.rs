//! List command - list the files stored in a vault.
//!
//! # Examples
//!
//! ```bash
//! # List files
//! wvault ls choir
//!
//! # List with sizes
//! wvault ls -l choir
//!
//! # Output as JSON for scripting
//! wvault ls --json choir | jq '.files[].name'
//! ```

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use wvault_core::vault::{FileEntry, Session};

use crate::output::{file_table, format_size};

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Show file sizes
    #[arg(short, long)]
    pub long: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// One entry per line (script-friendly)
    #[arg(short = '1')]
    pub one_per_line: bool,
}

/// JSON output format for ls command
#[derive(Serialize)]
struct LsOutput<'a> {
    vault: &'a str,
    files: &'a [FileEntry],
}

#[instrument(level = "info", name = "cmd::ls", skip_all)]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    session.show_vault();
    let entries = session.list_entries()?;

    if args.json {
        let output = LsOutput {
            vault: session.vault_name(),
            files: &entries,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if args.long {
        print_long_format(&entries);
    } else {
        print_short_format(&entries, args.one_per_line);
    }

    Ok(())
}

fn print_long_format(entries: &[FileEntry]) {
    let mut table = file_table();

    for entry in entries {
        table.add_row(vec![format_size(entry.size), entry.name.clone()]);
    }

    println!("{table}");
}

fn print_short_format(entries: &[FileEntry], one_per_line: bool) {
    if entries.is_empty() {
        return;
    }

    if one_per_line || entries.len() > 10 {
        for entry in entries {
            println!("{}", entry.name);
        }
    } else {
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        println!("{}", names.join("  "));
    }
}
