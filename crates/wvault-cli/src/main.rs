#![deny(unsafe_code)]

mod auth;
mod commands;
mod config;
mod exit_code;
mod output;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wvault_core::error::{AuthError, NameError, VaultCreationError, VaultOperationError};
use wvault_core::vault::{AccessControl, Session};

use crate::commands::{cat, completions, create, export, gallery, ls, mv, open, rm, upload};
use crate::config::Config;

/// Passkey-gated file vaults
#[derive(Parser)]
#[command(name = "wvault")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Create a vault (prompts for the passkey twice)
    wvault create choir

    # List files, piping the passkey from a secret manager
    echo \"$SECRET\" | wvault --passkey-stdin ls choir

    # Upload several files at once
    wvault upload choir setlist.pdf stage.png

    # Show the image gallery
    wvault gallery choir
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory holding the vaults (default: ./vaults)
    #[arg(long, value_name = "DIR", env = "WVAULT_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Vault passkey (insecure, prefer --passkey-stdin or WVAULT_PASSKEY)
    #[arg(long, env = "WVAULT_PASSKEY", hide_env_values = true, global = true)]
    passkey: Option<String>,

    /// Read the passkey from stdin (single line)
    #[arg(long, conflicts_with = "passkey", global = true)]
    passkey_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Passkey options extracted from the CLI
#[derive(Clone, Default)]
pub struct PasskeyOptions {
    pub passkey: Option<String>,
    pub passkey_stdin: bool,
}

impl From<&Cli> for PasskeyOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            passkey: cli.passkey.clone(),
            passkey_stdin: cli.passkey_stdin,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new vault
    Create(create::Args),

    /// Open a vault and print the role the passkey grants
    Open(VaultCommand<open::Args>),

    /// List the files in a vault
    Ls(VaultCommand<ls::Args>),

    /// Show the gallery view of a vault
    Gallery(VaultCommand<gallery::Args>),

    /// Upload local files into a vault
    Upload(VaultCommand<upload::Args>),

    /// Write a file's contents to stdout
    Cat(VaultCommand<cat::Args>),

    /// Copy a file out of a vault to the local filesystem
    Export(VaultCommand<export::Args>),

    /// Rename a file
    Mv(VaultCommand<mv::Args>),

    /// Delete a file (vault admins only)
    Rm(VaultCommand<rm::Args>),

    /// Generate shell completions
    Completions(completions::Args),
}

/// Wrapper for commands that operate on an open vault
#[derive(Parser, Clone)]
pub struct VaultCommand<T: clap::Args> {
    /// Vault name
    #[arg(value_name = "VAULT")]
    pub vault: String,

    #[command(flatten)]
    pub args: T,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => {
            let code = categorize_error(&e);

            let args: Vec<String> = std::env::args().collect();
            let is_quiet = args.iter().any(|a| a == "-q" || a == "--quiet");

            if !is_quiet {
                eprintln!("Error: {e:#}");
            }

            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    if !cli.quiet {
        let verbose = if cli.verbose > 0 {
            cli.verbose
        } else {
            config.defaults.verbosity.unwrap_or(0)
        };
        setup_tracing(verbose);
    }

    let passkey_opts = PasskeyOptions::from(&cli);

    match cli.command {
        Commands::Completions(args) => completions::execute(&args),
        Commands::Create(args) => {
            let access = open_access(&config, cli.root)?;
            create::execute(&access, &args, &passkey_opts)
        }
        Commands::Open(cmd) => {
            execute_vault_command(&config, cli.root, &cmd, &passkey_opts, open::execute)
        }
        Commands::Ls(cmd) => execute_vault_command(&config, cli.root, &cmd, &passkey_opts, ls::execute),
        Commands::Gallery(cmd) => {
            execute_vault_command(&config, cli.root, &cmd, &passkey_opts, gallery::execute)
        }
        Commands::Upload(cmd) => {
            execute_vault_command(&config, cli.root, &cmd, &passkey_opts, upload::execute)
        }
        Commands::Cat(cmd) => execute_vault_command(&config, cli.root, &cmd, &passkey_opts, cat::execute),
        Commands::Export(cmd) => {
            execute_vault_command(&config, cli.root, &cmd, &passkey_opts, export::execute)
        }
        Commands::Mv(cmd) => execute_vault_command(&config, cli.root, &cmd, &passkey_opts, mv::execute),
        Commands::Rm(cmd) => execute_vault_command(&config, cli.root, &cmd, &passkey_opts, rm::execute),
    }
}

/// Build access control from the config file and command-line overrides
fn open_access(config: &Config, root: Option<PathBuf>) -> Result<AccessControl> {
    let settings = config.vault_settings(root);
    let root_display = settings.root.display().to_string();
    AccessControl::from_settings(settings)
        .with_context(|| format!("Failed to open vaults root: {root_display}"))
}

/// Open the vault, run one command in the session, then go back home
fn execute_vault_command<T, F>(
    config: &Config,
    root: Option<PathBuf>,
    cmd: &VaultCommand<T>,
    passkey_opts: &PasskeyOptions,
    f: F,
) -> Result<()>
where
    T: clap::Args,
    F: FnOnce(&mut Session, &T) -> Result<()>,
{
    let access = open_access(config, root)?;
    let passkey = get_passkey(passkey_opts)?;

    let mut session = access
        .open_vault(&cmd.vault, &passkey)
        .with_context(|| format!("Failed to open vault '{}'", cmd.vault))?;

    let result = f(&mut session, &cmd.args);
    session.close();
    result
}

/// Get the passkey using the priority chain:
/// 1. --passkey-stdin
/// 2. --passkey / WVAULT_PASSKEY
/// 3. Interactive prompt
fn get_passkey(opts: &PasskeyOptions) -> Result<String> {
    if opts.passkey_stdin {
        read_passkey_from_stdin()
    } else if let Some(ref passkey) = opts.passkey {
        Ok(passkey.clone())
    } else {
        auth::prompt_passkey()
    }
}

/// Like [`get_passkey`], but an interactive prompt asks twice
pub fn get_new_passkey(opts: &PasskeyOptions) -> Result<String> {
    if opts.passkey_stdin || opts.passkey.is_some() {
        get_passkey(opts)
    } else {
        auth::prompt_new_passkey()
    }
}

/// Read the passkey from stdin (first line only)
fn read_passkey_from_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        anyhow::bail!(
            "--passkey-stdin requires the passkey to be piped in.\n\
             Example: echo \"$SECRET\" | wvault --passkey-stdin ls choir"
        );
    }

    let mut passkey = String::new();
    io::stdin().read_line(&mut passkey)?;

    let passkey = passkey.trim_end_matches('\n').trim_end_matches('\r');

    if passkey.is_empty() {
        anyhow::bail!("Passkey from stdin is empty");
    }

    Ok(passkey.to_string())
}

/// Set up tracing/logging based on verbosity level
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Categorize an error into an exit code using typed error downcasting
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(auth_err) = cause.downcast_ref::<AuthError>() {
            match auth_err {
                AuthError::VaultNotFound(_) => return exit_code::VAULT_NOT_FOUND,
                AuthError::IncorrectPassword => return exit_code::AUTH_FAILED,
                _ => {}
            }
        }

        if let Some(create_err) = cause.downcast_ref::<VaultCreationError>() {
            match create_err {
                VaultCreationError::MissingFields => return exit_code::USAGE_ERROR,
                VaultCreationError::VaultAlreadyExists(_) => return exit_code::ALREADY_EXISTS,
                _ => {}
            }
        }

        if let Some(op_err) = cause.downcast_ref::<VaultOperationError>() {
            match op_err {
                VaultOperationError::FileNotFound { .. } => return exit_code::NOT_FOUND,
                VaultOperationError::PermissionDenied { .. } => {
                    return exit_code::PERMISSION_DENIED;
                }
                VaultOperationError::InvalidName(_) => return exit_code::USAGE_ERROR,
                VaultOperationError::Io { source, .. } => {
                    if source.kind() == io::ErrorKind::PermissionDenied {
                        return exit_code::PERMISSION_DENIED;
                    }
                }
                VaultOperationError::Lock(_) => {}
            }
        }

        if cause.downcast_ref::<NameError>().is_some() {
            return exit_code::USAGE_ERROR;
        }

        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::PermissionDenied => return exit_code::PERMISSION_DENIED,
                io::ErrorKind::NotFound => return exit_code::NOT_FOUND,
                io::ErrorKind::Interrupted => return exit_code::CANCELLED,
                _ => {}
            }
        }
    }

    let msg = format!("{e:#}").to_lowercase();
    if msg.contains("cancelled") || msg.contains("interrupted") {
        exit_code::CANCELLED
    } else {
        exit_code::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wvault_core::error::{LockError, VaultStoreError};
    use wvault_core::vault::Role;

    #[test]
    fn test_categorize_auth_errors() {
        let e = anyhow::Error::new(AuthError::IncorrectPassword).context("Failed to open vault 'choir'");
        assert_eq!(categorize_error(&e), exit_code::AUTH_FAILED);

        let e = anyhow::Error::new(AuthError::VaultNotFound("choir".into()));
        assert_eq!(categorize_error(&e), exit_code::VAULT_NOT_FOUND);
    }

    #[test]
    fn test_categorize_creation_errors() {
        let e = anyhow::Error::new(VaultCreationError::VaultAlreadyExists("choir".into()));
        assert_eq!(categorize_error(&e), exit_code::ALREADY_EXISTS);

        let e = anyhow::Error::new(VaultCreationError::MissingFields);
        assert_eq!(categorize_error(&e), exit_code::USAGE_ERROR);

        let name_err = wvault_core::fs::validate_vault_name("..").unwrap_err();
        let e = anyhow::Error::new(VaultCreationError::Store(VaultStoreError::InvalidName(name_err)));
        assert_eq!(categorize_error(&e), exit_code::USAGE_ERROR);
    }

    #[test]
    fn test_categorize_operation_errors() {
        let e = anyhow::Error::new(VaultOperationError::PermissionDenied {
            role: Role::Member,
            action: "delete files",
        });
        assert_eq!(categorize_error(&e), exit_code::PERMISSION_DENIED);

        let e = anyhow::Error::new(VaultOperationError::FileNotFound {
            vault: "choir".into(),
            name: "a.png".into(),
        });
        assert_eq!(categorize_error(&e), exit_code::NOT_FOUND);

        let e = anyhow::Error::new(VaultOperationError::Lock(LockError::Timeout {
            path: PathBuf::from("/tmp/choir/.lock"),
            waited: Duration::from_secs(5),
        }));
        assert_eq!(categorize_error(&e), exit_code::GENERAL_ERROR);
    }

    #[test]
    fn test_categorize_fallbacks() {
        let e = anyhow::anyhow!("Operation cancelled by user");
        assert_eq!(categorize_error(&e), exit_code::CANCELLED);

        let e = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&e), exit_code::GENERAL_ERROR);
    }
}
