use anyhow::{Result, bail};
use rpassword::read_password;
use std::io::{self, Write};

/// Prompt for a vault passkey. Input is hidden and not echoed.
///
/// For non-interactive use, pass `--passkey` or set `WVAULT_PASSKEY`.
pub fn prompt_passkey() -> Result<String> {
    eprint!("Vault passkey: ");
    io::stderr().flush()?;

    let passkey = read_password()?;

    if passkey.is_empty() {
        bail!("Passkey cannot be empty");
    }

    Ok(passkey)
}

/// Prompt twice for the passkey of a new vault.
pub fn prompt_new_passkey() -> Result<String> {
    eprint!("New vault passkey: ");
    io::stderr().flush()?;
    let first = read_password()?;

    eprint!("Confirm passkey: ");
    io::stderr().flush()?;
    let second = read_password()?;

    if first != second {
        bail!("Passkeys do not match");
    }
    if first.is_empty() {
        bail!("Passkey cannot be empty");
    }

    Ok(first)
}
