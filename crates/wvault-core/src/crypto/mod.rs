//! Credential record hashing and verification.
//!
//! Passkeys are stored as salted scrypt digests in a PHC-like string:
//!
//! ```text
//! $scrypt$ln=15,r=8,p=1$<salt, base64>$<digest, base64>
//! ```
//!
//! Records without the `$scrypt$` prefix are legacy plaintext passkeys. They
//! are still accepted on read and compared in constant time.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use ring::rand::{SecureRandom, SystemRandom};
use subtle::ConstantTimeEq;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

/// Prefix marking a hashed credential record.
pub const HASH_PREFIX: &str = "$scrypt$";

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

/// Highest accepted scrypt cost (log2 N). With `r = 8` this is 1 GiB of memory.
pub const MAX_LOG_N: u8 = 20;
/// Highest accepted scrypt block size.
pub const MAX_R: u32 = 32;
/// Highest accepted scrypt parallelism.
pub const MAX_P: u32 = 16;

/// Errors from hashing or verifying credential records.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid scrypt parameters: {0}")]
    InvalidParams(#[from] scrypt::errors::InvalidParams),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(#[from] scrypt::errors::InvalidOutputLen),

    #[error("Failed to generate salt")]
    RandomFailed,

    #[error("Malformed credential record: {0}")]
    Malformed(String),

    #[error(
        "scrypt cost ln={},r={},p={} exceeds the limit ln={MAX_LOG_N},r={MAX_R},p={MAX_P}",
        .0.log_n, .0.r, .0.p
    )]
    CostTooHigh(HashParams),
}

/// scrypt cost parameters for new credential records.
///
/// Existing records carry their own parameters, so changing these only
/// affects vaults created afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl HashParams {
    pub const fn new(log_n: u8, r: u32, p: u32) -> Self {
        Self { log_n, r, p }
    }

    /// Whether every parameter is within [`MAX_LOG_N`], [`MAX_R`] and [`MAX_P`].
    pub fn within_limits(self) -> bool {
        self.log_n <= MAX_LOG_N && self.r <= MAX_R && self.p <= MAX_P
    }

    fn to_scrypt(self) -> Result<scrypt::Params, CredentialError> {
        if !self.within_limits() {
            return Err(CredentialError::CostTooHigh(self));
        }
        Ok(scrypt::Params::new(self.log_n, self.r, self.p, DIGEST_LEN)?)
    }
}

impl Default for HashParams {
    fn default() -> Self {
        Self::new(15, 8, 1)
    }
}

/// Hash a passkey into a credential record with a fresh random salt.
pub fn hash_passkey(passkey: &str, params: HashParams) -> Result<String, CredentialError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| CredentialError::RandomFailed)?;

    let digest = derive(passkey, &salt, params)?;

    Ok(format!(
        "{HASH_PREFIX}ln={},r={},p={}${}${}",
        params.log_n,
        params.r,
        params.p,
        B64.encode(salt),
        B64.encode(digest.as_slice())
    ))
}

/// Whether a credential record is a hash (as opposed to a plaintext passkey).
pub fn is_hashed(record: &str) -> bool {
    record.starts_with(HASH_PREFIX)
}

/// Check a presented passkey against a stored credential record.
///
/// Hashed records re-derive the digest with the record's own salt and
/// parameters. Plaintext records are compared byte-for-byte, untrimmed.
pub fn verify_passkey(presented: &str, record: &str) -> Result<bool, CredentialError> {
    let Some(encoded) = record.strip_prefix(HASH_PREFIX) else {
        return Ok(constant_time_eq(presented.as_bytes(), record.as_bytes()));
    };

    let (params, salt, expected) = parse_record(encoded)?;
    let actual = derive(presented, &salt, params)?;
    Ok(constant_time_eq(actual.as_slice(), &expected))
}

/// Constant-time byte comparison. Unequal lengths compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

fn derive(
    passkey: &str,
    salt: &[u8],
    params: HashParams,
) -> Result<Zeroizing<[u8; DIGEST_LEN]>, CredentialError> {
    // NFC so the same passkey typed on different platforms hashes identically
    let normalized = Zeroizing::new(passkey.nfc().collect::<String>());
    let scrypt_params = params.to_scrypt()?;

    let mut digest = Zeroizing::new([0u8; DIGEST_LEN]);
    scrypt::scrypt(normalized.as_bytes(), salt, &scrypt_params, &mut digest[..])?;
    Ok(digest)
}

fn parse_record(encoded: &str) -> Result<(HashParams, Vec<u8>, Vec<u8>), CredentialError> {
    let mut segments = encoded.trim_end().split('$');
    let (Some(params), Some(salt), Some(digest), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(CredentialError::Malformed(
            "expected parameters, salt and digest segments".to_string(),
        ));
    };

    let params = parse_params(params)?;
    let salt = B64
        .decode(salt)
        .map_err(|e| CredentialError::Malformed(format!("salt: {e}")))?;
    let digest = B64
        .decode(digest)
        .map_err(|e| CredentialError::Malformed(format!("digest: {e}")))?;

    if digest.len() != DIGEST_LEN {
        return Err(CredentialError::Malformed(format!(
            "digest is {} bytes, expected {DIGEST_LEN}",
            digest.len()
        )));
    }

    Ok((params, salt, digest))
}

fn parse_params(segment: &str) -> Result<HashParams, CredentialError> {
    let (mut log_n, mut r, mut p) = (None, None, None);

    for pair in segment.split(',') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| CredentialError::Malformed(format!("bad parameter '{pair}'")))?;
        let invalid = |_| CredentialError::Malformed(format!("bad value for '{key}': {value}"));
        match key {
            "ln" => log_n = Some(value.parse::<u8>().map_err(invalid)?),
            "r" => r = Some(value.parse::<u32>().map_err(invalid)?),
            "p" => p = Some(value.parse::<u32>().map_err(invalid)?),
            other => {
                return Err(CredentialError::Malformed(format!(
                    "unknown parameter '{other}'"
                )));
            }
        }
    }

    match (log_n, r, p) {
        (Some(log_n), Some(r), Some(p)) => {
            let params = HashParams::new(log_n, r, p);
            if params.within_limits() {
                Ok(params)
            } else {
                Err(CredentialError::Malformed(format!(
                    "scrypt cost ln={log_n},r={r},p={p} is above the accepted limit"
                )))
            }
        }
        _ => Err(CredentialError::Malformed(
            "missing scrypt parameter".to_string(),
        )),
    }
}
