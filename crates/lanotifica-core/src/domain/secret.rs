//! The shared bearer secret.
//!
//! Generated exactly once per installation from the operating system's
//! cryptographically secure random source, persisted in `config.json`, and
//! thereafter treated as immutable.  The phone learns it by scanning the
//! pairing QR code and presents it as `Authorization: Bearer <secret>`.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Number of random bytes behind a secret.
pub const SECRET_BYTES: usize = 32;

/// Length of the hex-encoded secret.
pub const SECRET_HEX_LEN: usize = SECRET_BYTES * 2;

/// Error type for secret generation and validation.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The OS random source could not produce bytes.
    #[error("secure random source unavailable: {0}")]
    RandomSource(String),

    /// The value does not have exactly [`SECRET_HEX_LEN`] characters.
    #[error("secret must be {SECRET_HEX_LEN} hex characters, got {0}")]
    WrongLength(usize),

    /// The value contains a character outside `[0-9a-fA-F]`.
    #[error("secret contains a non-hex character")]
    NotHex,
}

/// A 64-character hex bearer secret.
///
/// `Debug` output is redacted so the value never reaches logs by accident.
/// Use [`Secret::as_str`] where the raw value is genuinely required (the
/// config file and the pairing payload).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Secret(String);

impl Secret {
    /// Generates a fresh secret from 32 bytes of OS randomness, lowercase hex.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::RandomSource`] if the OS random source fails.
    pub fn generate() -> Result<Self, SecretError> {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SecretError::RandomSource(e.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Validates `value` and wraps it verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::WrongLength`] or [`SecretError::NotHex`].
    pub fn parse(value: &str) -> Result<Self, SecretError> {
        if value.len() != SECRET_HEX_LEN {
            return Err(SecretError::WrongLength(value.len()));
        }
        if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SecretError::NotHex);
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the raw hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares a presented token against this secret in constant time.
    ///
    /// Tokens of a different length are rejected without inspecting content.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl TryFrom<String> for Secret {
    type Error = SecretError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Secret> for String {
    fn from(secret: Secret) -> Self {
        secret.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
