//! Certificate fingerprints.
//!
//! A fingerprint is the uppercase hex SHA-256 digest of a certificate's DER
//! bytes.  It is a deterministic function of those bytes: hashing the same
//! certificate twice always yields the same 64-character string, and any
//! change to the certificate (new key, new validity window, new SAN list)
//! changes the fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a hex-encoded SHA-256 fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Error type for fingerprint parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("fingerprint must be {FINGERPRINT_HEX_LEN} hex characters, got {0}")]
    WrongLength(usize),

    #[error("fingerprint contains a non-hex character")]
    NotHex,
}

/// Uppercase hex SHA-256 digest of a DER-encoded certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hashes `cert_der` and returns its fingerprint.
    pub fn of_der(cert_der: &[u8]) -> Self {
        let digest = Sha256::digest(cert_der);
        Self(hex::encode_upper(digest))
    }

    /// Parses a fingerprint received out-of-band, normalising to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError`] if `value` is not 64 hex characters.
    pub fn parse(value: &str) -> Result<Self, FingerprintError> {
        if value.len() != FINGERPRINT_HEX_LEN {
            return Err(FingerprintError::WrongLength(value.len()));
        }
        if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FingerprintError::NotHex);
        }
        Ok(Self(value.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
