//! The pairing payload wire format.
//!
//! ```text
//! <secret>|<fingerprint>
//! ```
//!
//! Both components are drawn from the hex alphabet, so neither can contain
//! the `|` separator and splitting on the first separator is unambiguous.
//! The server URL is intentionally absent: the phone finds the relay through
//! mDNS, or the user types the address by hand.

use thiserror::Error;

use crate::domain::{fingerprint::Fingerprint, secret::Secret};

/// Separator between the secret and the fingerprint.
pub const PAYLOAD_SEPARATOR: char = '|';

/// Error type for decoding a scanned payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("pairing payload has no '{PAYLOAD_SEPARATOR}' separator")]
    MissingSeparator,

    #[error("pairing payload has more than one '{PAYLOAD_SEPARATOR}' separator")]
    ExtraSeparator,

    #[error("pairing payload has an empty {0}")]
    EmptyComponent(&'static str),
}

/// The `(secret, fingerprint)` pair as carried inside the QR code.
///
/// On the relay side it is built from validated [`Secret`] and
/// [`Fingerprint`] values.  On the scanning side it is decoded from whatever
/// string the camera produced, so components are kept as plain strings and
/// only checked for presence; shape validation belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingPayload {
    secret: String,
    fingerprint: String,
}

impl PairingPayload {
    pub fn new(secret: &Secret, fingerprint: &Fingerprint) -> Self {
        Self {
            secret: secret.as_str().to_string(),
            fingerprint: fingerprint.as_str().to_string(),
        }
    }

    /// Builds a payload from raw components without shape validation.
    pub fn from_parts(secret: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            fingerprint: fingerprint.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Encodes as `secret|fingerprint`.
    pub fn to_wire(&self) -> String {
        format!("{}{PAYLOAD_SEPARATOR}{}", self.secret, self.fingerprint)
    }

    /// Decodes a scanned wire string.
    ///
    /// Splits on the first separator and trims surrounding whitespace from
    /// each component.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the separator is missing or repeated, or
    /// when either component is blank.
    pub fn parse(wire: &str) -> Result<Self, PayloadError> {
        let (secret, fingerprint) = wire
            .split_once(PAYLOAD_SEPARATOR)
            .ok_or(PayloadError::MissingSeparator)?;
        if fingerprint.contains(PAYLOAD_SEPARATOR) {
            return Err(PayloadError::ExtraSeparator);
        }

        let secret = secret.trim();
        let fingerprint = fingerprint.trim();
        if secret.is_empty() {
            return Err(PayloadError::EmptyComponent("secret"));
        }
        if fingerprint.is_empty() {
            return Err(PayloadError::EmptyComponent("fingerprint"));
        }

        Ok(Self::from_parts(secret, fingerprint))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wire_joins_with_separator() {
        let payload = PairingPayload::from_parts("abc123", "DEF456");
        assert_eq!(payload.to_wire(), "abc123|DEF456");
    }

    #[test]
    fn test_new_uses_validated_values() {
        // Arrange
        let secret = Secret::parse(&"0f".repeat(32)).unwrap();
        let fp = Fingerprint::of_der(b"cert");

        // Act
        let payload = PairingPayload::new(&secret, &fp);

        // Assert
        assert_eq!(payload.secret(), secret.as_str());
        assert_eq!(payload.fingerprint(), fp.as_str());
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let payload = PairingPayload::parse("abc123|DEF456").unwrap();
        assert_eq!(payload.secret(), "abc123");
        assert_eq!(payload.fingerprint(), "DEF456");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let payload = PairingPayload::parse("  abc123 |\tDEF456\n").unwrap();
        assert_eq!(payload, PairingPayload::from_parts("abc123", "DEF456"));
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert_eq!(
            PairingPayload::parse("abc123DEF456"),
            Err(PayloadError::MissingSeparator)
        );
    }

    #[test]
    fn test_parse_rejects_extra_separator() {
        assert_eq!(
            PairingPayload::parse("https://host|abc|DEF"),
            Err(PayloadError::ExtraSeparator)
        );
    }

    #[test]
    fn test_parse_rejects_blank_components() {
        assert_eq!(
            PairingPayload::parse(" |DEF456"),
            Err(PayloadError::EmptyComponent("secret"))
        );
        assert_eq!(
            PairingPayload::parse("abc123|"),
            Err(PayloadError::EmptyComponent("fingerprint"))
        );
    }
}
