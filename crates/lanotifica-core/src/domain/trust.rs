//! Trust-on-first-use pinning.
//!
//! The relay's certificate is self-signed: issuer and subject are the same
//! entity and no root store will ever vouch for it.  A client therefore does
//! not validate a chain at all.  It pins the fingerprint it scanned from the
//! pairing QR code and, on every TLS handshake, checks that the presented
//! certificate hashes to exactly that value.
//!
//! [`TrustAnchor`] is that pin.  This module has no API for
//! issuer chains or root stores.

use thiserror::Error;

use super::fingerprint::Fingerprint;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrustError {
    /// The presented certificate is not the one that was pinned.
    #[error("certificate fingerprint {actual} does not match pinned {expected}")]
    Mismatch {
        expected: Fingerprint,
        actual: Fingerprint,
    },
}

/// A fingerprint pinned out-of-band on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pinned: Fingerprint,
}

impl TrustAnchor {
    /// Pins `fingerprint` as the only acceptable server identity.
    pub fn pin(fingerprint: Fingerprint) -> Self {
        Self { pinned: fingerprint }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.pinned
    }

    /// Accepts `cert_der` only if it hashes to the pinned fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Mismatch`] for any other certificate.
    pub fn verify(&self, cert_der: &[u8]) -> Result<(), TrustError> {
        let actual = Fingerprint::of_der(cert_der);
        if actual == self.pinned {
            Ok(())
        } else {
            Err(TrustError::Mismatch {
                expected: self.pinned.clone(),
                actual,
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
