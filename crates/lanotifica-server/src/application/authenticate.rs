//! AuthGate: bearer-token check in front of every relay request.
//!
//! The check runs in three steps and stops at the first failure:
//!
//! ```text
//! header present?  ──no──►  MissingHeader
//!      │ yes
//! "Bearer <token>"? ──no──►  InvalidFormat
//!      │ yes
//! token == secret?  ──no──►  InvalidToken
//!      │ yes
//! downstream runs
//! ```
//!
//! Every rejection maps to HTTP 401.  The gate keeps no state between calls;
//! the secret it holds is captured at startup and never changes, so a single
//! gate is shared by every concurrent request without locking.

use std::sync::Arc;

use lanotifica_core::Secret;
use thiserror::Error;
use tracing::debug;

/// The only accepted authorization scheme.
pub const BEARER_SCHEME: &str = "Bearer";

/// Why a request was refused.  The `Display` text is the response body.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid authorization format, use: Bearer <token>")]
    InvalidFormat,

    /// Says nothing about how the token differs.
    #[error("Invalid token")]
    InvalidToken,
}

/// Validates `Authorization` header values against the shared secret.
#[derive(Clone)]
pub struct AuthGate {
    secret: Arc<Secret>,
}

impl AuthGate {
    pub fn new(secret: Secret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Checks one header value.  `None` and `Some("")` both mean "absent".
    ///
    /// The header must be exactly two tokens separated by a single space,
    /// the first being `Bearer`.  The token comparison takes the same time
    /// wherever the first differing byte is.
    pub fn check(&self, header: Option<&str>) -> Result<(), AuthRejection> {
        let result = self.evaluate(header);
        if let Err(rejection) = &result {
            debug!(kind = ?rejection, "request rejected");
        }
        result
    }

    fn evaluate(&self, header: Option<&str>) -> Result<(), AuthRejection> {
        let header = match header {
            Some(h) if !h.is_empty() => h,
            _ => return Err(AuthRejection::MissingHeader),
        };

        let mut parts = header.split(' ');
        let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) => (scheme, token),
            _ => return Err(AuthRejection::InvalidFormat),
        };
        if scheme != BEARER_SCHEME {
            return Err(AuthRejection::InvalidFormat);
        }

        if self.secret.matches(token) {
            Ok(())
        } else {
            Err(AuthRejection::InvalidToken)
        }
    }

    /// Runs `downstream` only if `header` passes, returning its result as-is.
    pub fn guard<T>(
        &self,
        header: Option<&str>,
        downstream: impl FnOnce() -> T,
    ) -> Result<T, AuthRejection> {
        self.check(header)?;
        Ok(downstream())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
