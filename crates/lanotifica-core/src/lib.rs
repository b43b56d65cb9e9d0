//! # lanotifica-core
//!
//! Shared library for LaNotifica containing the identity primitives that the
//! relay server and its paired phone must agree on: the shared secret, the
//! certificate fingerprint, and the pairing payload that carries both.
//!
//! This crate never opens a socket or touches the file system.  Apart from
//! [`Secret::generate`], which reads the OS random source, everything here is
//! a pure function of its inputs, so the server's persisted identity and the
//! phone's scanned copy always compare equal.
//!
//! # How pairing works (for beginners)
//!
//! The relay never obtains a certificate from a public certificate authority.
//! Instead it issues one for itself and shows the phone a QR code containing:
//!
//! ```text
//! <secret>|<fingerprint>
//! ```
//!
//! - **`secret`** – 32 random bytes, hex-encoded.  The phone sends it back as
//!   a bearer token on every request.
//! - **`fingerprint`** – the SHA-256 digest of the relay's certificate.  The
//!   phone pins it on first use (TOFU) and refuses any TLS peer whose
//!   certificate hashes to something else.
//!
//! The modules are:
//!
//! - **`domain`** – [`Secret`], [`Fingerprint`] and the [`TrustAnchor`] the
//!   phone keeps after scanning.
//! - **`pairing`** – the wire form of the payload and its QR rendering.

pub mod domain;
pub mod pairing;

pub use domain::fingerprint::{Fingerprint, FingerprintError, FINGERPRINT_HEX_LEN};
pub use domain::secret::{Secret, SecretError, SECRET_BYTES, SECRET_HEX_LEN};
pub use domain::trust::{TrustAnchor, TrustError};
pub use pairing::payload::{PairingPayload, PayloadError, PAYLOAD_SEPARATOR};
pub use pairing::qr::{render_png, QrRenderError, QR_IMAGE_SIZE};
pub use pairing::build_pairing_image;
