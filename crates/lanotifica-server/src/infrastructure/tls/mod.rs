//! The relay's self-signed TLS identity.
//!
//! # Why self-signed? (for beginners)
//!
//! A LAN relay has no public domain name, so no public certificate authority
//! can issue it a certificate.  Instead the relay signs its own certificate
//! once, stores it next to `config.json`, and shows the phone the SHA-256
//! fingerprint of that certificate in the pairing QR code.  The phone then
//! pins that exact fingerprint (trust on first use) instead of validating a
//! chain.
//!
//! - [`cert`] issues the certificate and persists the PEM files.
//! - [`identity`] loads those files back and derives the fingerprint from
//!   what is actually on disk.

pub mod cert;
pub mod identity;

pub use cert::{load_or_create, CertError, SubjectNames};
pub use identity::Identity;
