//! Domain entities for LaNotifica pairing.
//!
//! These types carry the two invariants every other component relies on:
//!
//! - a [`secret::Secret`] is always 64 hex characters;
//! - a [`fingerprint::Fingerprint`] is always 64 uppercase hex characters.
//!
//! Both are validated at construction, so any value that exists in memory is
//! already well-formed and can be shared freely between concurrent readers.

pub mod fingerprint;
pub mod secret;
pub mod trust;
