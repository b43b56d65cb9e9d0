//! Pairing payload construction and rendering.
//!
//! - **`payload`** – the `<secret>|<fingerprint>` wire string, both directions.
//! - **`qr`** – rendering any byte string as a PNG QR code.
//!
//! [`build_pairing_image`] ties the two together for the relay's home page.

pub mod payload;
pub mod qr;

use tracing::warn;

use crate::domain::{fingerprint::Fingerprint, secret::Secret};
use payload::PairingPayload;

/// Builds the scannable pairing image for `(secret, fingerprint)`.
///
/// Deterministic for a given pair.  Returns the raw PNG bytes; callers do any
/// further encoding (e.g. base64 for a data URI) themselves.
///
/// Rendering failure never aborts the caller: a warning is logged and an
/// empty buffer is returned, so the page that embeds the image still renders.
pub fn build_pairing_image(secret: &Secret, fingerprint: &Fingerprint) -> Vec<u8> {
    let wire = PairingPayload::new(secret, fingerprint).to_wire();
    match qr::render_png(wire.as_bytes(), qr::QR_IMAGE_SIZE) {
        Ok(png) => png,
        Err(e) => {
            warn!("failed to render pairing QR code: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Secret, Fingerprint) {
        let secret = Secret::parse(&"ab".repeat(32)).unwrap();
        (secret, Fingerprint::of_der(b"certificate"))
    }

    #[test]
    fn test_build_pairing_image_returns_png() {
        let (secret, fp) = fixture();
        let png = build_pairing_image(&secret, &fp);
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_build_pairing_image_is_deterministic() {
        // Arrange
        let (secret, fp) = fixture();

        // Act
        let first = build_pairing_image(&secret, &fp);
        let second = build_pairing_image(&secret, &fp);

        // Assert
        assert_eq!(first, second);
    }
}
