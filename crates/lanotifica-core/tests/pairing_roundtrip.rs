//! Integration tests for the pairing payload through the public API.
//!
//! These tests play both roles: the relay builds a payload from its secret
//! and certificate fingerprint, and the phone decodes the scanned string and
//! pins the fingerprint it found there.

use lanotifica_core::{
    build_pairing_image, Fingerprint, PairingPayload, Secret, TrustAnchor, FINGERPRINT_HEX_LEN,
    PAYLOAD_SEPARATOR, SECRET_HEX_LEN,
};

#[test]
fn test_hex_shaped_components_survive_wire_round_trip() {
    // Arrange
    let original = PairingPayload::from_parts("abc123", "DEF456");

    // Act
    let wire = original.to_wire();
    let (secret, fingerprint) = wire.split_once(PAYLOAD_SEPARATOR).expect("separator");
    let decoded = PairingPayload::parse(&wire).expect("parse");

    // Assert
    assert_eq!(secret, "abc123");
    assert_eq!(fingerprint, "DEF456");
    assert_eq!(decoded, original);
}

#[test]
fn test_generated_identity_round_trips_and_pins() {
    // Arrange: the relay side.
    let secret = Secret::generate().expect("secret");
    let cert_der = b"self-signed certificate der bytes";
    let fingerprint = Fingerprint::of_der(cert_der);
    let wire = PairingPayload::new(&secret, &fingerprint).to_wire();

    // Act: the phone side.
    let scanned = PairingPayload::parse(&wire).expect("parse");
    let scanned_secret = Secret::parse(scanned.secret()).expect("secret shape");
    let anchor = TrustAnchor::pin(Fingerprint::parse(scanned.fingerprint()).expect("fp shape"));

    // Assert
    assert_eq!(wire.len(), SECRET_HEX_LEN + 1 + FINGERPRINT_HEX_LEN);
    assert_eq!(scanned_secret, secret);
    assert!(anchor.verify(cert_der).is_ok());
    assert!(anchor.verify(b"a different certificate").is_err());
}

#[test]
fn test_pairing_image_changes_with_the_secret() {
    let fingerprint = Fingerprint::of_der(b"cert");
    let a = Secret::parse(&"1".repeat(SECRET_HEX_LEN)).unwrap();
    let b = Secret::parse(&"2".repeat(SECRET_HEX_LEN)).unwrap();

    let image_a = build_pairing_image(&a, &fingerprint);
    let image_b = build_pairing_image(&b, &fingerprint);

    assert!(!image_a.is_empty());
    assert_ne!(image_a, image_b);
}
