//! Criterion benchmarks for pairing payload construction.
//!
//! The pairing image is rendered once per process start, so this mainly
//! guards against a QR or PNG dependency upgrade making startup noticeably
//! slower.
//!
//! Run with:
//! ```bash
//! cargo bench --package lanotifica-core --bench pairing_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lanotifica_core::{
    build_pairing_image, render_png, Fingerprint, PairingPayload, Secret, QR_IMAGE_SIZE,
};

fn fixture() -> (Secret, Fingerprint) {
    let secret = Secret::parse(&"5a".repeat(32)).expect("valid secret");
    let fingerprint = Fingerprint::of_der(&[0x30u8; 512]);
    (secret, fingerprint)
}

fn bench_fingerprint(c: &mut Criterion) {
    let der = vec![0x30u8; 600];
    c.bench_function("fingerprint_of_600_byte_der", |b| {
        b.iter(|| Fingerprint::of_der(black_box(&der)))
    });
}

fn bench_wire(c: &mut Criterion) {
    let (secret, fingerprint) = fixture();
    let wire = PairingPayload::new(&secret, &fingerprint).to_wire();

    c.bench_function("payload_to_wire", |b| {
        b.iter(|| PairingPayload::new(black_box(&secret), black_box(&fingerprint)).to_wire())
    });
    c.bench_function("payload_parse", |b| {
        b.iter(|| PairingPayload::parse(black_box(&wire)))
    });
}

fn bench_render(c: &mut Criterion) {
    let (secret, fingerprint) = fixture();
    let wire = PairingPayload::new(&secret, &fingerprint).to_wire();

    c.bench_function("render_png_256", |b| {
        b.iter(|| render_png(black_box(wire.as_bytes()), QR_IMAGE_SIZE))
    });
    c.bench_function("build_pairing_image", |b| {
        b.iter(|| build_pairing_image(black_box(&secret), black_box(&fingerprint)))
    });
}

criterion_group!(benches, bench_fingerprint, bench_wire, bench_render);
criterion_main!(benches);
