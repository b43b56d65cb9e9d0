//! QR code rendering.
//!
//! Encodes bytes at medium error correction (roughly 15% of the symbol can be
//! damaged and still scan) and scales the result to a fixed square size so
//! the home page can lay it out without measuring.

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Width and height of the rendered pairing image, in pixels.
pub const QR_IMAGE_SIZE: u32 = 256;

#[derive(Debug, Error)]
pub enum QrRenderError {
    /// The data does not fit in any QR version at the chosen level.
    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Renders `data` as a `size`×`size` greyscale PNG.
///
/// # Errors
///
/// Returns [`QrRenderError::Encode`] if `data` is too long for a QR symbol,
/// or [`QrRenderError::Png`] if PNG encoding fails.
pub fn render_png(data: &[u8], size: u32) -> Result<Vec<u8>, QrRenderError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M)
        .map_err(|e| QrRenderError::Encode(e.to_string()))?;

    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .min_dimensions(size, size)
        .build();
    // Module rendering rounds up to whole pixels per module; nearest-neighbour
    // keeps the edges sharp when snapping to the exact size.
    let scaled = imageops::resize(&modules, size, size, imageops::FilterType::Nearest);

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(scaled).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
