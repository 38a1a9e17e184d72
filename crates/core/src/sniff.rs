//! Byte and text content-type sniffing.
//!
//! Small seam over the `image` crate's magic-number detection, plus an SVG
//! text probe (SVG has no raster header) and a coarse diagnostic label for
//! walker node text. Favicon validation depends on these to turn fetched
//! bytes into a media type and pixel dimensions.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::lexicon::looks_like_html;

/// Sniffs the media type of raw bytes.
///
/// Returns labels like `"image/png"`, `"image/ico"`, `"image/svg"`, or
/// `None` when the bytes are not a recognizable image.
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if is_svg(bytes) {
        return Some("image/svg");
    }

    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Some("image/png"),
        Ok(ImageFormat::Ico) => Some("image/ico"),
        Ok(ImageFormat::Gif) => Some("image/gif"),
        Ok(ImageFormat::Jpeg) => Some("image/jpeg"),
        Ok(format) => Some(format.to_mime_type()),
        Err(_) => None,
    }
}

/// Decodes the pixel dimensions of a raster image from its header.
///
/// SVG reports `None`: it has no intrinsic raster size, and callers treat a
/// valid SVG as 0x0.
pub fn decode_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if is_svg(bytes) {
        return None;
    }
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format().ok()?;
    reader.into_dimensions().ok()
}

/// Text probe for SVG: an `<svg>` root, optionally behind an XML prolog.
fn is_svg(bytes: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    let trimmed = text.trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && trimmed.contains("<svg"))
}

/// Coarse content label for a walker node's raw text. Diagnostic only.
pub fn sniff_text_label(text: &str) -> &'static str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "inode/x-empty";
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return "application/json";
    }
    if looks_like_html(trimmed) {
        return "text/html";
    }
    "text/plain"
}
