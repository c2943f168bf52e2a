//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use std::path::Path;

use image::imageops::FilterType;
pub use image::RgbaImage;

use crate::image::RgbaView;
use crate::util::{SsimError, SsimResult};

/// Creates a borrowed view from a decoded RGBA buffer.
pub fn view_from_rgba_image(img: &RgbaImage) -> SsimResult<RgbaView<'_>> {
    RgbaView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Loads an image from disk and converts it to 8-bit RGBA.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> SsimResult<RgbaImage> {
    let img = image::open(path).map_err(|err| SsimError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgba8())
}

/// Loads an image and shrinks it so its smaller side equals `limit` when both
/// sides exceed it. Smaller images are returned at their decoded size.
pub fn load_rgba_limited<P: AsRef<Path>>(path: P, limit: usize) -> SsimResult<RgbaImage> {
    let img = load_rgba(path)?;
    let (width, height) = limit_dimensions(img.width() as usize, img.height() as usize, limit);
    if width == img.width() as usize && height == img.height() as usize {
        return Ok(img);
    }
    Ok(image::imageops::resize(
        &img,
        width as u32,
        height as u32,
        FilterType::Triangle,
    ))
}

/// Target size for [`load_rgba_limited`].
pub fn limit_dimensions(width: usize, height: usize, limit: usize) -> (usize, usize) {
    if limit == 0 || width <= limit || height <= limit {
        return (width, height);
    }
    let scale = limit as f64 / width.min(height) as f64;
    let scaled = |side: usize| ((side as f64 * scale).round() as usize).max(1);
    (scaled(width), scaled(height))
}
