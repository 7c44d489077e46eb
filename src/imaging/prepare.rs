/// Upload preparation
///
/// Photos are scaled down to fit the editing canvas before background
/// removal, and the finished RGBA image is stored as a self-contained
/// `data:image/png;base64,...` URI.

use base64::Engine;
use image::{imageops::FilterType, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use crate::error::{ClosetError, Result};

/// Uploads are scaled to fit within this many pixels on each side
pub const MAX_UPLOAD_DIMENSION: u32 = 300;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Scale `(width, height)` to fit inside `(max_width, max_height)`
///
/// Width is constrained first, then height, preserving aspect ratio.
/// Images already inside the bounds are left alone (never upscaled).
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let mut w = width as f64;
    let mut h = height as f64;

    if w > max_width as f64 {
        h = (max_width as f64 / w) * h;
        w = max_width as f64;
    }
    if h > max_height as f64 {
        w = (max_height as f64 / h) * w;
        h = max_height as f64;
    }

    ((w as u32).max(1), (h as u32).max(1))
}

/// Decode a photo from disk and scale it for editing
///
/// Any format the `image` crate can read is accepted.
pub fn load_for_editing(path: &Path, max_dimension: u32) -> Result<RgbaImage> {
    let img = image::open(path)?.into_rgba8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Ok(img);
    }

    let (w, h) = fit_dimensions(width, height, max_dimension, max_dimension);
    if (w, h) == (width, height) {
        return Ok(img);
    }

    debug!("scaling {}x{} upload to {}x{}", width, height, w, h);
    Ok(image::imageops::resize(&img, w, h, FilterType::Lanczos3))
}

/// Encode an image as a PNG data URI
pub fn encode_data_uri(image: &RgbaImage) -> Result<String> {
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
    Ok(format!("{PNG_DATA_URI_PREFIX}{encoded}"))
}

/// Decode a base64 image data URI back into pixels
///
/// Any embedded format the `image` crate can read is accepted, not only PNG.
pub fn decode_data_uri(uri: &str) -> Result<RgbaImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ClosetError::InvalidImageData("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ClosetError::InvalidImageData("missing payload separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(ClosetError::InvalidImageData(format!(
            "unsupported encoding in '{header}'"
        )));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ClosetError::InvalidImageData(e.to_string()))?;

    Ok(image::load_from_memory(&bytes)?.into_rgba8())
}
