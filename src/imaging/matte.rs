/// Background removal by color distance
///
/// Every pixel within `BACKGROUND_TOLERANCE` (Euclidean RGB distance) of the
/// reference color gets its alpha set to 0. This is a global match, not a
/// flood fill: matching pixels anywhere in the image are cleared, whether or
/// not they touch the sampled point. RGB channels are never modified, so the
/// original colors survive if alpha is restored later.

use image::RgbaImage;
use tracing::debug;

use crate::color::Rgb;

/// Maximum RGB distance still counted as background (exclusive)
pub const BACKGROUND_TOLERANCE: f64 = 115.0;

/// Clear the alpha of every background-colored pixel in an image
///
/// Returns the number of pixels that matched. A zero-area image is a no-op.
pub fn remove_background(image: &mut RgbaImage, reference: Rgb) -> usize {
    let (width, height) = image.dimensions();
    let matched = remove_background_raw(image, reference);
    debug!(width, height, matched, "removed background");
    matched
}

/// Same as [`remove_background`], on a raw row-major RGBA8 buffer
///
/// A trailing partial pixel (length not a multiple of 4) is left untouched.
pub fn remove_background_raw(data: &mut [u8], reference: Rgb) -> usize {
    let mut matched = 0;

    for px in data.chunks_exact_mut(4) {
        if reference.distance(px[0], px[1], px[2]) < BACKGROUND_TOLERANCE {
            px[3] = 0;
            matched += 1;
        }
    }

    matched
}

/// Single-click entry point: use the pixel at `(x, y)` as the reference
///
/// Returns `None` if the point is outside the image. Clicking a pixel that is
/// already transparent changes nothing and matches zero pixels.
pub fn remove_background_at(image: &mut RgbaImage, x: u32, y: u32) -> Option<usize> {
    let pixel = *image.get_pixel_checked(x, y)?;
    if pixel.0[3] == 0 {
        debug!(x, y, "clicked pixel is already transparent");
        return Some(0);
    }
    Some(remove_background(image, Rgb::from_pixel(pixel)))
}
