/// Reference color utilities
///
/// This module handles the colors that background removal compares against:
/// - A single clicked pixel (exact 8-bit RGB)
/// - The average of a drag-sampled run of pixels (floating point, never rounded)

use image::{Rgba, RgbaImage};

/// A reference color in RGB space
///
/// Channels are kept as `f64` so averaged samples stay exact.
/// Values are not clamped; 8-bit inputs land in 0.0..=255.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Take the RGB part of a pixel, ignoring alpha
    pub fn from_pixel(pixel: Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self::new(r as f64, g as f64, b as f64)
    }

    /// Euclidean distance in RGB space to an 8-bit color
    ///
    /// Ranges from 0.0 to ~441.67 for 8-bit inputs against an 8-bit reference.
    pub fn distance(&self, r: u8, g: u8, b: u8) -> f64 {
        let dr = r as f64 - self.r;
        let dg = g as f64 - self.g;
        let db = b as f64 - self.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f64, g as f64, b as f64)
    }
}

/// Component-wise arithmetic mean of the samples
///
/// Returns `None` for an empty list: there is nothing to compare against.
pub fn average_color(colors: &[Rgb]) -> Option<Rgb> {
    if colors.is_empty() {
        return None;
    }

    let total = colors.iter().fold(Rgb::new(0.0, 0.0, 0.0), |acc, c| {
        Rgb::new(acc.r + c.r, acc.g + c.g, acc.b + c.b)
    });
    let count = colors.len() as f64;

    Some(Rgb::new(total.r / count, total.g / count, total.b / count))
}

/// Accumulates pixel colors while the user drags across the image
///
/// Mirrors the pointer lifecycle: `begin` on press, `sample` on every move,
/// `finish` on release.
#[derive(Debug, Default, Clone)]
pub struct ColorSampler {
    samples: Vec<Rgb>,
    active: bool,
}

impl ColorSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new drag, discarding samples from any previous one
    pub fn begin(&mut self) {
        self.samples.clear();
        self.active = true;
    }

    /// Record the color at `(x, y)`
    ///
    /// Returns false if no drag is in progress or the point lies outside the image.
    pub fn sample(&mut self, image: &RgbaImage, x: u32, y: u32) -> bool {
        if !self.active {
            return false;
        }
        match image.get_pixel_checked(x, y) {
            Some(pixel) => {
                self.samples.push(Rgb::from_pixel(*pixel));
                true
            }
            None => false,
        }
    }

    /// Number of samples collected in the current drag
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// End the drag and return the averaged reference color
    pub fn finish(&mut self) -> Option<Rgb> {
        self.active = false;
        average_color(&self.samples)
    }
}
