/// Image handling for clothing photos
///
/// This module handles:
/// - Removing near-uniform backgrounds by color distance (matte.rs)
/// - Scaling uploads and encoding them as embeddable data URIs (prepare.rs)

pub mod matte;
pub mod prepare;

pub use matte::{remove_background, remove_background_at, remove_background_raw, BACKGROUND_TOLERANCE};
pub use prepare::{decode_data_uri, encode_data_uri, fit_dimensions, load_for_editing, MAX_UPLOAD_DIMENSION};
