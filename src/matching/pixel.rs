//! Per-channel pixel comparison.

use image::Rgba;

/// Returns true when every channel (R, G, B and A) of `a` and `b` differs by
/// at most `tolerance`.
pub fn pixels_match(a: &Rgba<u8>, b: &Rgba<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(ca, cb)| ca.abs_diff(*cb) <= tolerance)
}
