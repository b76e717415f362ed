//! Sampled verification of a prefilter-accepted candidate.

use image::RgbaImage;

use super::effective_step;
use super::pixel::pixels_match;

/// Checks the target against the region at offset (`off_x`, `off_y`).
///
/// Target pixels are sampled on a grid starting at (0, 0) with
/// `max(1, sample_step)` spacing. With a spacing above 1 the grid may stop
/// short of the last row and column, so the bottom row and right column are
/// then sampled as well at the same spacing.
pub fn verify_match(
    region: &RgbaImage,
    target: &RgbaImage,
    off_x: u32,
    off_y: u32,
    tolerance: u8,
    sample_step: i32,
) -> bool {
    let step = effective_step(sample_step);
    let (tw, th) = target.dimensions();
    let matches_at = |tx: u32, ty: u32| {
        pixels_match(
            region.get_pixel(off_x + tx, off_y + ty),
            target.get_pixel(tx, ty),
            tolerance,
        )
    };

    for ty in (0..th).step_by(step as usize) {
        for tx in (0..tw).step_by(step as usize) {
            if !matches_at(tx, ty) {
                return false;
            }
        }
    }

    if step > 1 {
        let bottom = th - 1;
        if !(0..tw).step_by(step as usize).all(|tx| matches_at(tx, bottom)) {
            return false;
        }
        let right = tw - 1;
        if !(0..th).step_by(step as usize).all(|ty| matches_at(right, ty)) {
            return false;
        }
    }
    true
}
