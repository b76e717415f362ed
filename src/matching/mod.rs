//! # Subimage Search
//!
//! Finds a small reference icon inside a captured screen region.
//!
//! ## Algorithm
//! Candidate top-left offsets are visited in raster order (top to bottom,
//! left to right) at the scan stride. Each candidate goes through two phases:
//! - **Prefilter** ([`prefilter`]): the target's first pixel, its corners and
//!   its center are compared; almost every position is rejected here.
//! - **Verification** ([`verify`]): a grid of target pixels at the sample
//!   stride, plus the bottom row and right column.
//!
//! The first verified candidate wins. There is no scoring, so equal matches
//! always resolve to the smallest y, then the smallest x.
//!
//! ## Tolerance
//! Pixels are compared channel by channel on RGBA8 values; see
//! [`pixel::pixels_match`].

pub mod pixel;
pub mod prefilter;
pub mod verify;

use image::RgbaImage;

use verify::verify_match;

/// Top-left offset of a match, in region coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub x: u32,
    pub y: u32,
}

/// Stride actually used for a configured step. Zero and negative values
/// become 1 so that every loop makes progress.
pub fn effective_step(step: i32) -> u32 {
    step.max(1) as u32
}

/// Search parameters shared by every target in a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub tolerance: u8,
    pub scan_step: i32,
    pub sample_step: i32,
}

/// Returns the first offset at which `target` matches inside `region`.
///
/// Targets with a zero dimension, or larger than the region on either axis,
/// return `None` without any pixel being read.
pub fn find_subimage(region: &RgbaImage, target: &RgbaImage, params: SearchParams) -> Option<Match> {
    let (rw, rh) = region.dimensions();
    let (tw, th) = target.dimensions();
    if tw == 0 || th == 0 || tw > rw || th > rh {
        return None;
    }

    let step = effective_step(params.scan_step) as usize;
    let anchors = prefilter::anchor_points(tw, th);

    for y in (0..=rh - th).step_by(step) {
        for x in (0..=rw - tw).step_by(step) {
            if !prefilter::accepts(region, target, &anchors, x, y, params.tolerance) {
                continue;
            }
            if verify_match(region, target, x, y, params.tolerance, params.sample_step) {
                return Some(Match { x, y });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const A: Rgba<u8> = Rgba([20, 40, 60, 255]);
    const B: Rgba<u8> = Rgba([200, 180, 160, 255]);

    fn params(tolerance: u8, scan_step: i32, sample_step: i32) -> SearchParams {
        SearchParams {
            tolerance,
            scan_step,
            sample_step,
        }
    }

    fn paint(img: &mut RgbaImage, x0: u32, y0: u32, patch: &RgbaImage) {
        for (x, y, p) in patch.enumerate_pixels() {
            img.put_pixel(x0 + x, y0 + y, *p);
        }
    }

    fn patterned(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8, 255])
        })
    }

    #[test]
    fn block_in_solid_region_is_found() {
        let mut region = RgbaImage::from_pixel(10, 10, A);
        let target = RgbaImage::from_pixel(3, 3, B);
        paint(&mut region, 4, 4, &target);

        assert_eq!(find_subimage(&region, &target, params(0, 1, 1)), Some(Match { x: 4, y: 4 }));
    }

    #[test]
    fn identical_images_match_at_origin() {
        let target = patterned(9, 7);
        let region = target.clone();
        for scan in [-1, 0, 1, 2, 5] {
            for sample in [-1, 0, 1, 2, 4] {
                assert_eq!(
                    find_subimage(&region, &target, params(0, scan, sample)),
                    Some(Match { x: 0, y: 0 }),
                    "scan {scan} sample {sample}"
                );
            }
        }
    }

    #[test]
    fn absent_target_is_not_found_for_any_stride() {
        let region = RgbaImage::from_pixel(40, 30, A);
        let target = patterned(6, 6);
        for scan in [-5, 0, 1, 3, 100] {
            for sample in [-5, 0, 1, 3, 100] {
                assert_eq!(find_subimage(&region, &target, params(10, scan, sample)), None);
            }
        }
    }

    #[test]
    fn earliest_match_in_raster_order_wins() {
        let target = RgbaImage::from_pixel(2, 2, B);
        let mut region = RgbaImage::from_pixel(12, 12, A);
        paint(&mut region, 7, 2, &target);
        paint(&mut region, 1, 8, &target);
        paint(&mut region, 3, 2, &target);

        for _ in 0..3 {
            assert_eq!(find_subimage(&region, &target, params(0, 1, 1)), Some(Match { x: 3, y: 2 }));
        }
    }

    #[test]
    fn degenerate_targets_are_rejected() {
        let region = RgbaImage::from_pixel(5, 5, A);
        assert_eq!(find_subimage(&region, &RgbaImage::new(0, 3), params(255, 1, 1)), None);
        assert_eq!(find_subimage(&region, &RgbaImage::new(3, 0), params(255, 1, 1)), None);
        assert_eq!(find_subimage(&region, &RgbaImage::from_pixel(6, 2, A), params(255, 1, 1)), None);
        assert_eq!(find_subimage(&region, &RgbaImage::from_pixel(2, 6, A), params(255, 1, 1)), None);
    }

    #[test]
    fn degenerate_inputs_read_no_pixels() {
        // `get_pixel` panics on any coordinate of an image with no pixels, so
        // returning at all shows that nothing was read from the empty side.
        let region = RgbaImage::from_pixel(5, 5, A);
        let tolerant = params(255, 0, 0);
        assert_eq!(find_subimage(&region, &RgbaImage::new(0, 0), tolerant), None);
        assert_eq!(find_subimage(&region, &RgbaImage::new(0, 5), tolerant), None);
        assert_eq!(find_subimage(&region, &RgbaImage::new(5, 0), tolerant), None);

        let target = RgbaImage::from_pixel(1, 1, A);
        assert_eq!(find_subimage(&RgbaImage::new(0, 0), &target, tolerant), None);
        assert_eq!(find_subimage(&RgbaImage::new(4, 0), &target, tolerant), None);
        assert_eq!(find_subimage(&RgbaImage::new(0, 4), &target, tolerant), None);
    }

    #[test]
    #[should_panic]
    fn reading_an_empty_image_panics() {
        // Backs the assumption made in `degenerate_inputs_read_no_pixels`.
        let _ = RgbaImage::new(0, 3).get_pixel(0, 0);
    }

    #[test]
    fn zero_scan_step_behaves_like_one() {
        let target = patterned(4, 3);
        let mut region = RgbaImage::from_pixel(15, 11, A);
        paint(&mut region, 7, 5, &target);

        let with_zero = find_subimage(&region, &target, params(0, 0, 1));
        let with_one = find_subimage(&region, &target, params(0, 1, 1));
        assert_eq!(with_zero, Some(Match { x: 7, y: 5 }));
        assert_eq!(with_zero, with_one);
    }

    #[test]
    fn coarse_scan_only_visits_stride_positions() {
        let target = patterned(3, 3);
        let mut region = RgbaImage::from_pixel(12, 12, A);
        paint(&mut region, 5, 4, &target);

        assert_eq!(find_subimage(&region, &target, params(0, 2, 1)), None);
        assert_eq!(find_subimage(&region, &target, params(0, 1, 1)), Some(Match { x: 5, y: 4 }));
    }

    #[test]
    fn tolerance_absorbs_small_color_drift() {
        let target = RgbaImage::from_pixel(5, 5, B);
        let mut region = RgbaImage::from_pixel(10, 10, A);
        let drifted = RgbaImage::from_pixel(5, 5, Rgba([215, 170, 160, 255]));
        paint(&mut region, 2, 3, &drifted);

        assert_eq!(find_subimage(&region, &target, params(14, 1, 2)), None);
        assert_eq!(find_subimage(&region, &target, params(15, 1, 2)), Some(Match { x: 2, y: 3 }));
    }

    #[test]
    fn center_anchor_rejects_off_center_pixel() {
        let mut region = RgbaImage::from_pixel(10, 10, A);
        let block = RgbaImage::from_pixel(5, 5, B);
        paint(&mut region, 3, 3, &block);

        let mut target = block.clone();
        let Rgba([r, g, b, a]) = B;
        target.put_pixel(2, 2, Rgba([r - 30, g, b, a]));

        // A sample step of 10 verifies only (0, 0), the bottom-left and the
        // top-right pixel of a 5x5 target, so only the center anchor sees the
        // changed pixel.
        assert_eq!(find_subimage(&region, &target, params(22, 1, 10)), None);
        assert_eq!(find_subimage(&region, &target, params(30, 1, 10)), Some(Match { x: 3, y: 3 }));
    }
}
