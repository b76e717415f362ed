//! Cheap anchor test run before full verification.
//!
//! A candidate offset survives only if the target's top-left pixel, its four
//! corners and (for targets at least 5x5) its center all match the region.
//! Most positions fail on the very first pixel.

use image::RgbaImage;

use super::pixel::pixels_match;

/// Minimum width and height for the center pixel to be used as an anchor.
const CENTER_ANCHOR_MIN_SIDE: u32 = 5;

/// Anchor coordinates inside a `width` x `height` target.
pub fn anchor_points(width: u32, height: u32) -> Vec<(u32, u32)> {
    let (right, bottom) = (width - 1, height - 1);
    let mut anchors = vec![(0, 0), (right, 0), (0, bottom), (right, bottom)];
    if width >= CENTER_ANCHOR_MIN_SIDE && height >= CENTER_ANCHOR_MIN_SIDE {
        anchors.push((width / 2, height / 2));
    }
    anchors
}

/// Returns true when the candidate at (`x`, `y`) passes every anchor.
///
/// `anchors` is normally the output of [`anchor_points`] for `target`; the
/// search computes it once per target instead of once per position. The
/// caller guarantees the target fits inside `region` at the offset.
pub fn accepts(
    region: &RgbaImage,
    target: &RgbaImage,
    anchors: &[(u32, u32)],
    x: u32,
    y: u32,
    tolerance: u8,
) -> bool {
    if !pixels_match(region.get_pixel(x, y), target.get_pixel(0, 0), tolerance) {
        return false;
    }
    anchors.iter().all(|&(ax, ay)| {
        pixels_match(
            region.get_pixel(x + ax, y + ay),
            target.get_pixel(ax, ay),
            tolerance,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn small_targets_use_corners_only() {
        assert_eq!(anchor_points(3, 3), vec![(0, 0), (2, 0), (0, 2), (2, 2)]);
        assert_eq!(anchor_points(5, 4).len(), 4);
        assert_eq!(anchor_points(4, 5).len(), 4);
    }

    #[test]
    fn five_by_five_adds_center() {
        let anchors = anchor_points(5, 5);
        assert_eq!(anchors.len(), 5);
        assert_eq!(anchors[4], (2, 2));
        assert_eq!(anchor_points(8, 6)[4], (4, 3));
    }

    #[test]
    fn single_pixel_target_collapses_to_origin() {
        assert!(anchor_points(1, 1).iter().all(|&p| p == (0, 0)));
    }

    #[test]
    fn rejects_on_first_pixel() {
        let region = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let target = RgbaImage::from_pixel(2, 2, Rgba([200, 0, 0, 255]));
        let anchors = anchor_points(2, 2);
        assert!(!accepts(&region, &target, &anchors, 0, 0, 10));
    }

    #[test]
    fn rejects_on_corner_mismatch() {
        let mut region = RgbaImage::from_pixel(4, 4, Rgba([50, 50, 50, 255]));
        region.put_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let target = RgbaImage::from_pixel(3, 3, Rgba([50, 50, 50, 255]));
        let anchors = anchor_points(3, 3);
        // (2, 2) is the bottom-right corner of the window at the origin but
        // the unsampled middle of the window at (1, 1).
        assert!(!accepts(&region, &target, &anchors, 0, 0, 0));
        assert!(accepts(&region, &target, &anchors, 1, 1, 0));
    }

    #[test]
    fn center_mismatch_alone_rejects_five_by_five() {
        let b = Rgba([200, 180, 160, 255]);
        let target = RgbaImage::from_pixel(5, 5, b);
        let mut region = target.clone();
        region.put_pixel(2, 2, Rgba([170, 180, 160, 255]));
        let anchors = anchor_points(5, 5);

        // Every corner matches; only the center is 30 off in red.
        assert!(!accepts(&region, &target, &anchors, 0, 0, 22));
        assert!(accepts(&region, &target, &anchors, 0, 0, 30));
        assert!(accepts(&target, &target, &anchors, 0, 0, 0));
    }

    #[test]
    fn narrow_target_has_no_center_anchor() {
        let b = Rgba([200, 180, 160, 255]);
        let target = RgbaImage::from_pixel(4, 5, b);
        let mut region = target.clone();
        region.put_pixel(2, 2, Rgba([170, 180, 160, 255]));
        let anchors = anchor_points(4, 5);

        assert!(accepts(&region, &target, &anchors, 0, 0, 22));
    }

    #[test]
    fn ignores_interior_pixels_that_are_not_anchors() {
        let region = RgbaImage::from_pixel(3, 3, Rgba([50, 50, 50, 255]));
        let mut target = region.clone();
        target.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let anchors = anchor_points(3, 3);
        assert!(accepts(&region, &target, &anchors, 0, 0, 0));
    }
}
