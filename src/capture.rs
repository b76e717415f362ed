//! Screen capture.
//!
//! [`ScreenSource`] turns a screen rectangle into an RGBA pixel buffer.
//! [`XcapScreen`] grabs the primary monitor with xcap and crops the
//! requested rectangle out of it.

use image::RgbaImage;
use xcap::Monitor;

use crate::config::ScreenRect;
use crate::error::CaptureError;

/// Snapshot of one screen rectangle. The pixel buffer can be smaller than
/// `rect` when the rectangle was clipped at the screen edge.
pub struct Region {
    pub rect: ScreenRect,
    pub pixels: RgbaImage,
}

pub trait ScreenSource {
    fn capture(&mut self, rect: ScreenRect) -> Result<RgbaImage, CaptureError>;

    fn capture_region(&mut self, rect: ScreenRect) -> Result<Region, CaptureError> {
        let pixels = self.capture(rect)?;
        Ok(Region { rect, pixels })
    }
}

impl<S: ScreenSource + ?Sized> ScreenSource for &mut S {
    fn capture(&mut self, rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
        (**self).capture(rect)
    }
}

/// Captures from the first monitor xcap reports.
#[derive(Default)]
pub struct XcapScreen;

impl XcapScreen {
    pub fn new() -> Self {
        Self
    }

    fn capture_screen(&self) -> Result<RgbaImage, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Monitor(e.to_string()))?;
        let monitor = monitors.first().ok_or(CaptureError::NoMonitor)?;
        let screen = monitor
            .capture_image()
            .map_err(|e| CaptureError::Monitor(e.to_string()))?;
        // Rebuild through raw bytes so the buffer type is ours, not xcap's.
        RgbaImage::from_raw(screen.width(), screen.height(), screen.into_raw())
            .ok_or_else(|| CaptureError::Monitor("capture returned a malformed buffer".into()))
    }
}

impl ScreenSource for XcapScreen {
    fn capture(&mut self, rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
        if rect.is_empty() {
            return Err(CaptureError::InvalidRect {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            });
        }
        let screen = self.capture_screen()?;
        crop_to_screen(&screen, rect)
    }
}

/// Crops `rect` out of a full-screen buffer, clipping at the screen edges.
pub fn crop_to_screen(screen: &RgbaImage, rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
    let (screen_w, screen_h) = screen.dimensions();
    let left = i64::from(rect.x).max(0);
    let top = i64::from(rect.y).max(0);
    let right = (i64::from(rect.x) + i64::from(rect.width)).min(i64::from(screen_w));
    let bottom = (i64::from(rect.y) + i64::from(rect.height)).min(i64::from(screen_h));
    if left >= right || top >= bottom {
        return Err(CaptureError::OutOfScreen {
            x: rect.x,
            y: rect.y,
            screen_w,
            screen_h,
        });
    }
    Ok(image::imageops::crop_imm(
        screen,
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    )
    .to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn screen() -> RgbaImage {
        RgbaImage::from_fn(20, 10, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn crop_inside_screen() {
        let crop = crop_to_screen(&screen(), ScreenRect::new(3, 4, 5, 2)).unwrap();
        assert_eq!(crop.dimensions(), (5, 2));
        assert_eq!(*crop.get_pixel(0, 0), Rgba([3, 4, 0, 255]));
        assert_eq!(*crop.get_pixel(4, 1), Rgba([7, 5, 0, 255]));
    }

    #[test]
    fn crop_is_clipped_at_screen_edge() {
        let crop = crop_to_screen(&screen(), ScreenRect::new(15, 8, 730, 1080)).unwrap();
        assert_eq!(crop.dimensions(), (5, 2));

        let crop = crop_to_screen(&screen(), ScreenRect::new(-4, -2, 6, 5)).unwrap();
        assert_eq!(crop.dimensions(), (2, 3));
        assert_eq!(*crop.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn empty_rect_is_rejected_before_capturing() {
        let err = XcapScreen::new()
            .capture(ScreenRect::new(-5, 7, 0, u32::MAX))
            .unwrap_err();
        match err {
            CaptureError::InvalidRect { x, y, width, height } => {
                assert_eq!((x, y, width, height), (-5, 7, 0, u32::MAX));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn crop_outside_screen_fails() {
        let err = crop_to_screen(&screen(), ScreenRect::new(25, 0, 10, 10)).unwrap_err();
        assert!(matches!(err, CaptureError::OutOfScreen { .. }));
        assert!(crop_to_screen(&screen(), ScreenRect::new(-10, 0, 10, 10)).is_err());
    }
}
