//! Turns a match into a click on the screen.

use std::time::Duration;

use crate::automation::{MouseButton, Pointer, PointerGuard};
use crate::config::ScreenRect;
use crate::error::PointerError;
use crate::matching::Match;
use crate::targets::Target;

/// Absolute screen point at the visual center of a matched target.
pub fn click_point(region: ScreenRect, target: &Target, offset: Match) -> (i32, i32) {
    let x = i64::from(region.x) + i64::from(offset.x) + i64::from(target.width() / 2);
    let y = i64::from(region.y) + i64::from(offset.y) + i64::from(target.height() / 2);
    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Clicks the center of `target` and puts the pointer back afterwards.
///
/// Returns the clicked point. The pointer is restored even when the click
/// fails.
pub fn click_target<P: Pointer + ?Sized>(
    pointer: &mut P,
    region: ScreenRect,
    target: &Target,
    offset: Match,
    button: MouseButton,
    hold: Duration,
) -> Result<(i32, i32), PointerError> {
    let (x, y) = click_point(region, target, offset);
    let mut guard = PointerGuard::acquire(pointer)?;
    log::debug!("Clicking {} at ({}, {}), pointer returns to {:?}", target.name, x, y, guard.home());
    guard.click_at(x, y, button, hold)?;
    Ok((x, y))
}
