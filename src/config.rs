//! Scan settings and icon lists.
//!
//! `settings.json` holds the numeric scan parameters and is optional: fields
//! that are absent take the defaults below. `icons.json` maps a mode name to
//! the reference images searched in that mode:
//!
//! ```json
//! [
//!   { "name": "hs",  "file": ["icons/hs.png", "icons/hs_alt.png"] },
//!   { "name": "ptt", "file": ["icons/ptt.png"] }
//! ]
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::automation::MouseButton;
use crate::error::ConfigError;
use crate::matching::SearchParams;

/// A screen rectangle. The origin may be negative on multi-monitor setups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds the rectangle spanned by two corners given in any order. The
    /// size is the coordinate difference, so the far corner is exclusive.
    pub fn from_corners((x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> Self {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        Self {
            x: left,
            y: top,
            width: right.abs_diff(left),
            height: bottom.abs_diff(top),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Numeric scan parameters. Read once at startup, never changed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Screen area captured every scan.
    pub region: ScreenRect,
    /// Maximum per-channel difference (0-255) for two pixels to match.
    pub tolerance: u8,
    /// Coarse stride between candidate offsets. Values below 1 act as 1.
    pub scan_step: i32,
    /// Stride between verified target pixels. Values below 1 act as 1.
    pub sample_step: i32,
    /// Pause between two scan cycles.
    pub interval_secs: u64,
    /// How long the button is held down for one click.
    pub click_hold_ms: u64,
    pub button: MouseButton,
    /// Pause after a hit in per-target mode.
    pub per_target_delay_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            region: ScreenRect::new(0, 0, 730, 1080),
            tolerance: 22,
            scan_step: 1,
            sample_step: 2,
            interval_secs: 30,
            click_hold_ms: 70,
            button: MouseButton::Left,
            per_target_delay_ms: 2000,
        }
    }
}

impl ScanConfig {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            tolerance: self.tolerance,
            scan_step: self.scan_step,
            sample_step: self.sample_step,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn click_hold(&self) -> Duration {
        Duration::from_millis(self.click_hold_ms)
    }

    pub fn per_target_delay(&self) -> Duration {
        Duration::from_millis(self.per_target_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "scan region must not be empty, got {}x{}",
                self.region.width, self.region.height
            )));
        }
        Ok(())
    }
}

/// Reads `settings.json`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<ScanConfig, ConfigError> {
    if !path.exists() {
        log::info!("{} not found, using default settings", path.display());
        return Ok(ScanConfig::default());
    }
    let config: ScanConfig = read_json(path)?;
    config.validate()?;
    log::info!("Settings loaded from {}", path.display());
    Ok(config)
}

/// One named group of reference images.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconGroup {
    pub name: String,
    #[serde(rename = "file", default)]
    pub files: Vec<String>,
}

/// Reads the icon list. Unlike the settings file, this one is required.
pub fn load_icon_groups(path: &Path) -> Result<Vec<IconGroup>, ConfigError> {
    read_json(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
