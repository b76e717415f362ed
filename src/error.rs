//! Error types for the capture, pointer and configuration boundaries.

use std::path::PathBuf;

use thiserror::Error;

/// Screen capture failed. Fatal to a running scan.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no monitor available")]
    NoMonitor,
    #[error("monitor error: {0}")]
    Monitor(String),
    #[error("invalid capture rectangle ({x},{y}) {width}x{height}")]
    InvalidRect { x: i32, y: i32, width: u32, height: u32 },
    #[error("capture rectangle ({x},{y}) lies outside the {screen_w}x{screen_h} screen")]
    OutOfScreen {
        x: i32,
        y: i32,
        screen_w: u32,
        screen_h: u32,
    },
}

/// A reference image could not be read. The target is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Settings or icon list could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Pointer positioning or click injection failed.
#[derive(Debug, Error)]
pub enum PointerError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    #[error("input injection failed: {0}")]
    Injection(String),
}
