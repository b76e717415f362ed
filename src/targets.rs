//! Reference images searched for during a scan.

use std::path::Path;

use image::RgbaImage;

use crate::config::IconGroup;
use crate::error::LoadError;

/// One reference icon.
pub struct Target {
    /// File the image was loaded from.
    pub name: String,
    pub image: RgbaImage,
}

impl Target {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.width(), self.height())
    }
}

/// Decodes an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<RgbaImage, LoadError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| LoadError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads every image listed under `mode` in `groups`, in listed order.
///
/// Files that cannot be read are logged and left out; the result may be
/// empty.
pub fn load_targets(groups: &[IconGroup], mode: &str) -> Vec<Target> {
    let mut targets = Vec::new();
    for group in groups.iter().filter(|g| g.name == mode) {
        for file in &group.files {
            match load_image(Path::new(file)) {
                Ok(image) => targets.push(Target::new(file.as_str(), image)),
                Err(e) => log::warn!("Skipping {}: {}", file, e),
            }
        }
    }
    log::info!("Loaded {} target(s) for mode '{}': {:?}", targets.len(), mode, targets);
    targets
}
