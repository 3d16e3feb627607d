/// Best-effort image loading with procedural fallbacks.
///
/// Images are plain text art.  A missing or unreadable file is never an
/// error for the game: it is logged and the matching fallback shape is used.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::GameConfig;
use crate::entities::{FallbackShape, ImageId, RoverTemplate, Visual};

pub const BACKGROUND_IMAGE: &str = "background.txt";
pub const ROVER_IMAGE: &str = "rover.txt";

/// Nominal pixel footprint of one text-art cell.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextImage {
    pub lines: Vec<String>,
}

impl TextImage {
    pub fn columns(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    pub fn size_px(&self) -> (f32, f32) {
        (
            self.columns() as f32 * CELL_WIDTH_PX,
            self.rows() as f32 * CELL_HEIGHT_PX,
        )
    }

    /// Character at (`col`, `row`), with short lines padded by spaces.
    pub fn char_at(&self, col: usize, row: usize) -> char {
        self.lines
            .get(row)
            .and_then(|l| l.chars().nth(col))
            .unwrap_or(' ')
    }
}

pub trait AssetLoader {
    fn load_image(&self, path: &Path) -> Option<TextImage>;
}

/// Reads text-art files from disk.
pub struct FsAssetLoader;

impl AssetLoader for FsAssetLoader {
    fn load_image(&self, path: &Path) -> Option<TextImage> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let lines: Vec<String> = text.lines().map(str::to_owned).collect();
                if lines.iter().all(|l| l.trim().is_empty()) {
                    warn!(path = %path.display(), "image is empty");
                    return None;
                }
                Some(TextImage { lines })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load image");
                None
            }
        }
    }
}

/// Images owned by the presentation side; entities only hold [`ImageId`]s.
#[derive(Debug, Default)]
pub struct AssetStore {
    images: Vec<TextImage>,
}

impl AssetStore {
    pub fn insert(&mut self, image: TextImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn get(&self, id: ImageId) -> Option<&TextImage> {
        self.images.get(id.0)
    }
}

/// Visuals decided once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visuals {
    pub background: Visual,
    pub rover: RoverTemplate,
}

/// Rover size for a loaded image: images wider than `max_width` shrink
/// proportionally.
pub fn scaled_rover_size(image: &TextImage, max_width: f32) -> (f32, f32) {
    let (w, h) = image.size_px();
    if w > max_width {
        let k = max_width / w;
        ((w * k).floor(), (h * k).floor())
    } else {
        (w, h)
    }
}

pub fn load_visuals(
    loader: &dyn AssetLoader,
    store: &mut AssetStore,
    dir: &Path,
    config: &GameConfig,
) -> Visuals {
    let background = match loader.load_image(&dir.join(BACKGROUND_IMAGE)) {
        Some(image) => Visual::Image(store.insert(image)),
        None => {
            warn!("background image unavailable, using solid fill");
            Visual::Fallback(FallbackShape::SolidFill)
        }
    };

    let rover = match loader.load_image(&dir.join(ROVER_IMAGE)) {
        Some(image) => {
            let (width, height) = scaled_rover_size(&image, config.rover_max_image_width);
            if width > 0.0 && height > 0.0 {
                info!(width, height, "rover image loaded");
                RoverTemplate {
                    width,
                    height,
                    visual: Visual::Image(store.insert(image)),
                }
            } else {
                warn!("rover image has no size, using fallback square");
                RoverTemplate::fallback(config.rover_size)
            }
        }
        None => {
            warn!("rover image unavailable, using fallback square");
            RoverTemplate::fallback(config.rover_size)
        }
    };

    Visuals { background, rover }
}

pub fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
