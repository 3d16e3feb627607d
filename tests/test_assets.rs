use std::path::Path;

use rover_mission::assets::*;
use rover_mission::config::GameConfig;
use rover_mission::entities::{FallbackShape, Visual};

/// Loader that finds nothing at all.
struct EmptyLoader;

impl AssetLoader for EmptyLoader {
    fn load_image(&self, _path: &Path) -> Option<TextImage> {
        None
    }
}

/// Loader that hands out the same image for every path.
struct FixedLoader(TextImage);

impl AssetLoader for FixedLoader {
    fn load_image(&self, _path: &Path) -> Option<TextImage> {
        Some(self.0.clone())
    }
}

fn image(cols: usize, rows: usize) -> TextImage {
    TextImage {
        lines: vec!["#".repeat(cols); rows],
    }
}

#[test]
fn missing_assets_fall_back() {
    let mut store = AssetStore::default();
    let config = GameConfig::default();
    let v = load_visuals(&EmptyLoader, &mut store, Path::new("assets"), &config);
    assert_eq!(v.background, Visual::Fallback(FallbackShape::SolidFill));
    assert_eq!(v.rover.visual, Visual::Fallback(FallbackShape::SolidSquare));
    assert_eq!((v.rover.width, v.rover.height), (50.0, 50.0));
}

#[test]
fn loaded_images_go_to_the_store() {
    let mut store = AssetStore::default();
    let config = GameConfig::default();
    let v = load_visuals(&FixedLoader(image(6, 3)), &mut store, Path::new("x"), &config);

    let Visual::Image(bg) = v.background else {
        panic!("background should be an image");
    };
    let Visual::Image(rover) = v.rover.visual else {
        panic!("rover should be an image");
    };
    assert_ne!(bg, rover);
    assert_eq!(store.get(rover), Some(&image(6, 3)));
    // 6 columns × 8 px, 3 rows × 16 px: under the width cap, kept as is.
    assert_eq!((v.rover.width, v.rover.height), (48.0, 48.0));
}

#[test]
fn wide_rover_image_is_scaled_down() {
    // 20 × 8 = 160 px wide, 3 × 16 = 48 px tall → halved to fit 80 px.
    assert_eq!(scaled_rover_size(&image(20, 3), 80.0), (80.0, 24.0));
    assert_eq!(scaled_rover_size(&image(10, 2), 80.0), (80.0, 32.0));
}

#[test]
fn text_image_geometry() {
    let img = TextImage {
        lines: vec!["ab".into(), "abcd".into()],
    };
    assert_eq!(img.columns(), 4);
    assert_eq!(img.rows(), 2);
    assert_eq!(img.size_px(), (32.0, 32.0));
    assert_eq!(img.char_at(1, 0), 'b');
    assert_eq!(img.char_at(3, 0), ' ');
    assert_eq!(img.char_at(0, 5), ' ');
}

#[test]
fn fs_loader_reads_text_art() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(ROVER_IMAGE), " /\\ \n[##]\n").unwrap();

    let loaded = FsAssetLoader.load_image(&dir.path().join(ROVER_IMAGE)).unwrap();
    assert_eq!(loaded.lines, vec![" /\\ ".to_string(), "[##]".to_string()]);

    assert!(FsAssetLoader.load_image(&dir.path().join(BACKGROUND_IMAGE)).is_none());
}

#[test]
fn fs_loader_rejects_blank_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.txt");
    std::fs::write(&path, "\n   \n").unwrap();
    assert!(FsAssetLoader.load_image(&path).is_none());
}

#[test]
fn partial_assets_mix_image_and_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(BACKGROUND_IMAGE), "....\n.::.\n").unwrap();

    let mut store = AssetStore::default();
    let v = load_visuals(&FsAssetLoader, &mut store, dir.path(), &GameConfig::default());
    assert!(matches!(v.background, Visual::Image(_)));
    assert_eq!(v.rover.visual, Visual::Fallback(FallbackShape::SolidSquare));
}
