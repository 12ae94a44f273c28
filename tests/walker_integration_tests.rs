use image::{ImageBuffer, Rgb, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sukashi::walker::Walker;
use sukashi::watermark::Compositor;
use sukashi::{Config, PlacementMode};
use tempfile::TempDir;

/// Locate a usable TTF font for end-to-end runs. Tests that composite
/// real text skip themselves when none is available.
fn find_test_font() -> Option<PathBuf> {
    [
        "fonts/font.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|path| path.exists())
}

/// Helper to create a test configuration rooted in a temp directory
fn create_test_config(temp_dir: &TempDir, font_path: PathBuf) -> Config {
    let mut config = Config::default();

    config.walker.input_directory = temp_dir.path().join("raw");
    config.walker.output_directory = temp_dir.path().join("processed");
    config.watermark.font_path = font_path;

    std::fs::create_dir_all(&config.walker.input_directory).unwrap();

    config
}

fn create_walker(config: &Config) -> Walker {
    let compositor = Arc::new(Compositor::new(config.watermark.clone()).unwrap());
    Walker::new(config.walker.clone(), compositor)
}

fn write_png(path: &Path) {
    let img: RgbaImage = ImageBuffer::from_pixel(120, 90, Rgba([60, 120, 180, 255]));
    img.save(path).unwrap();
}

fn write_jpeg(path: &Path) {
    let img = ImageBuffer::from_pixel(90, 120, Rgb([180u8, 120, 60]));
    img.save(path).unwrap();
}

#[tokio::test]
async fn test_end_to_end_tree_is_mirrored() {
    let Some(font_path) = find_test_font() else {
        // Can't test without a font file
        return;
    };

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, font_path);
    let input = &config.walker.input_directory;
    let output = &config.walker.output_directory;

    write_png(&input.join("a.png"));
    std::fs::create_dir_all(input.join("sub")).unwrap();
    write_jpeg(&input.join("sub/b.jpg"));
    std::fs::write(input.join("notes.txt"), "not an image").unwrap();

    let summary = create_walker(&config).walk().await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 1);

    assert!(output.join("a.png").exists());
    assert!(output.join("sub/b.jpg").exists());
    assert!(!output.join("notes.txt").exists());

    // The mirrored copy is watermarked, not byte-identical.
    let source = image::open(input.join("a.png")).unwrap().to_rgba8();
    let processed = image::open(output.join("a.png")).unwrap().to_rgba8();
    assert_eq!(source.dimensions(), processed.dimensions());
    assert!(
        source.pixels().zip(processed.pixels()).any(|(a, b)| a != b),
        "output should differ from the source"
    );
}

#[tokio::test]
async fn test_tiled_mode_end_to_end() {
    let Some(font_path) = find_test_font() else {
        return;
    };

    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&temp_dir, font_path);
    config.watermark.mode = PlacementMode::Tiled;

    write_png(&config.walker.input_directory.join("a.png"));

    let summary = create_walker(&config).walk().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert!(config.walker.output_directory.join("a.png").exists());
}

#[tokio::test]
async fn test_directory_mirroring_is_idempotent() {
    let Some(font_path) = find_test_font() else {
        return;
    };

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, font_path);
    let input = &config.walker.input_directory;

    std::fs::create_dir_all(input.join("deep/nested")).unwrap();
    write_png(&input.join("deep/nested/c.png"));

    let walker = create_walker(&config);

    let first = walker.walk().await.unwrap();
    // Second run sees the pre-existing output directories and succeeds.
    let second = walker.walk().await.unwrap();

    assert_eq!(first.processed, 1);
    assert_eq!(second.processed, 1);
    assert_eq!(second.failed, 0);
    assert!(
        config
            .walker
            .output_directory
            .join("deep/nested/c.png")
            .exists()
    );
}

#[tokio::test]
async fn test_corrupt_file_does_not_abort_traversal() {
    let Some(font_path) = find_test_font() else {
        return;
    };

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, font_path);
    let input = &config.walker.input_directory;
    let output = &config.walker.output_directory;

    write_png(&input.join("a.png"));
    std::fs::write(input.join("corrupt.png"), b"this is not a png").unwrap();

    let summary = create_walker(&config).walk().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);

    assert!(output.join("a.png").exists());
    assert!(!output.join("corrupt.png").exists());
}

#[tokio::test]
async fn test_empty_directories_are_mirrored() {
    let Some(font_path) = find_test_font() else {
        return;
    };

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, font_path);

    std::fs::create_dir_all(config.walker.input_directory.join("empty/inner")).unwrap();

    let summary = create_walker(&config).walk().await.unwrap();

    assert_eq!(summary.processed, 0);
    assert!(config.walker.output_directory.join("empty/inner").exists());
}
