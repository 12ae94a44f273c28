use image::{DynamicImage, ImageEncoder, RgbaImage, codecs::jpeg::JpegEncoder};
use std::path::Path;
use tracing::debug;

use super::error::ProcessError;

/// Write `image` to `path` in the format its extension implies.
///
/// JPEG and WebP are routed through quality-aware encoders; the remaining
/// supported formats go through the codec library's extension-inferred save.
pub fn save_image(
    image: &RgbaImage,
    path: &Path,
    jpeg_quality: u8,
    webp_quality: f32,
) -> Result<(), ProcessError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => save_jpeg(image, path, jpeg_quality),
        "webp" => save_webp(image, path, webp_quality),
        _ => {
            image.save(path)?;
            Ok(())
        }
    }
}

/// Save as JPEG with the configured quality. JPEG has no alpha channel,
/// so the image is flattened to RGB first.
fn save_jpeg(image: &RgbaImage, path: &Path, quality: u8) -> Result<(), ProcessError> {
    let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let output = std::fs::File::create(path)?;

    let encoder = JpegEncoder::new_with_quality(output, quality);
    encoder.write_image(
        &rgb_image,
        rgb_image.width(),
        rgb_image.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    debug!("JPEG written at quality {}: {:?}", quality, path);
    Ok(())
}

/// Save as lossy WebP with the configured quality.
fn save_webp(image: &RgbaImage, path: &Path, quality: f32) -> Result<(), ProcessError> {
    let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let (width, height) = rgb_image.dimensions();
    let rgb_data = rgb_image.into_raw();

    let encoder = webp::Encoder::from_rgb(&rgb_data, width, height);
    let encoded_webp = encoder.encode(quality);
    std::fs::write(path, &*encoded_webp)?;

    debug!("WebP written at quality {}: {:?}", quality, path);
    Ok(())
}
