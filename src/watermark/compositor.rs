use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::debug;

use super::error::ProcessError;
use super::placement::PlacementPlan;
use crate::WatermarkConfig;

/// Alpha multiplier applied to the rendered layer before blending.
const LAYER_OPACITY: f32 = 0.95;

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Renders the watermark text onto a transparent layer and blends it over
/// source images. The font is loaded once at construction.
pub struct Compositor {
    config: WatermarkConfig,
    font: FontVec,
}

impl Compositor {
    pub fn new(config: WatermarkConfig) -> Result<Self, ProcessError> {
        let font_data = std::fs::read(&config.font_path)?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| ProcessError::InvalidFont(config.font_path.clone()))?;

        Ok(Self { config, font })
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.config.jpeg_quality.unwrap_or(85)
    }

    pub fn webp_quality(&self) -> f32 {
        self.config.webp_quality.unwrap_or(85.0)
    }

    /// Blend the watermark into `image` using the configured placement mode.
    ///
    /// Placement itself never fails; an empty watermark text produces an
    /// empty plan and leaves the image untouched.
    pub fn apply(&self, image: &mut RgbaImage) {
        let (image_width, image_height) = image.dimensions();

        let scale = PxScale::from(self.config.font_size);
        let (text_width, text_height) = text_size(scale, &self.font, &self.config.text);

        let plan = PlacementPlan::compute(
            self.config.mode,
            image_width,
            image_height,
            text_width,
            text_height,
        );

        debug!(
            "Placing {} watermark instance(s) on {}x{} image (text {}x{})",
            plan.anchors.len(),
            image_width,
            image_height,
            text_width,
            text_height
        );

        let mut layer = RgbaImage::new(image_width, image_height);

        for anchor in &plan.anchors {
            draw_text_mut(
                &mut layer,
                TEXT_COLOR,
                anchor.x,
                anchor.y,
                scale,
                &self.font,
                &self.config.text,
            );
        }

        scale_alpha(&mut layer, LAYER_OPACITY);

        blend_over(image, &layer, self.config.mode.blend_opacity());
    }
}

/// Multiply the alpha channel of every pixel by `factor`.
pub(crate) fn scale_alpha(layer: &mut RgbaImage, factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    for pixel in layer.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * factor).round() as u8;
    }
}

/// Source-over blend of `layer` onto `target`, with the layer's alpha
/// additionally scaled by `opacity`. The target's contribution is unscaled.
pub(crate) fn blend_over(target: &mut RgbaImage, layer: &RgbaImage, opacity: f32) {
    debug_assert_eq!(target.dimensions(), layer.dimensions());

    for (target_pixel, layer_pixel) in target.pixels_mut().zip(layer.pixels()) {
        *target_pixel = blend_pixels(*target_pixel, *layer_pixel, opacity);
    }
}

/// Porter-Duff "over": result = foreground + background * (1 - fg alpha),
/// with the extra opacity factor folded into the foreground alpha.
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if fg_alpha <= 0.0 {
        return background;
    }

    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg = fg as f32 / 255.0;
        let bg = bg as f32 / 255.0;
        let result = (fg * fg_alpha + bg * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
