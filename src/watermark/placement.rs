use serde::{Deserialize, Serialize};

/// How watermark text instances are laid out on the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// One instance, bounding box centered on the image.
    Single,
    /// A rotated lattice of instances overflowing the canvas.
    Tiled,
}

impl PlacementMode {
    /// Blend opacity applied to the layer's contribution when compositing.
    pub fn blend_opacity(&self) -> f32 {
        match self {
            PlacementMode::Single => 0.4,
            PlacementMode::Tiled => 0.5,
        }
    }
}

/// Top-left corner of a text bounding box on the watermark layer.
/// May fall outside the canvas; drawing clips naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct PlacementPlan {
    pub anchors: Vec<Anchor>,
}

impl PlacementPlan {
    pub fn compute(
        mode: PlacementMode,
        image_width: u32,
        image_height: u32,
        text_width: u32,
        text_height: u32,
    ) -> Self {
        if text_width == 0 || text_height == 0 {
            return Self {
                anchors: Vec::new(),
            };
        }

        match mode {
            PlacementMode::Single => {
                single_centered(image_width, image_height, text_width, text_height)
            }
            PlacementMode::Tiled => {
                tiled_rotated(image_width, image_height, text_width, text_height)
            }
        }
    }
}

/// One anchor placing the text bounding box at the image center.
fn single_centered(
    image_width: u32,
    image_height: u32,
    text_width: u32,
    text_height: u32,
) -> PlacementPlan {
    let x = (image_width as i32 - text_width as i32) / 2;
    let y = (image_height as i32 - text_height as i32) / 2;

    PlacementPlan {
        anchors: vec![Anchor { x, y }],
    }
}

/// Tilt angle for the repeating pattern, in degrees.
const TILT_DEGREES: f32 = -15.0;

/// Pattern area multiplier; the grid overflows the canvas so that cropping
/// or scaling the output cannot remove all instances.
const EXPANSION: f32 = 1.5;

/// Horizontal pitch as a multiple of the text width.
const PITCH_X: f32 = 1.5;

/// Vertical pitch as a multiple of the text height.
const PITCH_Y: f32 = 1.2;

/// A grid of anchors covering 1.5x the image dimensions, each grid point
/// rotated by the tilt angle and re-centered on the image.
fn tiled_rotated(
    image_width: u32,
    image_height: u32,
    text_width: u32,
    text_height: u32,
) -> PlacementPlan {
    let spacing_x = text_width as f32 * PITCH_X;
    let spacing_y = text_height as f32 * PITCH_Y;

    let radians = TILT_DEGREES.to_radians();
    let (sin, cos) = radians.sin_cos();

    let expanded_width = image_width as f32 * EXPANSION;
    let expanded_height = image_height as f32 * EXPANSION;
    let center_x = image_width as f32 / 2.0;
    let center_y = image_height as f32 / 2.0;

    let mut anchors = Vec::new();

    let mut y = -expanded_height / 2.0;
    while y < expanded_height {
        let mut x = -expanded_width / 2.0;
        while x < expanded_width {
            let rot_x = x * cos - y * sin;
            let rot_y = x * sin + y * cos;

            anchors.push(Anchor {
                x: (rot_x + center_x).round() as i32,
                y: (rot_y + center_y).round() as i32,
            });

            x += spacing_x;
        }
        y += spacing_y;
    }

    PlacementPlan { anchors }
}
