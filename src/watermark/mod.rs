// Watermark module - layer rendering, placement plans, blending, and encoding
mod compositor;
mod encode;
mod error;
mod placement;

pub use compositor::Compositor;
pub use encode::save_image;
pub use error::ProcessError;
pub use placement::{Anchor, PlacementMode, PlacementPlan};
