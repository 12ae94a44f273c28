// Walker module - Main entry point
mod core;
mod error;

// Re-export public items
pub use error::WalkError;

use std::sync::Arc;

use crate::watermark::Compositor;

pub struct Walker {
    pub(crate) config: crate::WalkerConfig,
    pub(crate) compositor: Arc<Compositor>,
}

/// Per-file outcomes aggregated over one traversal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Walker {
    pub fn new(config: crate::WalkerConfig, compositor: Arc<Compositor>) -> Self {
        Self { config, compositor }
    }
}

pub(crate) fn is_supported_image(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".jpg")
        || lower.ends_with(".jpeg")
        || lower.ends_with(".png")
        || lower.ends_with(".gif")
        || lower.ends_with(".bmp")
        || lower.ends_with(".tiff")
        || lower.ends_with(".webp")
}
