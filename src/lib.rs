use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod startup_checks;
pub mod walker;
pub mod watermark;

pub use watermark::PlacementMode;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub app: AppConfig,
    pub walker: WalkerConfig,
    pub watermark: WatermarkConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalkerConfig {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatermarkConfig {
    pub text: String,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub mode: PlacementMode,
    pub jpeg_quality: Option<u8>,
    pub webp_quality: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                name: "Sukashi".to_string(),
                log_level: "info".to_string(),
            },
            walker: WalkerConfig {
                input_directory: PathBuf::from("raw"),
                output_directory: PathBuf::from("processed"),
            },
            watermark: WatermarkConfig {
                text: "CiptariaAi".to_string(),
                font_path: PathBuf::from("fonts/font.ttf"),
                font_size: 32.0,
                mode: PlacementMode::Single,
                jpeg_quality: Some(85),
                webp_quality: Some(85.0),
            },
        }
    }
}
