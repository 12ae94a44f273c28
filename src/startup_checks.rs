use crate::Config;
use ab_glyph::FontVec;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Input directory does not exist: {0:?}")]
    InputDirectoryMissing(PathBuf),

    #[error("Input directory is not readable: {0:?}")]
    InputDirectoryUnreadable(PathBuf),

    #[error("Failed to create output directory: {0}")]
    OutputDirectoryCreationFailed(#[from] std::io::Error),

    #[error("Watermark font missing or unreadable: {0:?}")]
    FontUnavailable(PathBuf),

    #[error("Watermark font could not be parsed: {0:?}")]
    FontInvalid(PathBuf),
}

/// Validate the configured roots and the watermark font before any file
/// is touched. The font is parsed here so a bad font resource fails the
/// run at startup rather than on the first image.
pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let input_dir = &config.walker.input_directory;
    if !input_dir.exists() {
        error!("Input directory does not exist: {:?}", input_dir);
        errors.push(StartupCheckError::InputDirectoryMissing(input_dir.clone()));
    } else {
        match tokio::fs::read_dir(input_dir).await {
            Ok(_) => info!("Input directory is accessible: {:?}", input_dir),
            Err(e) => {
                error!("Input directory is not accessible: {}", e);
                errors.push(StartupCheckError::InputDirectoryUnreadable(
                    input_dir.clone(),
                ));
            }
        }
    }

    let output_dir = &config.walker.output_directory;
    if !output_dir.exists() {
        info!("Output directory does not exist, creating: {:?}", output_dir);
        match tokio::fs::create_dir_all(output_dir).await {
            Ok(()) => info!("Output directory created successfully"),
            Err(e) => {
                error!("Failed to create output directory: {}", e);
                errors.push(StartupCheckError::OutputDirectoryCreationFailed(e));
            }
        }
    } else {
        info!("Output directory exists: {:?}", output_dir);
    }

    let font_path = &config.watermark.font_path;
    match tokio::fs::read(font_path).await {
        Ok(font_data) => {
            if FontVec::try_from_vec(font_data).is_ok() {
                info!("Watermark font loaded: {:?}", font_path);
            } else {
                error!("Watermark font could not be parsed: {:?}", font_path);
                errors.push(StartupCheckError::FontInvalid(font_path.clone()));
            }
        }
        Err(e) => {
            error!("Watermark font missing or unreadable: {}", e);
            errors.push(StartupCheckError::FontUnavailable(font_path.clone()));
        }
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.walker.input_directory = temp_dir.path().join("raw");
        config.walker.output_directory = temp_dir.path().join("processed");
        config.watermark.font_path = temp_dir.path().join("fonts/font.ttf");
        config
    }

    #[tokio::test]
    async fn test_missing_input_directory_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, StartupCheckError::InputDirectoryMissing(_))));
    }

    #[tokio::test]
    async fn test_output_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::create_dir_all(&config.walker.input_directory).unwrap();

        // Font is still missing, so the overall check fails, but the
        // output directory must have been created regardless.
        let _ = perform_startup_checks(&config).await;
        assert!(config.walker.output_directory.exists());
    }

    #[tokio::test]
    async fn test_missing_font_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::create_dir_all(&config.walker.input_directory).unwrap();

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, StartupCheckError::FontUnavailable(_))));
    }

    #[tokio::test]
    async fn test_invalid_font_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::create_dir_all(&config.walker.input_directory).unwrap();
        std::fs::create_dir_all(config.watermark.font_path.parent().unwrap()).unwrap();
        std::fs::write(&config.watermark.font_path, b"not a font").unwrap();

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, StartupCheckError::FontInvalid(_))));
    }
}
