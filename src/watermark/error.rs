use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Failed to parse font: {0:?}")]
    InvalidFont(PathBuf),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
