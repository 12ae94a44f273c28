use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Failed to create output directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read directory {path:?}: {source}")]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}
