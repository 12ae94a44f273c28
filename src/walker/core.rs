use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use super::{WalkError, WalkSummary, Walker, is_supported_image};
use crate::watermark::{self, ProcessError};

impl WalkSummary {
    fn merge(&mut self, other: WalkSummary) {
        self.processed += other.processed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

impl Walker {
    /// Walk the input tree, mirroring its directory structure into the
    /// output tree and watermarking every supported image file.
    ///
    /// Per-file failures are logged with the failing path and counted in
    /// the summary; they never abort the traversal. An error is returned
    /// only when the roots themselves are unusable.
    pub async fn walk(&self) -> Result<WalkSummary, WalkError> {
        let candidates = self.count_candidate_images();
        info!(
            "Found {} candidate image(s) under {:?}",
            candidates, self.config.input_directory
        );

        let summary = self.walk_directory(String::new()).await?;

        Ok(summary)
    }

    fn walk_directory<'a>(
        &'a self,
        relative_path: String,
    ) -> Pin<Box<dyn Future<Output = Result<WalkSummary, WalkError>> + Send + 'a>> {
        Box::pin(async move {
            let input_dir = self.config.input_directory.join(&relative_path);
            let output_dir = self.config.output_directory.join(&relative_path);

            // Pre-existing output directories are accepted; mirroring is
            // idempotent across runs.
            tokio::fs::create_dir_all(&output_dir)
                .await
                .map_err(|source| WalkError::DirectoryCreate {
                    path: output_dir.clone(),
                    source,
                })?;

            let mut entries = tokio::fs::read_dir(&input_dir).await.map_err(|source| {
                WalkError::ReadDirectory {
                    path: input_dir.clone(),
                    source,
                }
            })?;

            let mut summary = WalkSummary::default();

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(source) => {
                        return Err(WalkError::ReadDirectory {
                            path: input_dir.clone(),
                            source,
                        });
                    }
                };

                let file_name = entry.file_name().to_string_lossy().to_string();
                let child_relative = if relative_path.is_empty() {
                    file_name.clone()
                } else {
                    format!("{}/{}", relative_path, file_name)
                };

                let metadata = match entry.metadata().await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        error!("Failed to stat {:?}: {}", entry.path(), e);
                        if is_supported_image(&file_name) {
                            summary.failed += 1;
                        }
                        continue;
                    }
                };

                if metadata.is_dir() {
                    match self.walk_directory(child_relative).await {
                        Ok(child_summary) => summary.merge(child_summary),
                        Err(e) => {
                            // Nothing under this subtree can be written;
                            // sibling subtrees continue.
                            error!("Skipping subtree: {}", e);
                        }
                    }
                } else if is_supported_image(&file_name) {
                    let output_path = output_dir.join(&file_name);
                    match self.process_file(entry.path(), output_path).await {
                        Ok(()) => {
                            info!("Processed: {}", child_relative);
                            summary.processed += 1;
                        }
                        Err(e) => {
                            error!("Failed to process {:?}: {}", entry.path(), e);
                            summary.failed += 1;
                        }
                    }
                } else {
                    debug!("Ignoring unsupported entry: {}", child_relative);
                    summary.skipped += 1;
                }
            }

            Ok(summary)
        })
    }

    /// Decode, composite, and encode one file. Runs on a blocking thread;
    /// the traversal awaits completion before dispatching the next file.
    async fn process_file(
        &self,
        input_path: PathBuf,
        output_path: PathBuf,
    ) -> Result<(), ProcessError> {
        let compositor = Arc::clone(&self.compositor);
        let jpeg_quality = compositor.jpeg_quality();
        let webp_quality = compositor.webp_quality();

        tokio::task::spawn_blocking(move || -> Result<(), ProcessError> {
            let mut image = image::open(&input_path)?.to_rgba8();
            compositor.apply(&mut image);
            watermark::save_image(&image, &output_path, jpeg_quality, webp_quality)?;
            Ok(())
        })
        .await?
    }

    fn count_candidate_images(&self) -> usize {
        let mut count = 0;

        for entry in WalkDir::new(&self.config.input_directory)
            .min_depth(1)
            .into_iter()
            .flatten()
        {
            if entry.file_type().is_file()
                && let Some(name) = entry.file_name().to_str()
                && is_supported_image(name)
            {
                count += 1;
            }
        }

        count
    }
}
