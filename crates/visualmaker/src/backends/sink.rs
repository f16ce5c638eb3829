//! Export to a directory

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::core::{DownloadError, DownloadSink, RasterImage};

/// Saves exported images under a fixed directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait(?Send)]
impl DownloadSink for DirectorySink {
    async fn download(&self, filename: &str, image: &RasterImage) -> Result<(), DownloadError> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(DownloadError::failed(format!("invalid file name '{filename}'")));
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, image.png())?;
        debug!(path = %path.display(), bytes = image.png().len(), "Wrote exported image");
        Ok(())
    }
}
