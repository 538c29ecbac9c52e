//! Artifact writer implementations

use crate::output::traits::{Artifact, ArtifactWriter};
use crate::{CrawlError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes each artifact to `{directory}/{table}.{format}`
///
/// The directory is created on first write. Existing files are overwritten.
#[derive(Debug, Clone)]
pub struct FileArtifactWriter {
    directory: PathBuf,
    directory_ready: bool,
}

impl FileArtifactWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            directory_ready: false,
        }
    }

    /// Path an artifact will be written to
    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.directory.join(artifact.file_name())
    }
}

#[async_trait]
impl ArtifactWriter for FileArtifactWriter {
    async fn write(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        if !self.directory_ready {
            tokio::fs::create_dir_all(&self.directory)
                .await
                .map_err(|source| CrawlError::Io {
                    path: self.directory.clone(),
                    source,
                })?;
            self.directory_ready = true;
        }

        let path = self.path_for(artifact);
        tokio::fs::write(&path, artifact.content.as_bytes())
            .await
            .map_err(|source| CrawlError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Wrote {} bytes to {}", artifact.content.len(), path.display());
        Ok(path)
    }
}

/// Keeps artifacts in memory, in write order
///
/// Useful for library callers that post-process output themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactWriter {
    artifacts: Vec<Artifact>,
}

impl MemoryArtifactWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}

#[async_trait]
impl ArtifactWriter for MemoryArtifactWriter {
    async fn write(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        self.artifacts.push(artifact.clone());
        Ok(PathBuf::from(artifact.file_name()))
    }
}
