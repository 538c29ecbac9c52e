//! Output artifact types and the writer trait
//!
//! Each crawled table produces one [`Artifact`]. Writers decide where the
//! artifact ends up; the crawler only cares that it was persisted before it
//! moves on to the next table.

use crate::convert::OutputFormat;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A rendered table, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Table the artifact was produced from
    pub table_name: String,

    /// Serialization of `content`
    pub format: OutputFormat,

    /// Full document text
    pub content: String,
}

impl Artifact {
    pub fn new(table_name: impl Into<String>, format: OutputFormat, content: String) -> Self {
        Self {
            table_name: table_name.into(),
            format,
            content,
        }
    }

    /// File name for this artifact: `{table}.{format}`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.table_name, self.format.extension())
    }
}

/// Trait for artifact sinks
///
/// Implementations must have fully persisted the artifact when `write`
/// returns `Ok`.
#[async_trait]
pub trait ArtifactWriter: Send {
    /// Persists one artifact
    ///
    /// # Returns
    ///
    /// The location the artifact was written to
    async fn write(&mut self, artifact: &Artifact) -> Result<PathBuf>;
}
