//! Output module for persisting crawl results
//!
//! This module handles:
//! - The artifact type produced for each crawled table
//! - Writers that persist artifacts (filesystem, in-memory)
//! - The summary of a completed crawl

pub mod stats;
mod traits;
mod writer;

pub use stats::{print_summary, CrawlSummary};
pub use traits::{Artifact, ArtifactWriter};
pub use writer::{FileArtifactWriter, MemoryArtifactWriter};
