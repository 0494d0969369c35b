//! Download request and artifact types.

use std::path::PathBuf;
use std::time::Duration;

use crate::quality::Quality;

/// One acquisition request handed to the chain.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Normalized source URL
    pub url: String,
    /// Requested quality
    pub quality: Quality,
    /// Directory artifacts are written into
    pub output_dir: PathBuf,
    /// File stem for artifacts, usually the project ID
    pub file_stem: String,
}

impl DownloadRequest {
    pub fn new(
        url: impl Into<String>,
        quality: Quality,
        output_dir: impl Into<PathBuf>,
        file_stem: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            quality,
            output_dir: output_dir.into(),
            file_stem: file_stem.into(),
        }
    }
}

/// The local media file produced by a successful chain execution.
#[derive(Debug, Clone)]
pub struct MediaArtifact {
    /// Path of the downloaded file
    pub path: PathBuf,
    /// File size in bytes
    pub size_bytes: u64,
    /// Name of the strategy that produced it
    pub strategy: String,
    /// Wall-clock time the winning strategy took
    pub elapsed: Duration,
}
