//! The acquisition strategy trait.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::AcquireResult;
use crate::request::DownloadRequest;

/// One concrete method of acquiring a remote media resource.
///
/// Strategies write to the path the chain hands them and must not leave a
/// partial file behind on failure. The chain additionally removes the
/// expected artifact after any failed attempt as a backstop.
#[async_trait]
pub trait AcquisitionStrategy: Send + Sync {
    /// Stable name used for ordering, pinning and logging (e.g. `ytdlp_web`).
    fn name(&self) -> &str;

    /// Where this strategy writes its artifact for the given request.
    fn artifact_path(&self, request: &DownloadRequest) -> PathBuf {
        request
            .output_dir
            .join(format!("{}_{}.mp4", request.file_stem, self.name()))
    }

    /// Fetch the resource into `dest`. Returns only after the file is fully
    /// written or an error occurred.
    async fn fetch(&self, request: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()>;
}
