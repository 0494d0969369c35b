//! Direct streaming HTTP download strategy.
//!
//! Useful for sources that serve the media file directly (or behind plain
//! redirects) without an extractor step. Cheap to try and fails fast when
//! the source is an HTML page instead of media; the chain's sanity check
//! catches those.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::error::AcquireResult;
use crate::fetch::stream_to_file;
use crate::request::DownloadRequest;
use crate::strategy::AcquisitionStrategy;

pub struct DirectHttpStrategy {
    client: reqwest::Client,
}

impl DirectHttpStrategy {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for DirectHttpStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcquisitionStrategy for DirectHttpStrategy {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch(&self, request: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()> {
        tokio::fs::create_dir_all(&request.output_dir).await?;

        let written = stream_to_file(&self.client, &request.url, dest).await?;

        info!(
            url = %request.url,
            size_mb = written as f64 / 1_048_576.0,
            "Direct HTTP download complete"
        );
        Ok(())
    }
}
