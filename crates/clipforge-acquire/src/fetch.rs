//! Streaming HTTP download helper shared by the non-yt-dlp strategies.

use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AcquireError, AcquireResult};

/// Stream an HTTP response body to disk.
///
/// Redirects are followed by the client. On any error the partially written
/// file is removed before the error is returned.
pub async fn stream_to_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> AcquireResult<u64> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(AcquireError::download_failed(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                file.write_all(&bytes).await?;
                written += bytes.len() as u64;
            }
            Err(e) => {
                drop(file);
                tokio::fs::remove_file(dest).await.ok();
                return Err(AcquireError::Http(e));
            }
        }
    }

    file.flush().await?;
    debug!(url = url, bytes = written, "Streamed download complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        // Point at a guaranteed-refused local port; the error path must not
        // leave a file behind.
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mp4");
        let client = reqwest::Client::new();

        let result = stream_to_file(&client, "http://127.0.0.1:1/nope", &dest).await;
        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
