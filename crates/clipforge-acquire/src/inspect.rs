//! Media info lookup.
//!
//! Runs once at project creation to pre-populate metadata before
//! acquisition starts. Exposed behind a trait so the orchestrator can be
//! tested without spawning processes.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use clipforge_models::MediaInfo;

use crate::error::{AcquireError, AcquireResult};

/// Info-lookup collaborator interface.
#[async_trait]
pub trait MediaInspector: Send + Sync {
    /// Fetch title, duration and thumbnail for a source URL.
    async fn inspect(&self, url: &str) -> AcquireResult<MediaInfo>;
}

/// yt-dlp backed inspector (`--dump-json`).
#[derive(Default)]
pub struct YtDlpInspector;

impl YtDlpInspector {
    pub fn new() -> Self {
        Self
    }

    /// List available formats for a URL (`yt-dlp -F`), for diagnostics.
    pub async fn list_formats(&self, url: &str) -> AcquireResult<String> {
        which::which("yt-dlp").map_err(|_| AcquireError::YtDlpNotFound)?;

        let output = Command::new("yt-dlp")
            .args(["--no-warnings", "-F", url])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcquireError::info_lookup_failed(
                stderr.lines().last().unwrap_or("Unknown error").to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl MediaInspector for YtDlpInspector {
    async fn inspect(&self, url: &str) -> AcquireResult<MediaInfo> {
        which::which("yt-dlp").map_err(|_| AcquireError::YtDlpNotFound)?;

        let output = Command::new("yt-dlp")
            .args(["--no-warnings", "--dump-json", url])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp --dump-json stderr: {}", stderr);
            return Err(AcquireError::info_lookup_failed(
                stderr.lines().last().unwrap_or("Unknown error").to_string(),
            ));
        }

        let json: Value = serde_json::from_slice(&output.stdout)?;
        Ok(parse_media_info(&json))
    }
}

/// Extract the fields we keep from a yt-dlp info JSON document.
fn parse_media_info(json: &Value) -> MediaInfo {
    MediaInfo {
        title: json
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Untitled")
            .to_string(),
        duration_seconds: json.get("duration").and_then(Value::as_f64),
        thumbnail_url: json
            .get("thumbnail")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_info() {
        let info = parse_media_info(&json!({
            "title": "How to ship",
            "duration": 1234.0,
            "thumbnail": "https://i.ytimg.com/vi/abc/hq720.jpg",
            "uploader": "someone"
        }));
        assert_eq!(info.title, "How to ship");
        assert_eq!(info.duration_seconds, Some(1234.0));
        assert!(info.thumbnail_url.unwrap().contains("ytimg"));
    }

    #[test]
    fn test_parse_sparse_info() {
        let info = parse_media_info(&json!({}));
        assert_eq!(info.title, "Untitled");
        assert_eq!(info.duration_seconds, None);
        assert_eq!(info.thumbnail_url, None);
    }
}
