//! Remote extraction relay strategy.
//!
//! Delegates extraction to a cobalt-style relay API which handles bot
//! detection on its own infrastructure, then streams the returned media URL
//! to disk. The relay answers with a `status` discriminator:
//! `stream`/`redirect` carry a direct URL, `picker` carries a list of
//! candidates, `error` carries a message.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{AcquireError, AcquireResult};
use crate::fetch::stream_to_file;
use crate::request::DownloadRequest;
use crate::strategy::AcquisitionStrategy;

/// Default public relay endpoint.
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.cobalt.tools/api/json";

#[derive(Serialize)]
struct RelayRequest<'a> {
    url: &'a str,
    #[serde(rename = "vQuality")]
    v_quality: &'a str,
    #[serde(rename = "filenamePattern")]
    filename_pattern: &'a str,
    #[serde(rename = "isAudioOnly")]
    is_audio_only: bool,
    #[serde(rename = "disableMetadata")]
    disable_metadata: bool,
}

pub struct RelayApiStrategy {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayApiStrategy {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn request_media_url(&self, request: &DownloadRequest) -> AcquireResult<String> {
        let body = RelayRequest {
            url: &request.url,
            v_quality: request.quality.relay_hint(),
            filename_pattern: "basic",
            is_audio_only: false,
            disable_metadata: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .header("Accept", "application/json")
            .send()
            .await?;

        let json: Value = response.json().await?;
        extract_media_url(&json)
    }
}

impl Default for RelayApiStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_ENDPOINT)
    }
}

/// Interpret a relay API response document.
fn extract_media_url(json: &Value) -> AcquireResult<String> {
    let status = json.get("status").and_then(Value::as_str).unwrap_or("");

    match status {
        "stream" | "redirect" => json
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AcquireError::download_failed("Relay response missing url")),
        "picker" => {
            let picker = json
                .get("picker")
                .and_then(Value::as_array)
                .filter(|items| !items.is_empty())
                .ok_or_else(|| AcquireError::download_failed("Relay picker is empty"))?;

            // Prefer the first video item, fall back to the first entry
            let item = picker
                .iter()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("video"))
                .unwrap_or(&picker[0]);

            item.get("url")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| AcquireError::download_failed("Relay picker item missing url"))
        }
        "error" => {
            let text = json
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("Relay API error");
            Err(AcquireError::download_failed(text.to_string()))
        }
        other => Err(AcquireError::download_failed(format!(
            "Unknown relay response status: {:?}",
            other
        ))),
    }
}

#[async_trait]
impl AcquisitionStrategy for RelayApiStrategy {
    fn name(&self) -> &str {
        "relay"
    }

    async fn fetch(&self, request: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()> {
        tokio::fs::create_dir_all(&request.output_dir).await?;

        let media_url = self.request_media_url(request).await?;
        info!(url = %request.url, "Relay returned media URL, downloading");

        let written = stream_to_file(&self.client, &media_url, dest).await?;
        info!(
            url = %request.url,
            size_mb = written as f64 / 1_048_576.0,
            "Relay download complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_response_carries_url() {
        let url =
            extract_media_url(&json!({"status": "stream", "url": "https://cdn/x.mp4"})).unwrap();
        assert_eq!(url, "https://cdn/x.mp4");
    }

    #[test]
    fn test_redirect_response_carries_url() {
        let url =
            extract_media_url(&json!({"status": "redirect", "url": "https://cdn/y.mp4"})).unwrap();
        assert_eq!(url, "https://cdn/y.mp4");
    }

    #[test]
    fn test_picker_prefers_video_item() {
        let url = extract_media_url(&json!({
            "status": "picker",
            "picker": [
                {"type": "photo", "url": "https://cdn/a.jpg"},
                {"type": "video", "url": "https://cdn/b.mp4"}
            ]
        }))
        .unwrap();
        assert_eq!(url, "https://cdn/b.mp4");
    }

    #[test]
    fn test_picker_falls_back_to_first_item() {
        let url = extract_media_url(&json!({
            "status": "picker",
            "picker": [{"type": "photo", "url": "https://cdn/a.jpg"}]
        }))
        .unwrap();
        assert_eq!(url, "https://cdn/a.jpg");
    }

    #[test]
    fn test_error_response_propagates_text() {
        let err = extract_media_url(&json!({"status": "error", "text": "blocked"})).unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(extract_media_url(&json!({"status": "rickroll"})).is_err());
        assert!(extract_media_url(&json!({})).is_err());
    }
}
