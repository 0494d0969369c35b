//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Orchestration and acquisition policy knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory downloaded media lands in
    pub download_dir: PathBuf,
    /// Whether exhausted acquisitions degrade into demo mode (default) or fail
    pub demo_mode: bool,
    /// Placeholder asset reference used for demo-mode resolutions
    pub placeholder_asset: String,
    /// How long a project may sit in `processing` before the stuck-job
    /// detector resumes it
    pub stale_after: Duration,
    /// Interval between detector passes
    pub detector_interval: Duration,
    /// Whether the background detector loop runs
    pub detector_enabled: bool,
    /// Upper bound for a single strategy execution
    pub per_strategy_timeout: Duration,
    /// Minimum accepted artifact size in bytes
    pub min_artifact_bytes: u64,
    /// Netscape cookies file injected by the web identity profile
    pub cookies_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("storage/downloads"),
            demo_mode: true,
            placeholder_asset: "assets/demo/placeholder.mp4".to_string(),
            stale_after: Duration::from_secs(600),
            detector_interval: Duration::from_secs(30),
            detector_enabled: true,
            per_strategy_timeout: Duration::from_secs(300),
            min_artifact_bytes: 10 * 1024,
            cookies_file: PathBuf::from("youtube-cookies.txt"),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            download_dir: std::env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            demo_mode: std::env::var("DEMO_MODE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.demo_mode),
            placeholder_asset: std::env::var("PLACEHOLDER_ASSET")
                .unwrap_or(defaults.placeholder_asset),
            stale_after: Duration::from_secs(
                std::env::var("STALE_AFTER_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            detector_interval: Duration::from_secs(
                std::env::var("STALE_DETECTION_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            detector_enabled: std::env::var("ENABLE_STALE_DETECTION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.detector_enabled),
            per_strategy_timeout: Duration::from_secs(
                std::env::var("STRATEGY_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            min_artifact_bytes: std::env::var("MIN_ARTIFACT_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_artifact_bytes),
            cookies_file: std::env::var("COOKIES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cookies_file),
        }
    }
}
