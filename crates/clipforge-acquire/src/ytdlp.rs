//! Command-line extractor strategy (yt-dlp).
//!
//! One strategy type parameterized by an [`IdentityProfile`]; the default
//! chain holds one instance per profile. Includes stealth headers, rate
//! limiting sleeps, and Netscape cookie injection for the web profile.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{AcquireError, AcquireResult};
use crate::identity::IdentityProfile;
use crate::request::DownloadRequest;
use crate::strategy::AcquisitionStrategy;

/// Writable temp path for cookies (yt-dlp saves cookies back after use).
const TEMP_COOKIES_PATH: &str = "/tmp/clipforge-cookies.txt";

/// Minimum size for a valid cookies file (bytes).
/// A real Netscape cookies file is at least ~50 bytes.
const MIN_COOKIES_FILE_SIZE: u64 = 50;

/// Guards concurrent access to the cookies file copy.
static COOKIES_LOCK: OnceLock<Mutex<bool>> = OnceLock::new();

/// Validate that a cookies file appears to be in Netscape format.
fn is_valid_netscape_cookies(content: &str) -> bool {
    if content.starts_with("# Netscape HTTP Cookie File")
        || content.starts_with("# HTTP Cookie File")
    {
        return true;
    }

    // Tab-separated cookie entries (domain\ttrue/false\t...)
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() >= 6 {
            return true;
        }
    }

    false
}

/// Get a path to a writable cookies file, copying the configured source to a
/// temp location if needed.
///
/// Returns `None` when the source file is missing, too small, or not in
/// Netscape format.
pub async fn writable_cookies_path(source: &Path) -> Option<String> {
    if !source.exists() {
        debug!("Cookies file not found at {}, skipping", source.display());
        return None;
    }

    match tokio::fs::metadata(source).await {
        Ok(metadata) => {
            if metadata.len() < MIN_COOKIES_FILE_SIZE {
                debug!(
                    "Cookies file {} is too small ({} bytes), skipping",
                    source.display(),
                    metadata.len()
                );
                return None;
            }
        }
        Err(e) => {
            warn!("Failed to read cookies file metadata: {}", e);
            return None;
        }
    }

    match tokio::fs::read_to_string(source).await {
        Ok(content) => {
            if !is_valid_netscape_cookies(&content) {
                debug!(
                    "Cookies file {} is not in valid Netscape format, skipping",
                    source.display()
                );
                return None;
            }
        }
        Err(e) => {
            warn!("Failed to read cookies file: {}", e);
            return None;
        }
    }

    let temp_path = Path::new(TEMP_COOKIES_PATH);
    let lock = COOKIES_LOCK.get_or_init(|| Mutex::new(false));

    let mut copied = lock.lock().await;

    if !*copied || !temp_path.exists() {
        match tokio::fs::copy(source, temp_path).await {
            Ok(_) => {
                debug!("Copied cookies file to writable location: {}", TEMP_COOKIES_PATH);
                *copied = true;
            }
            Err(e) => {
                warn!("Failed to copy cookies file to temp: {}", e);
                return None;
            }
        }
    }

    Some(TEMP_COOKIES_PATH.to_string())
}

/// yt-dlp acquisition strategy for one client identity.
pub struct YtDlpStrategy {
    name: String,
    profile: IdentityProfile,
    cookies_file: PathBuf,
}

impl YtDlpStrategy {
    pub fn new(profile: IdentityProfile, cookies_file: impl Into<PathBuf>) -> Self {
        Self {
            name: format!("ytdlp_{}", profile.name),
            profile,
            cookies_file: cookies_file.into(),
        }
    }

    fn extractor_args(&self) -> String {
        format!("youtube:player_client={}", self.profile.player_client)
    }
}

#[async_trait]
impl AcquisitionStrategy for YtDlpStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, request: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()> {
        which::which("yt-dlp").map_err(|_| AcquireError::YtDlpNotFound)?;

        tokio::fs::create_dir_all(&request.output_dir).await?;

        info!(
            strategy = %self.name,
            url = %request.url,
            quality = %request.quality,
            "Starting yt-dlp download"
        );

        let cookies_path = if self.profile.use_cookies {
            writable_cookies_path(&self.cookies_file).await
        } else {
            None
        };

        let extractor_args = self.extractor_args();
        let dest_str = dest.to_string_lossy();

        let mut args = vec![
            "--no-check-certificates",
            "--no-cache-dir",
            "--no-warnings",
            "--sleep-requests", "0.75",
            "--sleep-interval", "10",
            "--max-sleep-interval", "20",
            "--user-agent", self.profile.user_agent,
            "--add-header", "Accept:text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            "--add-header", "Accept-Language:en-US,en;q=0.5",
            "--add-header", "DNT:1",
            "--add-header", "Connection:keep-alive",
            "--limit-rate", "2M",
            "--concurrent-fragments", "1",
            "--extractor-args", &extractor_args,
            "-f", request.quality.format_selector(),
            "-o", &dest_str,
        ];

        let cookies_ref = cookies_path.as_deref();
        if let Some(cp) = cookies_ref {
            args.push("--cookies");
            args.push(cp);
        }
        args.push(&request.url);

        // The chain drops this future on timeout; the child must die with it
        // or it could recreate the artifact after cleanup.
        let output = Command::new("yt-dlp")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);

            let error_msg = stderr.lines().last().unwrap_or("Unknown error");
            let is_rate_limited = stderr.contains("429")
                || stderr.contains("Too Many Requests")
                || stderr.contains("rate limit")
                || stderr.contains("Sign in to confirm");

            if is_rate_limited {
                warn!(
                    strategy = %self.name,
                    url = %request.url,
                    "Rate limit / bot detection hit"
                );
                return Err(AcquireError::RateLimited(error_msg.to_string()));
            }

            return Err(AcquireError::download_failed(format!(
                "yt-dlp failed: {}",
                error_msg
            )));
        }

        if !dest.exists() {
            return Err(AcquireError::download_failed("Output file not created"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::default_profiles;

    #[test]
    fn test_netscape_header_accepted() {
        assert!(is_valid_netscape_cookies(
            "# Netscape HTTP Cookie File\n.youtube.com\tTRUE\t/\tTRUE\t0\tX\tY\n"
        ));
    }

    #[test]
    fn test_tab_separated_entries_accepted_without_header() {
        assert!(is_valid_netscape_cookies(
            ".youtube.com\tTRUE\t/\tTRUE\t1735689600\tSID\tabc123\n"
        ));
    }

    #[test]
    fn test_garbage_cookies_rejected() {
        assert!(!is_valid_netscape_cookies("this is not a cookie file"));
        assert!(!is_valid_netscape_cookies(""));
        assert!(!is_valid_netscape_cookies("# just a comment\n"));
    }

    #[test]
    fn test_strategy_names_follow_profiles() {
        let names: Vec<String> = default_profiles()
            .into_iter()
            .map(|p| YtDlpStrategy::new(p, "/tmp/none.txt").name().to_string())
            .collect();
        assert_eq!(names, vec!["ytdlp_web", "ytdlp_android", "ytdlp_ios"]);
    }

    #[tokio::test]
    async fn test_missing_cookies_file_yields_none() {
        assert!(writable_cookies_path(Path::new("/nonexistent/cookies.txt"))
            .await
            .is_none());
    }
}
