//! Headless-browser proxy strategy.
//!
//! Last-resort fallback: drive a headless Chromium against a public
//! downloader page, scrape the media link out of the rendered DOM, and
//! stream it to disk. Only usable when a browser engine exists on the host,
//! which is established once per process by [`BrowserProbe`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{AcquireError, AcquireResult};
use crate::fetch::stream_to_file;
use crate::request::DownloadRequest;
use crate::strategy::AcquisitionStrategy;

/// Default proxy downloader page.
pub const DEFAULT_PROXY_PAGE: &str = "https://en.savefrom.net/1-youtube-video-downloader-524/";

/// Binaries tried on PATH, in order.
const PATH_CANDIDATES: &[&str] = &["google-chrome", "chromium", "chromium-browser"];

/// Cache roots scanned for an unpacked browser when PATH has none.
const SCAN_ROOTS: &[&str] = &["/opt/render/.cache/puppeteer", "/root/.cache/puppeteer"];

/// Process-wide capability probe for a renderable browser engine.
///
/// The probe is expensive (PATH lookups plus a directory walk), so the
/// result is computed once behind a single-flight cell and shared read-only
/// across all chain executions afterwards.
#[derive(Default)]
pub struct BrowserProbe {
    cell: OnceCell<Option<PathBuf>>,
}

impl BrowserProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the browser binary, memoized for the process lifetime.
    pub async fn probe(&self) -> Option<&PathBuf> {
        self.cell
            .get_or_init(|| async {
                let found = resolve_browser().await;
                match &found {
                    Some(path) => info!(path = %path.display(), "Browser engine found"),
                    None => warn!("No browser engine available, browser strategy disabled"),
                }
                found
            })
            .await
            .as_ref()
    }
}

async fn resolve_browser() -> Option<PathBuf> {
    for candidate in PATH_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Some(path);
        }
    }

    for root in SCAN_ROOTS {
        if let Some(path) = find_chrome_in_dir(Path::new(root)).await {
            return Some(path);
        }
    }

    None
}

/// Recursively look for an unpacked `chrome` binary under `dir`.
///
/// Matches the layout browser fetchers use (`.../chrome-linux64/chrome`).
async fn find_chrome_in_dir(dir: &Path) -> Option<PathBuf> {
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(_) => continue, // restricted dirs are fine to skip
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            match entry.file_type().await {
                Ok(ft) if ft.is_dir() => stack.push(path),
                Ok(ft) if ft.is_file() => {
                    let is_chrome = path.file_name().is_some_and(|n| n == "chrome");
                    let in_linux_dir = path
                        .parent()
                        .and_then(Path::to_str)
                        .is_some_and(|p| p.contains("chrome-linux"));
                    if is_chrome && in_linux_dir {
                        return Some(path);
                    }
                }
                _ => {}
            }
        }
    }

    None
}

/// Extract the first plausible media link from a rendered DOM.
///
/// The proxy page renders download anchors; we take the first href that
/// looks like a direct video URL.
fn extract_media_link(dom: &str) -> Option<String> {
    for marker in ["class=\"download-icon\"", "class=\"link-download\""] {
        if let Some(anchor_at) = dom.find(marker) {
            let around = &dom[anchor_at.saturating_sub(2048)..];
            if let Some(link) = first_href(around) {
                return Some(link);
            }
        }
    }

    // Fallback: any href pointing at an mp4
    let mut rest = dom;
    while let Some(link) = first_href(rest) {
        if link.contains(".mp4") || link.contains("googlevideo") {
            return Some(link);
        }
        let after = rest.find("href=\"").map(|i| i + 6).unwrap_or(rest.len());
        rest = &rest[after..];
    }

    None
}

fn first_href(fragment: &str) -> Option<String> {
    let start = fragment.find("href=\"")? + 6;
    let end = fragment[start..].find('"')? + start;
    let href = &fragment[start..end];
    if href.starts_with("http") {
        Some(href.to_string())
    } else {
        None
    }
}

/// Headless-browser proxy strategy.
pub struct BrowserProxyStrategy {
    probe: Arc<BrowserProbe>,
    client: reqwest::Client,
    proxy_page: String,
}

impl BrowserProxyStrategy {
    pub fn new(probe: Arc<BrowserProbe>, proxy_page: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            probe,
            client,
            proxy_page: proxy_page.into(),
        }
    }
}

#[async_trait]
impl AcquisitionStrategy for BrowserProxyStrategy {
    fn name(&self) -> &str {
        "browser"
    }

    async fn fetch(&self, request: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()> {
        let browser = self
            .probe
            .probe()
            .await
            .ok_or(AcquireError::BrowserUnavailable)?
            .clone();

        tokio::fs::create_dir_all(&request.output_dir).await?;

        let page_url = format!(
            "{}#url={}",
            self.proxy_page,
            urlencode(&request.url)
        );

        info!(
            browser = %browser.display(),
            "Rendering proxy downloader page headless"
        );

        let output = Command::new(&browser)
            .args([
                "--headless=new",
                "--disable-gpu",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--virtual-time-budget=15000",
                "--dump-dom",
                &page_url,
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("browser stderr: {}", stderr);
            return Err(AcquireError::download_failed(format!(
                "Browser exited with {}",
                output.status
            )));
        }

        let dom = String::from_utf8_lossy(&output.stdout);
        let media_url = extract_media_link(&dom)
            .ok_or_else(|| AcquireError::download_failed("Could not find download link"))?;

        info!(url = %request.url, "Proxy page produced media link, downloading");
        stream_to_file(&self.client, &media_url, dest).await?;
        Ok(())
    }
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_is_memoized() {
        let probe = BrowserProbe::new();
        let first = probe.probe().await.cloned();
        let second = probe.probe().await.cloned();
        // Same answer both times, whatever the host has installed
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_media_link_from_anchor() {
        let dom = r#"<div><a class="download-icon" href="https://cdn.example/video.mp4?sig=1">Download</a></div>"#;
        assert_eq!(
            extract_media_link(dom).unwrap(),
            "https://cdn.example/video.mp4?sig=1"
        );
    }

    #[test]
    fn test_extract_media_link_fallback_scans_mp4_hrefs() {
        let dom = r#"<a href="https://site/page.html">x</a><a href="https://cdn/video.mp4">dl</a>"#;
        assert_eq!(extract_media_link(dom).unwrap(), "https://cdn/video.mp4");
    }

    #[test]
    fn test_no_link_found() {
        assert!(extract_media_link("<html><body>nothing here</body></html>").is_none());
    }

    #[test]
    fn test_urlencode() {
        assert_eq!(
            urlencode("https://x/v?a=1&b=2"),
            "https%3A%2F%2Fx%2Fv%3Fa%3D1%26b%3D2"
        );
    }
}
