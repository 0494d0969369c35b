//! Acquisition error taxonomy.
//!
//! Individual strategy failures are never fatal to the chain; they are
//! collected into an [`AggregateFailure`] when every strategy has been
//! tried, so no error is ever swallowed.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type AcquireResult<T> = Result<T, AcquireError>;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("yt-dlp binary not found in PATH")]
    YtDlpNotFound,

    #[error("No usable browser engine found")]
    BrowserUnavailable,

    #[error("Rate limited by source: {0}")]
    RateLimited(String),

    #[error("Strategy timed out after {0:?}")]
    Timeout(Duration),

    #[error("Artifact failed sanity check: {size} bytes (minimum {min})")]
    SanityCheckFailed { size: u64, min: u64 },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Info lookup failed: {0}")]
    InfoLookupFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AcquireError {
    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    pub fn info_lookup_failed(msg: impl Into<String>) -> Self {
        Self::InfoLookupFailed(msg.into())
    }
}

/// One recorded strategy execution: which strategy, what happened, how long.
#[derive(Debug)]
pub struct StrategyFailure {
    pub strategy: String,
    pub error: AcquireError,
    pub elapsed: Duration,
}

/// Returned when every strategy in the chain has failed.
///
/// Carries each individual failure so callers (and logs) see the full
/// picture rather than the last error alone.
#[derive(Debug, Default)]
pub struct AggregateFailure {
    pub attempts: Vec<StrategyFailure>,
}

impl AggregateFailure {
    pub fn push(&mut self, strategy: impl Into<String>, error: AcquireError, elapsed: Duration) {
        self.attempts.push(StrategyFailure {
            strategy: strategy.into(),
            error,
            elapsed,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All {} acquisition strategies failed:", self.attempts.len())?;
        for attempt in &self.attempts {
            write!(f, " [{}: {}]", attempt.strategy, attempt.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_failure_lists_every_strategy() {
        let mut agg = AggregateFailure::default();
        agg.push(
            "ytdlp_web",
            AcquireError::RateLimited("429".into()),
            Duration::from_secs(3),
        );
        agg.push(
            "direct",
            AcquireError::download_failed("HTTP 403"),
            Duration::from_secs(1),
        );

        let msg = agg.to_string();
        assert!(msg.contains("All 2 acquisition strategies failed"));
        assert!(msg.contains("ytdlp_web"));
        assert!(msg.contains("direct"));
        assert!(msg.contains("HTTP 403"));
    }
}
