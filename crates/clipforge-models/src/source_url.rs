//! Source URL validation and normalization.
//!
//! Submitted URLs frequently arrive mangled by copy-paste, most commonly as
//! two concatenated copies of the same link. Normalization takes the first
//! well-formed URL and rejects anything that does not parse; nothing
//! unparseable ever reaches an acquisition strategy.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceUrlError {
    #[error("Invalid source URL: {0}")]
    Invalid(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Normalize a submitted source URL.
///
/// - Trims surrounding whitespace.
/// - If the text contains a second `http` occurrence (duplicated paste),
///   keeps only the first URL.
/// - Validates the result parses as an absolute `http`/`https` URL with a host.
pub fn normalize_source_url(raw: &str) -> Result<String, SourceUrlError> {
    let mut cleaned = raw.trim().to_string();

    // Duplicated copy-paste: "https://a..https://a.." keeps the first URL
    if let Some((second, _)) = cleaned.match_indices("http").nth(1) {
        cleaned.truncate(second);
        cleaned = cleaned.trim().to_string();
    }

    let parsed =
        Url::parse(&cleaned).map_err(|_| SourceUrlError::Invalid(cleaned.clone()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(SourceUrlError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(SourceUrlError::Invalid(cleaned));
    }

    Ok(cleaned)
}

/// Check if a URL belongs to a supported video platform.
pub fn is_supported_url(url: &str) -> bool {
    let supported_domains = [
        "youtube.com",
        "youtu.be",
        "vimeo.com",
        "twitter.com",
        "x.com",
        "twitch.tv",
        "tiktok.com",
    ];

    supported_domains.iter().any(|domain| url.contains(domain))
}
