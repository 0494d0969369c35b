//! Target quality and the yt-dlp format selector mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Requested target quality for a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    P144,
    P240,
    P360,
    P480,
    #[default]
    P720,
    P1080,
    P1440,
    P2160,
    Best,
    Worst,
}

impl Quality {
    /// Parse a user-supplied quality string, falling back to the 720p
    /// default for anything unrecognized.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "144p" | "144" => Quality::P144,
            "240p" | "240" => Quality::P240,
            "360p" | "360" => Quality::P360,
            "480p" | "480" => Quality::P480,
            "720p" | "720" => Quality::P720,
            "1080p" | "1080" => Quality::P1080,
            "1440p" | "1440" => Quality::P1440,
            "2160p" | "2160" | "4k" => Quality::P2160,
            "best" => Quality::Best,
            "worst" => Quality::Worst,
            _ => Quality::default(),
        }
    }

    /// The yt-dlp `-f` format selector for this quality.
    pub fn format_selector(&self) -> &'static str {
        match self {
            Quality::P144 => "worst[height<=144]",
            Quality::P240 => "best[height<=240]",
            Quality::P360 => "best[height<=360]",
            Quality::P480 => "best[height<=480]",
            Quality::P720 => "best[height<=720]",
            Quality::P1080 => "best[height<=1080]",
            Quality::P1440 => "best[height<=1440]",
            Quality::P2160 => "best[height<=2160]",
            Quality::Best => "best",
            Quality::Worst => "worst",
        }
    }

    /// Vertical resolution hint used by the relay API (`vQuality`).
    pub fn relay_hint(&self) -> &'static str {
        match self {
            Quality::P144 => "144",
            Quality::P240 => "240",
            Quality::P360 => "360",
            Quality::P480 => "480",
            Quality::P720 => "720",
            Quality::P1080 => "1080",
            Quality::P1440 => "1440",
            Quality::P2160 => "2160",
            Quality::Best => "max",
            Quality::Worst => "144",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quality::P144 => "144p",
            Quality::P240 => "240p",
            Quality::P360 => "360p",
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::P1440 => "1440p",
            Quality::P2160 => "2160p",
            Quality::Best => "best",
            Quality::Worst => "worst",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_qualities() {
        assert_eq!(Quality::parse_or_default("720p"), Quality::P720);
        assert_eq!(Quality::parse_or_default("4K"), Quality::P2160);
        assert_eq!(Quality::parse_or_default("best"), Quality::Best);
        assert_eq!(Quality::parse_or_default("1080"), Quality::P1080);
    }

    #[test]
    fn test_unknown_quality_falls_back_to_720p() {
        assert_eq!(Quality::parse_or_default("potato"), Quality::P720);
        assert_eq!(Quality::parse_or_default(""), Quality::P720);
    }

    #[test]
    fn test_format_selectors() {
        assert_eq!(Quality::P720.format_selector(), "best[height<=720]");
        assert_eq!(Quality::P144.format_selector(), "worst[height<=144]");
        assert_eq!(Quality::Best.format_selector(), "best");
    }
}
