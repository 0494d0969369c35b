//! Project models.
//!
//! A `Project` is one unit of work tied to one source URL: it is created at
//! submission time and mutated only by the orchestrator (status, media path,
//! duration) until it reaches a terminal state.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback duration when the source reports none (or zero), in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 600.0;

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a new random project ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Project processing status.
///
/// `processing → {completed_download | failed}`, then `completed_download →
/// completed` once clip generation resolves. `clips_ready` is written by the
/// downstream clip renderer and is only read as terminal here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Acquisition (or a resumed acquisition) is in flight
    #[default]
    Processing,
    /// Acquisition resolved (real download or placeholder), clip generation pending
    CompletedDownload,
    /// Clip generation finished
    Completed,
    /// Acquisition exhausted all strategies and demo mode is disabled
    Failed,
    /// Rendered clips are available (set by the downstream renderer)
    ClipsReady,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Processing => "processing",
            ProjectStatus::CompletedDownload => "completed_download",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Failed => "failed",
            ProjectStatus::ClipsReady => "clips_ready",
        }
    }

    /// Terminal states accept no further transitions from the orchestrator.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Completed | ProjectStatus::Failed | ProjectStatus::ClipsReady
        )
    }

    /// Whether acquisition has resolved (successfully or in demo mode).
    pub fn is_download_resolved(&self) -> bool {
        matches!(
            self,
            ProjectStatus::CompletedDownload | ProjectStatus::Completed | ProjectStatus::ClipsReady
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A project record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    /// Unique project ID
    pub id: ProjectId,

    /// Normalized source URL
    pub source_url: String,

    /// User-supplied title
    pub title: String,

    /// Processing status
    #[serde(default)]
    pub status: ProjectStatus,

    /// Path of the acquired media file; `None` until acquisition succeeds,
    /// and stays `None` for demo-mode resolutions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_media_path: Option<PathBuf>,

    /// Placeholder asset reference, set only on demo-mode resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_asset: Option<String>,

    /// Best-effort source duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Opaque metadata blob captured at info-lookup time (title, thumbnail, ...)
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project in `processing` state.
    pub fn new(source_url: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            source_url: source_url.into(),
            title: title.into(),
            status: ProjectStatus::Processing,
            local_media_path: None,
            placeholder_asset: None,
            duration_seconds: None,
            metadata: serde_json::Value::Null,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Duration with the documented fallback: missing or zero maps to
    /// [`DEFAULT_DURATION_SECS`].
    pub fn duration_or_default(&self) -> f64 {
        match self.duration_seconds {
            Some(d) if d > 0.0 => d,
            _ => DEFAULT_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_generation() {
        let id1 = ProjectId::new();
        let id2 = ProjectId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_project_starts_processing() {
        let project = Project::new("https://youtube.com/watch?v=abc123def45", "Test");
        assert_eq!(project.status, ProjectStatus::Processing);
        assert!(project.local_media_path.is_none());
        assert!(project.placeholder_asset.is_none());
    }

    #[test]
    fn test_status_strings_round_trip() {
        for status in [
            ProjectStatus::Processing,
            ProjectStatus::CompletedDownload,
            ProjectStatus::Completed,
            ProjectStatus::Failed,
            ProjectStatus::ClipsReady,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: ProjectStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ProjectStatus::Processing.is_terminal());
        assert!(!ProjectStatus::CompletedDownload.is_terminal());
        assert!(ProjectStatus::Completed.is_terminal());
        assert!(ProjectStatus::Failed.is_terminal());
        assert!(ProjectStatus::ClipsReady.is_terminal());
    }

    #[test]
    fn test_duration_fallback() {
        let mut project = Project::new("https://youtu.be/abc123def45", "Test");
        assert_eq!(project.duration_or_default(), DEFAULT_DURATION_SECS);
        project.duration_seconds = Some(0.0);
        assert_eq!(project.duration_or_default(), DEFAULT_DURATION_SECS);
        project.duration_seconds = Some(123.5);
        assert_eq!(project.duration_or_default(), 123.5);
    }
}
