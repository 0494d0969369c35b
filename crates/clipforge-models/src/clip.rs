//! Clip models.
//!
//! Clips are produced by the highlight selector after a project reaches a
//! download-resolved state. The core never owns clips through the project,
//! only the `project_id` back-reference.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::ProjectId;

/// Unique identifier for a clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clip rendering status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl ClipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStatus::Pending => "pending",
            ClipStatus::Completed => "completed",
            ClipStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sub-clip candidate produced by the highlight selector.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,

    /// Back-reference to the owning project
    pub project_id: ProjectId,

    /// Clip title
    pub title: String,

    /// Start offset in the source, seconds
    pub start_time: f64,

    /// End offset in the source, seconds
    pub end_time: f64,

    /// Rendering status
    #[serde(default)]
    pub status: ClipStatus,

    /// Virality rank score (higher is better)
    pub rank_score: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Clip {
    /// Create a new pending clip.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        start_time: f64,
        end_time: f64,
        rank_score: u32,
    ) -> Self {
        Self {
            id: ClipId::new(),
            project_id,
            title: title.into(),
            start_time,
            end_time,
            status: ClipStatus::Pending,
            rank_score,
            created_at: Utc::now(),
        }
    }

    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clip_is_pending() {
        let clip = Clip::new(ProjectId::new(), "Hook", 60.0, 105.0, 95);
        assert_eq!(clip.status, ClipStatus::Pending);
        assert_eq!(clip.duration(), 45.0);
    }

    #[test]
    fn test_clip_status_serde() {
        let json = serde_json::to_string(&ClipStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
