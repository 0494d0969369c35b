//! Store traits.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Duration;

use clipforge_models::{Clip, Project, ProjectId, ProjectStatus};

use crate::error::StoreResult;

/// Fields applied together with a conditional status transition.
///
/// `None` fields are left untouched. The store refreshes `updated_at` as
/// part of every applied transition.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub status: ProjectStatus,
    pub local_media_path: Option<PathBuf>,
    pub placeholder_asset: Option<String>,
    pub duration_seconds: Option<f64>,
    pub error_message: Option<String>,
}

impl StatusUpdate {
    /// Transition to `status`, changing nothing else.
    pub fn to(status: ProjectStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_media_path(mut self, path: PathBuf) -> Self {
        self.local_media_path = Some(path);
        self
    }

    pub fn with_placeholder(mut self, asset: impl Into<String>) -> Self {
        self.placeholder_asset = Some(asset.into());
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_seconds = Some(secs);
        self
    }

    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error_message = Some(msg.into());
        self
    }
}

/// Project persistence operations required by the orchestrator.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new project. Fails if the ID already exists.
    async fn insert_project(&self, project: Project) -> StoreResult<()>;

    /// Read a project by ID.
    async fn get_project(&self, id: &ProjectId) -> StoreResult<Option<Project>>;

    /// List all projects, newest first.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Atomic conditional status transition.
    ///
    /// Applies `update` (and refreshes `updated_at`) only if the project's
    /// current status is one of `from`, as a single operation: the
    /// relational equivalent is `UPDATE .. WHERE id = ? AND status IN (..)`.
    /// Returns `true` iff the update was applied. This is the only
    /// check-and-set the core relies on for per-project mutual exclusion.
    async fn update_status_if(
        &self,
        id: &ProjectId,
        from: &[ProjectStatus],
        update: StatusUpdate,
    ) -> StoreResult<bool>;

    /// Projects sitting in `processing` with `updated_at` older than
    /// `older_than`. Input to the stuck-job detector.
    async fn stale_processing(&self, older_than: Duration) -> StoreResult<Vec<Project>>;
}

/// Clip persistence operations.
#[async_trait]
pub trait ClipStore: Send + Sync {
    /// Insert a clip produced by the highlight selector.
    async fn insert_clip(&self, clip: Clip) -> StoreResult<()>;

    /// Clips for a project, ordered by rank score descending.
    async fn clips_for_project(&self, id: &ProjectId) -> StoreResult<Vec<Clip>>;
}
