//! In-memory reference store.
//!
//! Backs the default runtime and the test suite. All project mutations run
//! under a single lock, so `update_status_if` has the same atomicity a
//! conditional `UPDATE` would have against a relational store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use clipforge_models::{Clip, Project, ProjectId, ProjectStatus};

use crate::error::{StoreError, StoreResult};
use crate::store::{ClipStore, ProjectStore, StatusUpdate};

#[derive(Default)]
struct Inner {
    projects: HashMap<ProjectId, Project>,
    clips: Vec<Clip>,
}

/// Thread-safe in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, project: Project) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.projects.contains_key(&project.id) {
            return Err(StoreError::AlreadyExists(project.id.to_string()));
        }
        inner.projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn get_project(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        let inner = self.inner.lock().await;
        Ok(inner.projects.get(id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let inner = self.inner.lock().await;
        let mut projects: Vec<Project> = inner.projects.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update_status_if(
        &self,
        id: &ProjectId,
        from: &[ProjectStatus],
        update: StatusUpdate,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.lock().await;
        let project = inner
            .projects
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id.to_string()))?;

        if !from.contains(&project.status) {
            return Ok(false);
        }

        project.status = update.status;
        if let Some(path) = update.local_media_path {
            project.local_media_path = Some(path);
        }
        if let Some(asset) = update.placeholder_asset {
            project.placeholder_asset = Some(asset);
        }
        if let Some(secs) = update.duration_seconds {
            project.duration_seconds = Some(secs);
        }
        if let Some(msg) = update.error_message {
            project.error_message = Some(msg);
        }
        project.updated_at = Utc::now();

        Ok(true)
    }

    async fn stale_processing(&self, older_than: Duration) -> StoreResult<Vec<Project>> {
        let cutoff = Utc::now() - older_than;
        let inner = self.inner.lock().await;
        Ok(inner
            .projects
            .values()
            .filter(|p| p.status == ProjectStatus::Processing && p.updated_at < cutoff)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClipStore for MemoryStore {
    async fn insert_clip(&self, clip: Clip) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.clips.push(clip);
        Ok(())
    }

    async fn clips_for_project(&self, id: &ProjectId) -> StoreResult<Vec<Clip>> {
        let inner = self.inner.lock().await;
        let mut clips: Vec<Clip> = inner
            .clips
            .iter()
            .filter(|c| &c.project_id == id)
            .cloned()
            .collect();
        clips.sort_by(|a, b| b.rank_score.cmp(&a.rank_score));
        Ok(clips)
    }
}
