//! Project orchestration.
//!
//! The orchestrator owns the project state machine: it creates jobs,
//! dispatches chain executions as background tasks, resolves outcomes
//! (including the demo-mode fallback when every strategy fails), runs the
//! highlight selector exactly once per resolved acquisition, and resumes
//! jobs the stuck-job scan flags.
//!
//! Per-project mutual exclusion is two layers: an in-process claim set
//! stops double-dispatch inside one process, and the store's conditional
//! status update (which refreshes `updated_at`) de-races concurrent
//! detector passes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use clipforge_acquire::{
    AggregateFailure, DownloadRequest, MediaInspector, Quality, StrategyChain,
};
use clipforge_models::{
    estimate_progress, is_supported_url, normalize_source_url, Clip, Project, ProjectId,
    ProjectStatus,
};
use clipforge_store::{with_retry, ClipStore, ProjectStore, RetryConfig, StatusUpdate};

use crate::config::EngineConfig;
use crate::dispatch::Dispatcher;
use crate::error::{EngineError, EngineResult};
use crate::selector::HighlightSelector;

/// Request to create a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Raw source URL, normalized before storage
    pub url: String,
    /// Optional title; falls back to the inspected source title
    pub title: Option<String>,
    /// Requested quality label ("720", "1080", "best", ...)
    pub quality: Option<String>,
    /// Pin acquisition to one named strategy instead of the full chain
    pub strategy: Option<String>,
}

/// What a resume request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Acquisition was re-dispatched
    Started,
    /// The project is already being worked in this process
    AlreadyRunning,
    /// The project reached a terminal state; nothing to resume
    AlreadyTerminal,
}

/// Polling view of a project.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub id: ProjectId,
    pub status: ProjectStatus,
    /// Estimated completion percentage, monotonic per project
    pub progress: u8,
    /// Whether acquisition has resolved (real media or placeholder)
    pub video_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_asset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub struct Orchestrator {
    projects: Arc<dyn ProjectStore>,
    clips: Arc<dyn ClipStore>,
    chain: Arc<StrategyChain>,
    inspector: Arc<dyn MediaInspector>,
    selector: Arc<dyn HighlightSelector>,
    dispatcher: Dispatcher,
    config: EngineConfig,
    retry: RetryConfig,
    /// Projects with an acquisition in flight in this process.
    active: Mutex<HashSet<ProjectId>>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        clips: Arc<dyn ClipStore>,
        chain: Arc<StrategyChain>,
        inspector: Arc<dyn MediaInspector>,
        selector: Arc<dyn HighlightSelector>,
        dispatcher: Dispatcher,
        config: EngineConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            projects,
            clips,
            chain,
            inspector,
            selector,
            dispatcher,
            config,
            retry: RetryConfig::default(),
            active: Mutex::new(HashSet::new()),
        })
    }

    /// Create a project and dispatch its acquisition.
    ///
    /// Info lookup is best-effort: a failed lookup logs and proceeds with
    /// the user-supplied title and no duration.
    pub async fn create_project(self: &Arc<Self>, req: CreateProject) -> EngineResult<Project> {
        let url = normalize_source_url(&req.url)?;

        if !is_supported_url(&url) {
            // Unknown platforms still run: the direct strategy handles
            // arbitrary media URLs, only the extractors are platform-bound.
            warn!(url = %url, "Source is not a recognized platform");
        }

        if let Some(name) = &req.strategy {
            if !self.chain.has_strategy(name) {
                return Err(EngineError::UnknownStrategy(name.clone()));
            }
        }

        let mut project = Project::new(&url, req.title.clone().unwrap_or_default());
        match self.inspector.inspect(&url).await {
            Ok(info) => {
                if project.title.is_empty() {
                    project.title = info.title.clone();
                }
                project.duration_seconds = info.duration_seconds;
                project.metadata = info.to_metadata_blob();
            }
            Err(e) => {
                warn!(url = %url, "Info lookup failed, proceeding without metadata: {}", e);
                if project.title.is_empty() {
                    project.title = "Untitled".to_string();
                }
            }
        }

        self.projects.insert_project(project.clone()).await?;
        info!(
            project_id = %project.id,
            url = %url,
            "Project created, dispatching acquisition"
        );

        if self.try_begin(&project.id).await? {
            self.dispatch_acquisition(project.clone(), req.quality, req.strategy);
        }

        Ok(project)
    }

    /// Names of the configured strategies, in chain order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.chain.strategy_names()
    }

    /// Read a project.
    pub async fn get_project(&self, id: &ProjectId) -> EngineResult<Project> {
        self.projects
            .get_project(id)
            .await?
            .ok_or_else(|| EngineError::not_found(id.as_str()))
    }

    /// All projects, newest first.
    pub async fn list_projects(&self) -> EngineResult<Vec<Project>> {
        Ok(self.projects.list_projects().await?)
    }

    /// Clips for a project, best rank first.
    pub async fn clips_for(&self, id: &ProjectId) -> EngineResult<Vec<Clip>> {
        // Existence check keeps unknown-project and empty-project responses distinct
        self.get_project(id).await?;
        Ok(self.clips.clips_for_project(id).await?)
    }

    /// Polling view with estimated progress.
    pub async fn poll_status(&self, id: &ProjectId) -> EngineResult<StatusSnapshot> {
        let project = self.get_project(id).await?;
        Ok(StatusSnapshot {
            progress: estimate_progress(
                project.status,
                project.created_at,
                project.updated_at,
                Utc::now(),
            ),
            video_ready: project.status.is_download_resolved(),
            id: project.id,
            status: project.status,
            placeholder_asset: project.placeholder_asset,
            error_message: project.error_message,
        })
    }

    /// Re-dispatch acquisition for a non-terminal project.
    pub async fn resume_project(self: &Arc<Self>, id: &ProjectId) -> EngineResult<ResumeOutcome> {
        let project = self.get_project(id).await?;

        if project.status.is_terminal() {
            return Ok(ResumeOutcome::AlreadyTerminal);
        }

        if !self.try_begin(id).await? {
            return Ok(ResumeOutcome::AlreadyRunning);
        }

        info!(project_id = %id, status = %project.status, "Resuming project");
        self.dispatch_acquisition(project, None, None);
        Ok(ResumeOutcome::Started)
    }

    /// One stuck-job scan: resume every project stuck in `processing`
    /// longer than the configured threshold. Returns how many were resumed.
    pub async fn scan_stuck(self: &Arc<Self>) -> EngineResult<usize> {
        let threshold = chrono::Duration::from_std(self.config.stale_after)
            .unwrap_or_else(|_| chrono::Duration::seconds(600));
        let stuck = self.projects.stale_processing(threshold).await?;

        let mut resumed = 0;
        for project in stuck {
            warn!(
                project_id = %project.id,
                updated_at = %project.updated_at,
                "Stuck project detected, resuming"
            );
            if self.try_begin(&project.id).await? {
                self.dispatch_acquisition(project, None, None);
                resumed += 1;
            }
        }

        Ok(resumed)
    }

    /// Claim a project for acquisition in this process.
    ///
    /// Claims the in-process slot first, then applies the conditional
    /// `processing → processing` touch so the refreshed `updated_at`
    /// de-races other detector passes. A project that left `processing`
    /// between read and claim is released and not started.
    async fn try_begin(&self, id: &ProjectId) -> EngineResult<bool> {
        {
            let mut active = self.active.lock().await;
            if !active.insert(id.clone()) {
                return Ok(false);
            }
        }

        let applied = match self
            .projects
            .update_status_if(
                id,
                &[ProjectStatus::Processing],
                StatusUpdate::to(ProjectStatus::Processing),
            )
            .await
        {
            Ok(applied) => applied,
            Err(e) => {
                self.release(id).await;
                return Err(e.into());
            }
        };

        if !applied {
            self.release(id).await;
        }
        Ok(applied)
    }

    async fn release(&self, id: &ProjectId) {
        self.active.lock().await.remove(id);
    }

    fn dispatch_acquisition(
        self: &Arc<Self>,
        project: Project,
        quality: Option<String>,
        pinned: Option<String>,
    ) {
        let this = Arc::clone(self);
        self.dispatcher.submit(async move {
            let id = project.id.clone();
            this.run_acquisition(project, quality, pinned).await;
            this.release(&id).await;
        });
    }

    /// Execute the chain for one claimed project and resolve its status.
    async fn run_acquisition(
        self: &Arc<Self>,
        project: Project,
        quality: Option<String>,
        pinned: Option<String>,
    ) {
        let request = DownloadRequest::new(
            &project.source_url,
            Quality::parse_or_default(quality.as_deref().unwrap_or("")),
            &self.config.download_dir,
            project.id.as_str(),
        );

        let outcome = match &pinned {
            Some(name) => self.chain.acquire_with(name, &request).await,
            None => self.chain.acquire(&request).await,
        };

        match outcome {
            Ok(artifact) => {
                info!(
                    project_id = %project.id,
                    strategy = %artifact.strategy,
                    size_bytes = artifact.size_bytes,
                    "Acquisition succeeded"
                );
                let update = StatusUpdate::to(ProjectStatus::CompletedDownload)
                    .with_media_path(artifact.path);
                if self.resolve(&project.id, update).await {
                    self.finish_clips(&project.id).await;
                }
            }
            Err(failure) => self.resolve_failure(&project, failure).await,
        }
    }

    /// Every strategy failed: demo mode degrades to a placeholder
    /// resolution, otherwise the project fails with the full failure list.
    async fn resolve_failure(self: &Arc<Self>, project: &Project, failure: AggregateFailure) {
        if self.config.demo_mode {
            warn!(
                project_id = %project.id,
                "All strategies failed, falling back to demo mode: {}",
                failure
            );
            let update = StatusUpdate::to(ProjectStatus::CompletedDownload)
                .with_placeholder(self.config.placeholder_asset.clone())
                .with_error(failure.to_string());
            if self.resolve(&project.id, update).await {
                self.finish_clips(&project.id).await;
            }
        } else {
            error!(project_id = %project.id, "Acquisition failed: {}", failure);
            let update =
                StatusUpdate::to(ProjectStatus::Failed).with_error(failure.to_string());
            self.resolve(&project.id, update).await;
        }
    }

    /// Apply a resolution transition from `processing`, with retry.
    async fn resolve(&self, id: &ProjectId, update: StatusUpdate) -> bool {
        let result = with_retry(&self.retry, "resolve_status", || {
            self.projects
                .update_status_if(id, &[ProjectStatus::Processing], update.clone())
        })
        .await;

        match result {
            Ok(true) => true,
            Ok(false) => {
                warn!(project_id = %id, "Project left processing concurrently, skipping resolution");
                false
            }
            Err(e) => {
                error!(project_id = %id, "Failed to persist resolution: {}", e);
                false
            }
        }
    }

    /// Generate and persist clips, then finish the project.
    ///
    /// Selector failure is not fatal: the project still completes, with
    /// zero clips. The `completed_download → completed` transition runs
    /// exactly once because only the resolving task reaches this point.
    async fn finish_clips(self: &Arc<Self>, id: &ProjectId) {
        let project = match self.projects.get_project(id).await {
            Ok(Some(project)) => project,
            Ok(None) => {
                error!(project_id = %id, "Project vanished before clip generation");
                return;
            }
            Err(e) => {
                error!(project_id = %id, "Failed to reload project for clips: {}", e);
                return;
            }
        };

        match self.selector.generate_clips(&project).await {
            Ok(clips) => {
                info!(project_id = %id, count = clips.len(), "Highlight selector produced clips");
                for clip in clips {
                    if let Err(e) = self.clips.insert_clip(clip).await {
                        error!(project_id = %id, "Failed to persist clip: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!(project_id = %id, "Highlight selection failed, completing without clips: {}", e);
            }
        }

        let completed = with_retry(&self.retry, "complete_project", || {
            self.projects.update_status_if(
                id,
                &[ProjectStatus::CompletedDownload],
                StatusUpdate::to(ProjectStatus::Completed),
            )
        })
        .await;

        if let Err(e) = completed {
            error!(project_id = %id, "Failed to mark project completed: {}", e);
        }
    }
}
