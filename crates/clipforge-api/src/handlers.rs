//! HTTP handlers.
//!
//! Handlers are deliberately thin: parse, call the orchestrator, wrap the
//! result in the response envelope. No business rules live here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use clipforge_engine::{CreateProject, ResumeOutcome, StatusSnapshot};
use clipforge_models::{Clip, Project, ProjectId};

use crate::error::{ApiResult, Envelope};
use crate::state::AppState;

/// Request body for project creation.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Quality label: "720", "1080p", "best", ...
    #[serde(default)]
    pub quality: Option<String>,
    /// Pin acquisition to one named strategy
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resumed: bool,
    pub outcome: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ScanStuckResponse {
    pub resumed: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub strategies: Vec<String>,
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Project>>)> {
    let project = state
        .orchestrator
        .create_project(CreateProject {
            url: req.url,
            title: req.title,
            quality: req.quality,
            strategy: req.strategy,
        })
        .await?;

    info!(project_id = %project.id, "Project created via API");
    Ok((StatusCode::CREATED, Json(Envelope::ok(project))))
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Project>>>> {
    let projects = state.orchestrator.list_projects().await?;
    Ok(Json(Envelope::ok(projects)))
}

/// GET /api/projects/:project_id
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Envelope<Project>>> {
    let id = ProjectId::from_string(project_id);
    let project = state.orchestrator.get_project(&id).await?;
    Ok(Json(Envelope::ok(project)))
}

/// GET /api/projects/:project_id/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Envelope<StatusSnapshot>>> {
    let id = ProjectId::from_string(project_id);
    let snapshot = state.orchestrator.poll_status(&id).await?;
    Ok(Json(Envelope::ok(snapshot)))
}

/// POST /api/projects/:project_id/resume
pub async fn resume_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Envelope<ResumeResponse>>> {
    let id = ProjectId::from_string(project_id);
    let outcome = state.orchestrator.resume_project(&id).await?;

    let response = match outcome {
        ResumeOutcome::Started => ResumeResponse {
            resumed: true,
            outcome: "started",
        },
        ResumeOutcome::AlreadyRunning => ResumeResponse {
            resumed: false,
            outcome: "already_running",
        },
        ResumeOutcome::AlreadyTerminal => ResumeResponse {
            resumed: false,
            outcome: "already_terminal",
        },
    };
    Ok(Json(Envelope::ok(response)))
}

/// POST /api/projects/scan-stuck
pub async fn scan_stuck(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<ScanStuckResponse>>> {
    let resumed = state.orchestrator.scan_stuck().await?;
    Ok(Json(Envelope::ok(ScanStuckResponse { resumed })))
}

/// GET /api/projects/:project_id/clips
pub async fn get_clips(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<Clip>>>> {
    let id = ProjectId::from_string(project_id);
    let clips = state.orchestrator.clips_for(&id).await?;
    Ok(Json(Envelope::ok(clips)))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Envelope<HealthResponse>> {
    Json(Envelope::ok(HealthResponse {
        status: "ok",
        strategies: state
            .orchestrator
            .strategy_names()
            .into_iter()
            .map(String::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use clipforge_engine::EngineConfig;

    use crate::config::ApiConfig;
    use crate::routes::create_router;
    use crate::state::AppState;

    fn test_app() -> axum::Router {
        let (state, _runner) = AppState::new(ApiConfig::default(), EngineConfig::default());
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_strategies() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["data"]["strategies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "direct"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let request = Request::post("/api/projects")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"url": "not a url"}).to_string()))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("Bad request"));
    }

    #[tokio::test]
    async fn test_create_and_poll_status() {
        let app = test_app();

        let request = Request::post("/api/projects")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "url": "https://www.youtube.com/watch?v=abc123def45",
                    "title": "Launch talk"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = body_json(response).await;
        assert_eq!(created["success"], true);
        assert_eq!(created["data"]["status"], "processing");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get(format!("/api/projects/{}/status", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status = body_json(response).await;
        assert_eq!(status["data"]["status"], "processing");
        assert_eq!(status["data"]["video_ready"], false);
        assert!(status["data"]["progress"].as_u64().unwrap() < 100);
    }

    #[tokio::test]
    async fn test_status_of_unknown_project_is_404() {
        let response = test_app()
            .oneshot(
                Request::get("/api/projects/does-not-exist/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_scan_stuck_with_no_projects() {
        let response = test_app()
            .oneshot(
                Request::post("/api/projects/scan-stuck")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["resumed"], 0);
    }
}
