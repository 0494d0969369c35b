//! API routes.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_project, get_clips, get_project, get_status, health, list_projects, resume_project,
    scan_stuck,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let project_routes = Router::new()
        .route("/projects", post(create_project).get(list_projects))
        // Manual stuck-job scan (the detector loop calls the same code)
        .route("/projects/scan-stuck", post(scan_stuck))
        .route("/projects/:project_id", get(get_project))
        .route("/projects/:project_id/status", get(get_status))
        .route("/projects/:project_id/resume", post(resume_project))
        .route("/projects/:project_id/clips", get(get_clips));

    Router::new()
        .nest("/api", project_routes)
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
