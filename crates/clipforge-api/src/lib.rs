//! HTTP API for ClipForge.
//!
//! Thin transport over the orchestration engine: every response is the
//! uniform `{success, data | error}` envelope, and handlers do nothing but
//! translate between HTTP and engine calls.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, Envelope};
pub use routes::create_router;
pub use state::AppState;
