//! Shared data models for the ClipForge backend.
//!
//! This crate defines the domain types used across the workspace:
//! projects, clips, media info, source URL normalization and the
//! state-keyed progress estimator.

pub mod clip;
pub mod media_info;
pub mod progress;
pub mod project;
pub mod source_url;

pub use clip::{Clip, ClipId, ClipStatus};
pub use media_info::MediaInfo;
pub use progress::estimate_progress;
pub use project::{Project, ProjectId, ProjectStatus, DEFAULT_DURATION_SECS};
pub use source_url::{is_supported_url, normalize_source_url, SourceUrlError};
