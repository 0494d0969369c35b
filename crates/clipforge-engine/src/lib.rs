//! Job orchestration engine.
//!
//! Owns the project state machine around acquisition: creating jobs,
//! dispatching chain executions as background tasks, resolving results
//! (including the demo-mode fallback), handing off to the highlight
//! selector exactly once per resolved acquisition, and resuming stuck jobs.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod selector;
pub mod stale;

pub use config::EngineConfig;
pub use dispatch::{task_channel, Dispatcher, TaskRunner};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{CreateProject, Orchestrator, ResumeOutcome, StatusSnapshot};
pub use selector::{HighlightSelector, StubSelector};
pub use stale::StuckJobDetector;
