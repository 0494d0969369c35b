//! Persistence seam for the ClipForge core.
//!
//! The core only needs three things from its store: single-record reads,
//! inserts, and an atomic conditional update of the project status field.
//! Real deployments plug a relational store in behind [`ProjectStore`] /
//! [`ClipStore`]; [`MemoryStore`] is the reference implementation used by
//! the default runtime and the test suite.

pub mod error;
pub mod memory;
pub mod retry;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use retry::{with_retry, RetryConfig};
pub use store::{ClipStore, ProjectStore, StatusUpdate};
