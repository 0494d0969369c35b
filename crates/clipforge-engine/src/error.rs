//! Engine error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidUrl(#[from] clipforge_models::SourceUrlError),

    #[error("Unknown acquisition strategy: {0}")]
    UnknownStrategy(String),

    #[error("Store error: {0}")]
    Store(#[from] clipforge_store::StoreError),
}

impl EngineError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
