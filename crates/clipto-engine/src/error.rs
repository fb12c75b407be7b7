//! Error types for template resolution

use clipto_fields::FieldError;
use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the resolution orchestrator.
///
/// Per-placeholder failures never show up here. They go to the error sink
/// and the placeholder is dropped or valued as unknown.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The interactive input collaborator cannot take requests
    #[error("Input collaborator unavailable: {0}")]
    InputUnavailable(String),

    /// Field error
    #[error(transparent)]
    Field(#[from] FieldError),
}
