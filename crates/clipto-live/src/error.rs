//! Error types for live rendering

use thiserror::Error;

/// Errors raised while applying a render to an editor
#[derive(Debug, Error)]
pub enum RenderError {
    /// The editor rejected a span operation
    #[error("Editor host error: {0}")]
    Host(String),

    /// A newer edit superseded this render
    #[error("Stale render outcome: epoch {epoch}, current {current}")]
    Stale { epoch: u64, current: u64 },

    /// A field span does not fit the editor text
    #[error("Span {start}..{end} outside text of length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}

/// Result type for live rendering
pub type Result<T> = std::result::Result<T, RenderError>;
