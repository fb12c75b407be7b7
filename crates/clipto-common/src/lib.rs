//! Shared utilities for the clipto dynamic template crates.
//!
//! - [`logging`]: tracing subscriber setup and error cause-chain formatting
//! - [`error_sink`]: the non-fatal error reporting collaborator

pub mod error_sink;
pub mod logging;

pub use error_sink::{ErrorSink, RecordingErrorSink, ReportedError, TracingErrorSink};
pub use logging::{format_error, init_logging, LogLevel};
