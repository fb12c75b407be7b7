//! Error sink collaborator
//!
//! Field construction and rendering failures are never fatal. They are
//! handed to an [`ErrorSink`] together with a short tag naming the stage
//! that failed, and processing carries on.

use parking_lot::Mutex;
use tracing::error;

use crate::logging::format_error;

/// Receives non-fatal failures from the template engine
pub trait ErrorSink: Send + Sync {
    /// Report a failure. `tag` names the stage, e.g. `"parse"` or `"render"`.
    fn report(&self, tag: &str, error: &dyn std::error::Error);
}

/// Default sink: logs every report at `error` level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, tag: &str, err: &dyn std::error::Error) {
        error!(tag = tag, error = %format_error(err), "Dynamic template failure");
    }
}

/// A report captured by [`RecordingErrorSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    /// Stage tag passed to [`ErrorSink::report`]
    pub tag: String,
    /// Formatted error including its cause chain
    pub message: String,
}

/// Sink that keeps every report in memory
#[derive(Debug, Default)]
pub struct RecordingErrorSink {
    reports: Mutex<Vec<ReportedError>>,
}

impl RecordingErrorSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far
    pub fn reports(&self) -> Vec<ReportedError> {
        self.reports.lock().clone()
    }

    /// Number of reports received so far
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Whether nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    /// Drop all captured reports
    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl ErrorSink for RecordingErrorSink {
    fn report(&self, tag: &str, err: &dyn std::error::Error) {
        self.reports.lock().push(ReportedError {
            tag: tag.to_string(),
            message: format_error(err),
        });
    }
}
