//! Debounced render cycles for one editor binding
//!
//! Every relevant edit starts a new render cycle tagged with an epoch. The
//! previous scheduled parse is aborted, and results whose epoch is not the
//! latest are dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use clipto_common::{ErrorSink, TracingErrorSink};
use clipto_config::RenderingConfig;
use clipto_engine::{ActionType, ResolutionConfig, TemplateEngine};
use clipto_fields::FormField;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::apply::{apply_fields, sweep_invalid_spans, ApplyReport};
use crate::change::{classify, TextChange};
use crate::error::{RenderError, Result};
use crate::host::EditorHost;

/// Fields parsed for one render cycle
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub epoch: u64,
    /// Snapshot the fields were parsed from
    pub text: String,
    pub fields: Vec<FormField>,
}

/// Live renderer bound to one editor.
///
/// Must be used inside a tokio runtime. Dropping it aborts the scheduled
/// parse.
pub struct LiveRenderer {
    engine: Arc<TemplateEngine>,
    settings: RenderingConfig,
    editable: bool,
    initial_fields: Vec<FormField>,
    errors: Arc<dyn ErrorSink>,
    epoch: u64,
    scheduled: Option<JoinHandle<()>>,
    outcomes_tx: mpsc::UnboundedSender<RenderOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<RenderOutcome>,
}

impl LiveRenderer {
    /// Bind a renderer. `editable` renders in edit mode, otherwise preview.
    pub fn bind(engine: Arc<TemplateEngine>, settings: RenderingConfig, editable: bool) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            settings,
            editable,
            initial_fields: Vec::new(),
            errors: Arc::new(TracingErrorSink),
            epoch: 0,
            scheduled: None,
            outcomes_tx,
            outcomes_rx,
        }
    }

    /// Fields to carry answers over from
    pub fn with_initial_fields(mut self, fields: Vec<FormField>) -> Self {
        self.initial_fields = fields;
        self
    }

    pub fn with_error_sink(mut self, errors: Arc<dyn ErrorSink>) -> Self {
        self.errors = errors;
        self
    }

    /// Epoch of the latest render cycle, 0 before the first
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Handle an edit that produced `text`.
    ///
    /// Sweeps broken spans right away in editable mode and schedules a render
    /// when the edit can affect placeholders. Returns the new epoch if one
    /// was scheduled.
    pub fn text_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
        change: TextChange,
    ) -> Option<u64> {
        let effect = classify(text, change);
        trace!(?change, ?effect, "Classified edit");

        if self.editable && effect.sweep {
            let removed = sweep_invalid_spans(host, text);
            if removed > 0 {
                debug!(removed, "Removed broken spans");
            }
        }

        effect.render.then(|| self.schedule(text))
    }

    /// Start a new render cycle for `text`, superseding any scheduled one
    pub fn schedule(&mut self, text: &str) -> u64 {
        self.epoch += 1;
        let epoch = self.epoch;

        if let Some(previous) = self.scheduled.take() {
            previous.abort();
        }

        let delay = self.delay_for(epoch);
        let engine = Arc::clone(&self.engine);
        let config = self.resolution_config();
        let text = text.to_string();
        let outcomes = self.outcomes_tx.clone();

        debug!(epoch, delay_ms = delay.as_millis() as u64, "Scheduling render");

        self.scheduled = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let fields = engine.form_fields(&text, &config);
            let _ = outcomes.send(RenderOutcome {
                epoch,
                text,
                fields,
            });
        }));

        epoch
    }

    /// Whether `outcome` belongs to the latest render cycle
    pub fn is_current(&self, outcome: &RenderOutcome) -> bool {
        outcome.epoch == self.epoch
    }

    /// Wait for the result of the latest render cycle, dropping stale ones
    pub async fn next_outcome(&mut self) -> Option<RenderOutcome> {
        while let Some(outcome) = self.outcomes_rx.recv().await {
            if self.is_current(&outcome) {
                return Some(outcome);
            }
            debug!(epoch = outcome.epoch, current = self.epoch, "Discarding stale render");
        }
        None
    }

    /// Apply an outcome to the host.
    ///
    /// Stale outcomes are rejected without touching the host.
    pub fn apply<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        outcome: &RenderOutcome,
    ) -> Result<ApplyReport> {
        if !self.is_current(outcome) {
            return Err(RenderError::Stale {
                epoch: outcome.epoch,
                current: self.epoch,
            });
        }
        apply_fields(host, &outcome.text, &outcome.fields, self.editable)
    }

    /// Wait for the latest render and apply it.
    ///
    /// Failures are reported to the error sink.
    pub async fn render_next<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Option<ApplyReport> {
        let outcome = self.next_outcome().await?;
        match self.apply(host, &outcome) {
            Ok(report) => Some(report),
            Err(err) => {
                self.errors.report("render", &err);
                None
            }
        }
    }

    fn delay_for(&self, epoch: u64) -> Duration {
        if !self.editable || (epoch == 1 && self.settings.immediate_first_render) {
            Duration::ZERO
        } else {
            self.settings.debounce()
        }
    }

    fn resolution_config(&self) -> ResolutionConfig {
        let action = if self.editable {
            ActionType::Edit
        } else {
            ActionType::Preview
        };
        ResolutionConfig::new(action).with_initial_fields(self.initial_fields.clone())
    }
}

impl Drop for LiveRenderer {
    fn drop(&mut self) {
        if let Some(scheduled) = self.scheduled.take() {
            scheduled.abort();
        }
    }
}
