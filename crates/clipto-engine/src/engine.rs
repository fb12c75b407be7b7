//! Resolution orchestrator
//!
//! [`TemplateEngine`] runs the parse pipeline (parse, link references,
//! carry answers over, expand snippets) and decides whether a template can
//! be substituted right away or needs one interactive round trip.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use clipto_common::{ErrorSink, TracingErrorSink};
use clipto_config::EngineConfig;
use clipto_fields::{
    FieldRegistry, FormField, MemorySnippetSource, SnippetSource, SystemValueContext, ValueContext,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ActionType, ResolutionConfig};
use crate::continuity::carry_over;
use crate::error::Result;
use crate::input::{InputCollaborator, InputRequest, InputResponse, NoInput};
use crate::parser::TemplateParser;
use crate::references::link_references;
use crate::substitute::{substitute, substitute_computed};

/// Result of [`TemplateEngine::resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Final literal text
    Completed(String),
    /// The user cancelled: callers must leave their text unchanged
    Canceled,
}

impl Resolution {
    /// Resolved text, or `original` when cancelled
    pub fn text_or(self, original: &str) -> String {
        match self {
            Resolution::Completed(text) => text,
            Resolution::Canceled => original.to_string(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Resolution::Canceled)
    }
}

struct OutstandingRequest {
    id: u64,
    cancellation: CancellationToken,
}

/// Dynamic template engine
pub struct TemplateEngine {
    pub(crate) parser: TemplateParser,
    pub(crate) snippets: Arc<dyn SnippetSource>,
    pub(crate) errors: Arc<dyn ErrorSink>,
    pub(crate) max_snippet_depth: u32,
    input: Arc<dyn InputCollaborator>,
    outstanding: Mutex<Option<OutstandingRequest>>,
    next_request_id: AtomicU64,
}

impl TemplateEngine {
    /// Start building an engine
    pub fn builder() -> TemplateEngineBuilder {
        TemplateEngineBuilder::default()
    }

    /// Parser used by this engine
    pub fn parser(&self) -> &TemplateParser {
        &self.parser
    }

    /// Parse `text` and run the post-parse passes.
    ///
    /// Returns no fields for [`ActionType::Recursive`].
    pub fn form_fields(&self, text: &str, config: &ResolutionConfig) -> Vec<FormField> {
        if config.action_type == ActionType::Recursive {
            return Vec::new();
        }
        self.collect_fields(text, config)
    }

    /// Number of placeholders in `text`
    pub fn field_count(&self, text: &str) -> usize {
        self.form_fields(text, &ResolutionConfig::new(ActionType::Preview))
            .len()
    }

    /// Resolve `text` into literal text.
    ///
    /// Texts without user input, and actions that skip user input, are
    /// substituted directly. Otherwise computed fields are substituted
    /// first, the user-input spans are moved into the shorter text, and the
    /// input collaborator is asked once to fill in the rest.
    ///
    /// At level 0 only one request is outstanding: starting a new one
    /// cancels the previous one, which then resolves as
    /// [`Resolution::Canceled`].
    pub async fn resolve(&self, text: &str, config: &ResolutionConfig) -> Result<Resolution> {
        if config.internal || config.action_type == ActionType::Recursive {
            return Ok(Resolution::Completed(text.to_string()));
        }

        let fields = self.collect_fields(text, config);
        let needs_input = fields
            .iter()
            .any(|f| f.is_user_input() || f.is_snippet_reference());

        if config.skips_user_input() || !needs_input {
            debug!(level = config.level, fields = fields.len(), "Substituting directly");
            return Ok(Resolution::Completed(substitute(text, &fields, config)));
        }

        let (request_text, request_fields) = substitute_computed(text, &fields, config);
        if request_fields.is_empty() {
            return Ok(Resolution::Completed(request_text));
        }

        match self
            .request_input(request_text, request_fields, config)
            .await?
        {
            InputResponse::Filled { text, fields } => {
                Ok(Resolution::Completed(substitute(&text, &fields, config)))
            }
            InputResponse::Canceled => {
                info!(level = config.level, "Dynamic input canceled");
                Ok(Resolution::Canceled)
            }
        }
    }

    /// Parse, link references, carry answers over and expand snippets.
    pub(crate) fn collect_fields(&self, text: &str, config: &ResolutionConfig) -> Vec<FormField> {
        let fields = self.parser.parse(text, config);
        let fields = link_references(fields, config.is_edit_mode());
        let mut fields = carry_over(fields, &config.initial_fields);
        if !config.is_edit_mode() {
            self.evaluate_snippets(&mut fields, config);
        }
        fields
    }

    /// Full substitution without the recursion guard, used for snippet text
    pub(crate) fn expand(&self, text: &str, config: &ResolutionConfig) -> String {
        let fields = self.collect_fields(text, config);
        substitute(text, &fields, config)
    }

    async fn request_input(
        &self,
        text: String,
        fields: Vec<FormField>,
        config: &ResolutionConfig,
    ) -> Result<InputResponse> {
        let cancellation = CancellationToken::new();
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);

        if config.level == 0 {
            let previous = self.outstanding.lock().replace(OutstandingRequest {
                id: request_id,
                cancellation: cancellation.clone(),
            });
            if let Some(previous) = previous {
                debug!(request_id = previous.id, "Canceling superseded input request");
                previous.cancellation.cancel();
            }
        }

        let request = InputRequest {
            text,
            fields,
            level: config.level,
            action_type: config.action_type,
            cancellation: cancellation.clone(),
        };

        let response = tokio::select! {
            response = self.input.request_input(request) => response,
            _ = cancellation.cancelled() => Ok(InputResponse::Canceled),
        };

        if config.level == 0 {
            let mut outstanding = self.outstanding.lock();
            if outstanding.as_ref().map(|o| o.id) == Some(request_id) {
                *outstanding = None;
            }
        }

        response
    }
}

/// Builder for [`TemplateEngine`]
#[derive(Default)]
pub struct TemplateEngineBuilder {
    config: EngineConfig,
    context: Option<Arc<dyn ValueContext>>,
    registry: Option<FieldRegistry>,
    snippets: Option<Arc<dyn SnippetSource>>,
    input: Option<Arc<dyn InputCollaborator>>,
    errors: Option<Arc<dyn ErrorSink>>,
}

impl TemplateEngineBuilder {
    /// Apply engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Environment for computed fields
    pub fn value_context(mut self, context: Arc<dyn ValueContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Custom registry. Takes precedence over [`Self::value_context`].
    pub fn registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Snippet store
    pub fn snippets(mut self, snippets: Arc<dyn SnippetSource>) -> Self {
        self.snippets = Some(snippets);
        self
    }

    /// Interactive input collaborator
    pub fn input(mut self, input: Arc<dyn InputCollaborator>) -> Self {
        self.input = Some(input);
        self
    }

    /// Error sink
    pub fn error_sink(mut self, errors: Arc<dyn ErrorSink>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Build the engine
    pub fn build(self) -> TemplateEngine {
        let label_max_length = self.config.fields.label_max_length;
        let registry = self.registry.unwrap_or_else(|| {
            let context = self
                .context
                .unwrap_or_else(|| Arc::new(SystemValueContext::new()));
            FieldRegistry::new(context)
        });
        let registry = registry.with_label_max_length(label_max_length);
        let errors = self.errors.unwrap_or_else(|| Arc::new(TracingErrorSink));

        TemplateEngine {
            parser: TemplateParser::new(Arc::new(registry), errors.clone()),
            snippets: self
                .snippets
                .unwrap_or_else(|| Arc::new(MemorySnippetSource::new())),
            errors,
            max_snippet_depth: self.config.resolution.max_snippet_depth,
            input: self.input.unwrap_or_else(|| Arc::new(NoInput)),
            outstanding: Mutex::new(None),
            next_request_id: AtomicU64::new(1),
        }
    }
}
