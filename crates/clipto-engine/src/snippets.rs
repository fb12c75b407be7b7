//! Snippet expansion
//!
//! A snippet reference's value is another stored template. It is expanded
//! through the full pipeline one level deeper with
//! [`ActionType::Recursive`](crate::ActionType::Recursive), so nested
//! user-input fields contribute their defaults and never prompt.

use clipto_fields::{FieldError, FieldKind, FormField, UNKNOWN_VALUE};
use tracing::warn;

use crate::config::ResolutionConfig;
use crate::engine::TemplateEngine;

impl TemplateEngine {
    /// Compute and cache the value of every snippet reference in `fields`
    pub(crate) fn evaluate_snippets(&self, fields: &mut [FormField], config: &ResolutionConfig) {
        for form_field in fields.iter_mut().filter(|f| f.is_snippet_reference()) {
            let Some(snippet_id) = form_field.field.snippet_id().map(str::to_string) else {
                continue;
            };

            let (value, title) = match self.snippets.snippet(&snippet_id) {
                Some(record) => {
                    let value = if config.level >= self.max_snippet_depth {
                        warn!(
                            snippet_id = %snippet_id,
                            level = config.level,
                            "Snippet nesting too deep, dropping its placeholders"
                        );
                        let inner = self.parser.parse(&record.text, &config.nested());
                        without_placeholders(&record.text, &inner)
                    } else {
                        self.expand(&record.text, &config.nested())
                    };
                    (value, record.title)
                }
                None => {
                    let err = FieldError::SnippetNotFound(snippet_id.clone());
                    self.errors.report("snippet", &err);
                    (UNKNOWN_VALUE.to_string(), None)
                }
            };

            let field = &mut form_field.field;
            if field.label.is_none() {
                field.label = title;
            }
            match &mut field.kind {
                FieldKind::Snippet(snippet) => snippet.value = Some(value),
                FieldKind::Legacy(legacy) => legacy.value = Some(value),
                _ => {}
            }
        }
    }
}

/// The literal text between placeholders, so a value cut off at the depth
/// limit carries no field syntax into the template that embeds it.
fn without_placeholders(text: &str, fields: &[FormField]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for form_field in fields {
        if let Some(before) = text.get(last..form_field.start) {
            out.push_str(before);
            last = form_field.end;
        }
    }
    out.push_str(text.get(last..).unwrap_or_default());
    out
}
