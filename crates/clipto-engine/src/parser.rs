//! Template parser
//!
//! Scans text for `{{` ... `}}` pairs and asks the field registry to turn
//! each candidate into a field.

use std::sync::Arc;

use clipto_common::ErrorSink;
use clipto_fields::markers::find_marker;
use clipto_fields::{FieldRegistry, FormField, MaterializeOptions, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use tracing::debug;

use crate::config::ResolutionConfig;

const MARKER_LEN: usize = 2;

/// Template parser
#[derive(Clone)]
pub struct TemplateParser {
    registry: Arc<FieldRegistry>,
    errors: Arc<dyn ErrorSink>,
}

impl TemplateParser {
    /// Create a parser over a registry
    pub fn new(registry: Arc<FieldRegistry>, errors: Arc<dyn ErrorSink>) -> Self {
        Self { registry, errors }
    }

    /// Registry used to materialise placeholders
    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    /// Parse `text` into fields ordered by position.
    ///
    /// Spans are byte offsets and never overlap. A candidate that spans a
    /// line break, or that the registry does not recognise, is plain text.
    /// A candidate whose construction fails is reported to the error sink
    /// and skipped.
    ///
    /// # Arguments
    /// * `text` - Text to scan
    /// * `config` - Supplies the nesting level and edit mode
    pub fn parse(&self, text: &str, config: &ResolutionConfig) -> Vec<FormField> {
        let options = MaterializeOptions {
            level: config.level,
            edit_mode: config.is_edit_mode(),
        };

        let mut fields = Vec::new();
        let mut previous: Option<(usize, &'static str)> = None;
        let mut next = find_marker(text, 0);

        while let Some((position, marker)) = next {
            if let Some((start, PLACEHOLDER_OPEN)) = previous {
                if marker == PLACEHOLDER_CLOSE {
                    let end = position + MARKER_LEN;
                    let placeholder = &text[start..end];
                    match self.registry.materialize(placeholder, options) {
                        Ok(Some(field)) => {
                            let index = fields.len();
                            fields.push(FormField::new(field, start, end, index));
                        }
                        Ok(None) => {}
                        Err(err) => {
                            debug!(start, end, error = %err, "Dropping placeholder");
                            self.errors.report("parse", &err);
                        }
                    }
                }
            }
            previous = Some((position, marker));
            next = find_marker(text, position + MARKER_LEN);
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionType;
    use clipto_common::RecordingErrorSink;
    use clipto_fields::SystemValueContext;

    fn parser_with(errors: Arc<RecordingErrorSink>) -> TemplateParser {
        let registry = FieldRegistry::new(Arc::new(SystemValueContext::new()));
        TemplateParser::new(Arc::new(registry), errors)
    }

    fn parser() -> TemplateParser {
        parser_with(Arc::new(RecordingErrorSink::new()))
    }

    fn preview() -> ResolutionConfig {
        ResolutionConfig::new(ActionType::Preview)
    }

    #[test]
    fn test_spans_and_indices() {
        let text = r#"Hi {{"id":"text","label":"Name"}}, today is {{ date }}."#;
        let fields = parser().parse(text, &preview());

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].index, 0);
        assert_eq!(&text[fields[0].span()], r#"{{"id":"text","label":"Name"}}"#);
        assert_eq!(fields[1].index, 1);
        assert_eq!(&text[fields[1].span()], "{{ date }}");
    }

    #[test]
    fn test_newline_splits_placeholder() {
        assert!(parser().parse("{{\ndate}}", &preview()).is_empty());
        assert!(parser().parse("{{ date\n}}", &preview()).is_empty());
    }

    #[test]
    fn test_unmatched_and_unknown_markers_are_text() {
        let fields = parser().parse("{{ nope }} {{ {{ time }} }}", &preview());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field.id(), "time");
        assert_eq!(fields[0].start, 14);
    }

    #[test]
    fn test_close_before_open_is_ignored() {
        let fields = parser().parse("}} {{ year }}", &preview());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].start, 3);
    }

    #[test]
    fn test_construction_failure_is_reported_and_skipped() {
        let errors = Arc::new(RecordingErrorSink::new());
        let text = r#"{{"id":"number","minValue":9,"maxValue":1}} and {{ year }}"#;
        let fields = parser_with(errors.clone()).parse(text, &preview());

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field.id(), "year");
        assert_eq!(fields[0].index, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.reports()[0].tag, "parse");
    }

    #[test]
    fn test_level_is_injected() {
        let config = preview().with_level(3);
        let fields = parser().parse(r#"{{"id":"snippet","ref":"a"}}"#, &config);
        assert_eq!(fields[0].field.level, 3);
    }
}
