//! Applying parsed fields to an editor
//!
//! Spans are diffed against what the host already shows so unchanged chips
//! are left alone.

use std::ops::Range;

use clipto_fields::markers::is_strongly_dynamic;
use clipto_fields::FormField;
use tracing::trace;

use crate::chips::{field_spans, ChipMode};
use crate::error::{RenderError, Result};
use crate::host::EditorHost;

/// What one application changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Spans added or replaced
    pub updated: usize,
    /// Spans removed because no field covers them any more
    pub removed: usize,
    /// A replaced chip may have changed line heights
    pub relayout: bool,
    /// New caret position when the caret was inside a field
    pub caret: Option<usize>,
}

impl ApplyReport {
    pub fn changed(&self) -> bool {
        self.updated > 0 || self.removed > 0
    }
}

/// Apply `fields`, parsed from `text`, to `host`.
///
/// Fails without touching the host when a span does not fit `text`.
pub fn apply_fields<H: EditorHost + ?Sized>(
    host: &mut H,
    text: &str,
    fields: &[FormField],
    editable: bool,
) -> Result<ApplyReport> {
    if let Some(outside) = fields.iter().find(|f| f.end > text.len() || f.start > f.end) {
        return Err(RenderError::SpanOutOfBounds {
            start: outside.start,
            end: outside.end,
            len: text.len(),
        });
    }

    let mode = ChipMode {
        editable,
        read_only: host.is_read_only(),
    };
    let mut report = ApplyReport::default();

    for range in host.span_ranges() {
        if !fields.iter().any(|f| f.span() == range) {
            host.remove_spans(range);
            report.removed += 1;
            report.relayout = true;
        }
    }

    for position in 0..fields.len() {
        let span = fields[position].span();
        let spans = field_spans(fields, position, mode);

        match host.chip_at(span.clone()) {
            Some(current) if current == spans.chip => {}
            Some(_) => {
                host.set_chip(span.clone(), spans.chip)?;
                report.updated += 1;
                report.relayout = true;
            }
            None => {
                host.set_chip(span.clone(), spans.chip)?;
                report.updated += 1;
            }
        }

        if host.click_at(span.clone()) != Some(spans.click) {
            host.set_click(spans.click)?;
            report.updated += 1;
        }
    }

    if let Some(caret) = host.caret() {
        report.caret = fields
            .iter()
            .find(|f| f.contains_strictly(caret))
            .map(|f| f.end);
    }

    trace!(
        updated = report.updated,
        removed = report.removed,
        caret = ?report.caret,
        "Applied fields"
    );

    match report.caret {
        Some(caret) => host.restore_caret(caret, report.relayout),
        None if report.changed() => host.refresh(report.relayout),
        None => {}
    }

    Ok(report)
}

/// Remove spans whose text is no longer a single-line placeholder.
///
/// Returns the number of removed spans.
pub fn sweep_invalid_spans<H: EditorHost + ?Sized>(host: &mut H, text: &str) -> usize {
    let invalid: Vec<Range<usize>> = host
        .span_ranges()
        .into_iter()
        .filter(|range| {
            !text
                .get(range.clone())
                .map(is_strongly_dynamic)
                .unwrap_or(false)
        })
        .collect();

    for range in &invalid {
        host.remove_spans(range.clone());
    }
    invalid.len()
}
