//! Building literal text from a template and its fields

use clipto_fields::{resolved_value, FormField};

use crate::config::{ResolutionConfig, TextKind};

/// Replace each field's span in `text` with its display value.
///
/// `fields` must be ordered by span and refer to `text`. The value shown
/// depends on the mode: QR codes always take the raw value, preview shows
/// the placeholder of user-input fields, edit shows the label of snippet
/// references, everything else shows the resolved value.
pub fn substitute(text: &str, fields: &[FormField], config: &ResolutionConfig) -> String {
    if fields.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() * 2);
    let mut last = 0;

    for (position, form_field) in fields.iter().enumerate() {
        let Some(before) = text.get(last..form_field.start) else {
            continue;
        };
        out.push_str(before);

        out.push_str(&display_value(fields, position, config));
        last = form_field.end.min(text.len());
    }

    out.push_str(&text[last..]);
    out
}

/// Replace every field that is not user input, keeping user-input
/// placeholders verbatim.
///
/// Returns the shorter text and the user-input fields with their spans
/// moved into it. Substituted values are never scanned again, so
/// placeholder syntax inside a computed value stays literal text.
pub fn substitute_computed(
    text: &str,
    fields: &[FormField],
    config: &ResolutionConfig,
) -> (String, Vec<FormField>) {
    let mut out = String::with_capacity(text.len());
    let mut remaining = Vec::new();
    let mut last = 0;

    for (position, form_field) in fields.iter().enumerate() {
        let (Some(before), Some(placeholder)) =
            (text.get(last..form_field.start), text.get(form_field.span()))
        else {
            continue;
        };
        out.push_str(before);

        if form_field.is_user_input() {
            let start = out.len();
            out.push_str(placeholder);
            let mut moved = form_field.clone();
            moved.start = start;
            moved.end = out.len();
            remaining.push(moved);
        } else {
            out.push_str(&display_value(fields, position, config));
        }
        last = form_field.end;
    }

    out.push_str(&text[last..]);
    (out, remaining)
}

fn display_value(fields: &[FormField], position: usize, config: &ResolutionConfig) -> String {
    let field = &fields[position].field;
    match config.text_kind {
        TextKind::QrCode => resolved_value(fields, position).unwrap_or_default(),
        TextKind::Plain if config.is_preview_mode() && field.is_user_input() => {
            field.placeholder_text()
        }
        TextKind::Plain if config.is_edit_mode() && field.is_snippet_reference() => {
            field.display_label()
        }
        TextKind::Plain => resolved_value(fields, position).unwrap_or_default(),
    }
}
