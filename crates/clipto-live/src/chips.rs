//! Presentation of fields as chips
//!
//! Describes what an editor should draw over a placeholder span. Painting
//! is left to the host.

use clipto_fields::{resolved_value, FieldKind, FormField};

/// Trailing icon of an editable chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseIcon {
    /// Legacy placeholders open a picker
    Expand,
    Edit,
}

/// Colour role of a chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipTone {
    /// Unrecognised payload
    Invalid,
    Computed,
    ReferenceUnlinked,
    ReferenceIntrinsic,
    ReferenceLinked,
    /// User input shown in a read-only editor
    ReadOnly,
    Filled,
    Empty,
}

/// Image-style span drawn in place of the placeholder text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipSpan {
    pub text: String,
    pub close_icon: Option<CloseIcon>,
    pub tone: ChipTone,
}

/// Click-style span that routes taps to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickSpan {
    pub field_index: usize,
    pub start: usize,
    pub end: usize,
}

/// Both spans of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpans {
    pub chip: ChipSpan,
    pub click: ClickSpan,
}

/// How chips are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChipMode {
    /// Template editing: chips show labels and an icon
    pub editable: bool,
    /// The editor does not accept input
    pub read_only: bool,
}

/// Spans for `fields[position]`
///
/// # Panics
/// Panics if `position` is out of bounds.
pub fn field_spans(fields: &[FormField], position: usize, mode: ChipMode) -> FieldSpans {
    let form_field = &fields[position];
    let field = &form_field.field;

    let (text, close_icon) = if mode.editable {
        let icon = if field.is_legacy() {
            CloseIcon::Expand
        } else {
            CloseIcon::Edit
        };
        (field.display_label(), Some(icon))
    } else {
        let text = resolved_value(fields, position).unwrap_or_else(|| field.display_label());
        (text, None)
    };

    FieldSpans {
        chip: ChipSpan {
            text,
            close_icon,
            tone: tone(form_field, mode),
        },
        click: ClickSpan {
            field_index: form_field.index,
            start: form_field.start,
            end: form_field.end,
        },
    }
}

fn tone(form_field: &FormField, mode: ChipMode) -> ChipTone {
    let field = &form_field.field;
    if field.is_unknown() {
        return ChipTone::Invalid;
    }
    if !field.is_user_input() {
        return ChipTone::Computed;
    }
    if let FieldKind::Reference(reference) = &field.kind {
        return match reference.ref_name.as_deref() {
            None | Some("") => ChipTone::ReferenceUnlinked,
            Some(_) if reference.intrinsic => ChipTone::ReferenceIntrinsic,
            Some(_) if reference.target.is_none() => ChipTone::ReferenceUnlinked,
            Some(_) => ChipTone::ReferenceLinked,
        };
    }
    if mode.read_only {
        ChipTone::ReadOnly
    } else if field.has_value() {
        ChipTone::Filled
    } else {
        ChipTone::Empty
    }
}
