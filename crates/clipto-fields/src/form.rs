//! Fields bound to their position in a parsed text

use std::ops::Range;

use crate::field::{Field, FieldKind};

/// A field bound to its `[start, end)` byte span and its ordinal index
/// within one parse of one text.
#[derive(Debug, Clone)]
pub struct FormField {
    pub field: Field,
    pub start: usize,
    pub end: usize,
    pub index: usize,
}

impl FormField {
    /// Bind a field to a span
    pub fn new(field: Field, start: usize, end: usize, index: usize) -> Self {
        Self {
            field,
            start,
            end,
            index,
        }
    }

    /// Same span and index, different field
    pub fn with_field(&self, field: Field) -> Self {
        Self {
            field,
            start: self.start,
            end: self.end,
            index: self.index,
        }
    }

    /// Byte span in the parsed text
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `offset` lies strictly inside the span
    pub fn contains_strictly(&self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    pub fn is_user_input(&self) -> bool {
        self.field.is_user_input()
    }

    pub fn is_snippet_reference(&self) -> bool {
        self.field.is_snippet_reference()
    }

    pub fn is_alias_reference(&self) -> bool {
        self.field.is_alias_reference()
    }
}

/// Value of the field at `position`, following a linked reference to its
/// target in the same list.
///
/// A linked reference reads the target's value and wraps it with its own
/// prefix and suffix. Unlinked references have no value.
pub fn resolved_value(fields: &[FormField], position: usize) -> Option<String> {
    let form_field = fields.get(position)?;
    match &form_field.field.kind {
        FieldKind::Reference(reference) => {
            let target = reference
                .target
                .and_then(|index| fields.iter().find(|candidate| candidate.index == index))
                .filter(|target| !target.is_alias_reference())?;
            target.field.value().map(|value| form_field.field.wrap(value))
        }
        _ => form_field.field.value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ReferenceField, TextField};

    fn text_field(label: &str, value: &str) -> Field {
        Field::new(FieldKind::Text(TextField {
            value: Some(value.to_string()),
            ..Default::default()
        }))
        .with_label(label)
    }

    #[test]
    fn test_linked_reference_reads_target() {
        let mut alias = Field::new(FieldKind::Reference(ReferenceField {
            ref_name: Some("who".to_string()),
            intrinsic: false,
            target: Some(0),
        }));
        alias.prefix = Some("(".to_string());
        alias.suffix = Some(")".to_string());

        let fields = vec![
            FormField::new(text_field("who", "Ann"), 0, 10, 0),
            FormField::new(alias, 12, 20, 1),
        ];

        assert_eq!(resolved_value(&fields, 0).as_deref(), Some("Ann"));
        assert_eq!(resolved_value(&fields, 1).as_deref(), Some("(Ann)"));
        assert_eq!(resolved_value(&fields, 2), None);
    }

    #[test]
    fn test_unlinked_reference_has_no_value() {
        let alias = Field::new(FieldKind::Reference(ReferenceField::default()));
        let fields = vec![FormField::new(alias, 0, 5, 0)];
        assert_eq!(resolved_value(&fields, 0), None);
    }

    #[test]
    fn test_span_helpers() {
        let form_field = FormField::new(text_field("a", "b"), 3, 9, 0);
        assert_eq!(form_field.span(), 3..9);
        assert!(form_field.contains_strictly(4));
        assert!(!form_field.contains_strictly(3));
        assert!(!form_field.contains_strictly(9));

        let replaced = form_field.with_field(text_field("c", "d"));
        assert_eq!(replaced.span(), 3..9);
        assert_eq!(replaced.field.label.as_deref(), Some("c"));
    }
}
