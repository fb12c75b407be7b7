//! Reference linking
//!
//! Alias fields name another field of the same template by label. An
//! intrinsic alias is replaced by a clone of its target; any other alias
//! keeps a link to the target's ordinal index.

use clipto_fields::{FieldKind, FormField};
use tracing::debug;

/// Link or inline every alias in `fields`.
///
/// The target is the first non-alias field whose label equals the alias's
/// `ref`. Aliases without a target stay unlinked.
pub fn link_references(mut fields: Vec<FormField>, edit_mode: bool) -> Vec<FormField> {
    for position in 0..fields.len() {
        let (ref_name, intrinsic) = match &fields[position].field.kind {
            FieldKind::Reference(reference) => match reference.ref_name.as_deref() {
                Some(name) if !name.is_empty() => (name.to_string(), reference.intrinsic),
                _ => continue,
            },
            _ => continue,
        };

        let target = fields.iter().position(|candidate| {
            !candidate.is_alias_reference()
                && candidate.field.label.as_deref() == Some(ref_name.as_str())
        });

        match target {
            Some(target) if intrinsic && !edit_mode => {
                let alias = &fields[position].field;
                let mut clone = fields[target].field.clone();
                clone.placeholder = alias.placeholder.clone();
                clone.required = alias.required;
                clone.prefix = alias.prefix.clone();
                clone.suffix = alias.suffix.clone();
                clone.label = alias.label.clone().or(clone.label);
                clone.level = alias.level;
                debug!(ref_name = %ref_name, position, "Inlining intrinsic reference");
                fields[position] = fields[position].with_field(clone);
            }
            target => {
                let target_index = target.map(|t| fields[t].index);
                if let FieldKind::Reference(reference) = &mut fields[position].field.kind {
                    reference.target = target_index;
                }
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipto_fields::{resolved_value, Answer, Field, ReferenceField, TextField};

    fn text(label: &str, value: &str) -> Field {
        Field::new(FieldKind::Text(TextField {
            value: Some(value.to_string()),
            ..Default::default()
        }))
        .with_label(label)
    }

    fn alias(ref_name: &str, intrinsic: bool) -> Field {
        let mut field = Field::new(FieldKind::Reference(ReferenceField {
            ref_name: Some(ref_name.to_string()),
            intrinsic,
            target: None,
        }));
        field.placeholder = format!("{{{{\"id\":\"reference\",\"ref\":\"{}\"}}}}", ref_name);
        field
    }

    fn list(fields: Vec<Field>) -> Vec<FormField> {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, field)| FormField::new(field, i * 10, i * 10 + 5, i))
            .collect()
    }

    #[test]
    fn test_intrinsic_alias_is_cloned_in_place() {
        let mut aliased = alias("x", true);
        aliased.prefix = Some("[".to_string());
        aliased.suffix = Some("]".to_string());
        let placeholder = aliased.placeholder.clone();

        let fields = link_references(list(vec![text("x", "hi"), aliased]), false);

        assert_eq!(fields.len(), 2);
        let clone = &fields[1];
        assert_eq!(clone.span(), 10..15);
        assert_eq!(clone.index, 1);
        assert_eq!(clone.field.id(), "text");
        assert_eq!(clone.field.label.as_deref(), Some("x"));
        assert_eq!(clone.field.placeholder, placeholder);
        assert_eq!(clone.field.value().as_deref(), Some("[hi]"));
    }

    #[test]
    fn test_intrinsic_clone_accepts_answers() {
        let mut fields = link_references(list(vec![text("x", "hi"), alias("x", true)]), false);
        fields[1].field.answer(Answer::Text("bye".to_string())).unwrap();
        assert_eq!(fields[1].field.value().as_deref(), Some("bye"));
        assert_eq!(fields[0].field.value().as_deref(), Some("hi"));
    }

    #[test]
    fn test_edit_mode_links_instead_of_cloning() {
        let fields = link_references(list(vec![text("x", "hi"), alias("x", true)]), true);
        assert!(fields[1].is_alias_reference());
        assert_eq!(resolved_value(&fields, 1).as_deref(), Some("hi"));
    }

    #[test]
    fn test_plain_alias_follows_target_answers() {
        let mut fields = link_references(list(vec![text("x", "hi"), alias("x", false)]), false);
        fields[0].field.answer(Answer::Text("later".to_string())).unwrap();
        assert_eq!(resolved_value(&fields, 1).as_deref(), Some("later"));
    }

    #[test]
    fn test_missing_target_stays_unlinked() {
        let fields = link_references(list(vec![text("y", "hi"), alias("x", true)]), false);
        assert!(fields[1].is_alias_reference());
        assert_eq!(resolved_value(&fields, 1), None);
    }

    #[test]
    fn test_alias_never_targets_another_alias() {
        let mut first = alias("x", false);
        first.label = Some("x".to_string());
        let fields = link_references(list(vec![first, alias("x", false), text("x", "v")]), false);

        for position in 0..2 {
            match &fields[position].field.kind {
                FieldKind::Reference(reference) => assert_eq!(reference.target, Some(2)),
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
