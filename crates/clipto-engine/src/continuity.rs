//! Value continuity across re-parses
//!
//! When the text around the placeholders is edited, a fresh parse would
//! lose partially entered answers. If the new parse has exactly as many
//! user-input fields as the previous one, answers are carried over by
//! position.

use clipto_fields::FormField;
use tracing::trace;

/// Carry answers from `previous` into `fields` by position among the
/// user-input fields. Nothing is carried when the counts differ or when
/// there were no previous user-input fields.
pub fn carry_over(fields: Vec<FormField>, previous: &[FormField]) -> Vec<FormField> {
    let before: Vec<&FormField> = previous.iter().filter(|f| f.is_user_input()).collect();
    let after = fields.iter().filter(|f| f.is_user_input()).count();

    if before.is_empty() || before.len() != after {
        trace!(before = before.len(), after, "Skipping value continuity");
        return fields;
    }

    let mut before = before.into_iter();
    fields
        .into_iter()
        .map(|form_field| {
            if !form_field.is_user_input() {
                return form_field;
            }
            match before.next() {
                Some(old) => {
                    let merged = form_field.field.merged_with(&old.field);
                    form_field.with_field(merged)
                }
                None => form_field,
            }
        })
        .collect()
}
