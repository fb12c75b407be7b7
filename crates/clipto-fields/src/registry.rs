//! Field type registry
//!
//! Maps a placeholder type id to the constructor that turns its attributes
//! into a [`FieldKind`]. Placeholders without a payload are matched against
//! the legacy vocabulary instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use crate::context::ValueContext;
use crate::date_format::{to_chrono_pattern, DEFAULT_DATE_PATTERN, DEFAULT_DATE_TIME_PATTERN};
use crate::error::{FieldError, Result};
use crate::field::{
    ids, BarcodeField, ClipboardValue, DateField, DateTimeValue, DeviceInfo, DeviceValue, Field,
    FieldKind, LegacyField, NumberField, RandomValue, ReferenceField, SelectField, SelectOption,
    SnippetValue, TextField, ToggleField, UnknownField,
};
use crate::formatter::ValueFormatter;
use crate::legacy::LegacyId;
use crate::markers::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use crate::random::RandomKind;
use crate::wire::{attrs, payload, Attributes};

/// Builds the variant data of one field type from its attributes
pub type FieldConstructor = fn(&Attributes<'_>, &Arc<dyn ValueContext>) -> Result<FieldKind>;

/// Default label length limit
pub const DEFAULT_LABEL_MAX_LENGTH: usize = 64;

static BUILTIN: Lazy<HashMap<&'static str, FieldConstructor>> = Lazy::new(|| {
    let mut constructors: HashMap<&'static str, FieldConstructor> = HashMap::new();
    constructors.insert(ids::TEXT, build_text);
    constructors.insert(ids::NUMBER, build_number);
    constructors.insert(ids::SELECT, build_select);
    constructors.insert(ids::DATE, build_date);
    constructors.insert(ids::BARCODE, build_barcode);
    constructors.insert(ids::TOGGLE, build_toggle);
    constructors.insert(ids::REFERENCE, build_reference);
    constructors.insert(ids::DATE_TIME, build_date_time);
    constructors.insert(ids::DEVICE, build_device);
    constructors.insert(ids::RANDOM, build_random);
    constructors.insert(ids::CLIPBOARD, build_clipboard);
    constructors.insert(ids::SNIPPET, build_snippet);
    constructors
});

/// Per-parse options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Nesting level injected into every payload
    pub level: u32,
    /// Legacy values stay blank in edit mode
    pub edit_mode: bool,
}

/// Registry of field constructors
#[derive(Clone)]
pub struct FieldRegistry {
    constructors: HashMap<String, FieldConstructor>,
    context: Arc<dyn ValueContext>,
    label_max_length: usize,
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.constructors.keys().collect();
        ids.sort();
        f.debug_struct("FieldRegistry")
            .field("ids", &ids)
            .field("label_max_length", &self.label_max_length)
            .finish()
    }
}

impl FieldRegistry {
    /// Registry with every built-in field type
    pub fn new(context: Arc<dyn ValueContext>) -> Self {
        Self {
            constructors: BUILTIN
                .iter()
                .map(|(id, constructor)| (id.to_string(), *constructor))
                .collect(),
            context,
            label_max_length: DEFAULT_LABEL_MAX_LENGTH,
        }
    }

    /// Registry without typed field types. Only legacy ids are recognised.
    pub fn empty(context: Arc<dyn ValueContext>) -> Self {
        Self {
            constructors: HashMap::new(),
            context,
            label_max_length: DEFAULT_LABEL_MAX_LENGTH,
        }
    }

    /// Truncate labels longer than `max` characters
    pub fn with_label_max_length(mut self, max: usize) -> Self {
        self.label_max_length = max;
        self
    }

    /// Register or replace a constructor
    pub fn register(&mut self, id: impl Into<String>, constructor: FieldConstructor) {
        self.constructors.insert(id.into(), constructor);
    }

    /// Whether `id` has a constructor
    pub fn is_registered(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    /// Environment shared with computed fields
    pub fn context(&self) -> &Arc<dyn ValueContext> {
        &self.context
    }

    /// Turn placeholder text (markers included) into a field.
    ///
    /// Returns `Ok(None)` when the text is not a placeholder at all, and an
    /// error when a registered type rejects its attributes.
    pub fn materialize(&self, placeholder: &str, options: MaterializeOptions) -> Result<Option<Field>> {
        if placeholder.contains('\n') {
            return Ok(None);
        }

        if let Some(mut map) = payload(placeholder) {
            let id = map
                .get(attrs::ID)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string();

            if !id.is_empty() {
                map.insert(attrs::LEVEL.to_string(), Value::from(options.level));
                let attributes = Attributes::new(&map);
                let kind = match self.constructors.get(&id) {
                    Some(constructor) => constructor(&attributes, &self.context)?,
                    None => {
                        debug!(field_id = %id, "Unregistered field type");
                        FieldKind::Unknown(UnknownField {
                            id,
                            attributes: map.clone(),
                        })
                    }
                };
                let mut field = Field::new(kind);
                self.apply_common(&mut field, &attributes)?;
                field.level = options.level;
                field.placeholder = placeholder.to_string();
                return Ok(Some(field));
            }
        }

        let inner = placeholder
            .strip_prefix(PLACEHOLDER_OPEN)
            .and_then(|rest| rest.strip_suffix(PLACEHOLDER_CLOSE))
            .map(str::trim);

        match inner.and_then(LegacyId::parse) {
            Some(legacy) => {
                let value = if options.edit_mode {
                    None
                } else {
                    legacy.compute(self.context.as_ref())?
                };
                let mut field = Field::new(FieldKind::Legacy(LegacyField { legacy, value }));
                field.level = options.level;
                field.placeholder = placeholder.to_string();
                Ok(Some(field))
            }
            None => Ok(None),
        }
    }

    fn apply_common(&self, field: &mut Field, attributes: &Attributes<'_>) -> Result<()> {
        field.label = attributes
            .string(attrs::LABEL)?
            .map(|label| truncate_chars(label, self.label_max_length));
        field.prefix = attributes.string(attrs::PREFIX)?;
        field.suffix = attributes.string(attrs::SUFFIX)?;
        field.required = attributes.bool(attrs::REQUIRED)?.unwrap_or(false);
        Ok(())
    }
}

fn truncate_chars(value: String, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte, _)) => value[..byte].to_string(),
        None => value,
    }
}

fn formatter(attributes: &Attributes<'_>) -> Result<ValueFormatter> {
    Ok(attributes
        .string(attrs::FORMATTER)?
        .map(|name| ValueFormatter::parse(&name))
        .unwrap_or_default())
}

fn build_text(attributes: &Attributes<'_>, context: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let max_length = match attributes.int(attrs::MAX_LENGTH)? {
        Some(max) if max < 1 => {
            return Err(FieldError::invalid_attribute(attrs::MAX_LENGTH, "a positive integer"))
        }
        other => other.map(|max| max as usize),
    };
    let clipboard = attributes.bool(attrs::CLIPBOARD)?.unwrap_or(false);
    let value = if clipboard {
        context.clipboard_text()
    } else {
        attributes.string(attrs::VALUE)?
    };
    Ok(FieldKind::Text(TextField {
        value,
        max_length,
        multi_line: attributes.bool(attrs::MULTI_LINE)?.unwrap_or(false),
        clipboard,
    }))
}

fn build_number(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let min_value = attributes.int(attrs::MIN_VALUE)?;
    let max_value = attributes.int(attrs::MAX_VALUE)?;
    if let (Some(min), Some(max)) = (min_value, max_value) {
        if min > max {
            return Err(FieldError::InvalidDefinition(format!(
                "minValue {} is greater than maxValue {}",
                min, max
            )));
        }
    }
    Ok(FieldKind::Number(NumberField {
        value: attributes.int(attrs::VALUE)?,
        min_value,
        max_value,
    }))
}

fn build_select(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let options = attributes
        .objects(attrs::OPTIONS)?
        .iter()
        .map(|option| {
            Ok(SelectOption {
                title: option.string(attrs::OPTION_TITLE)?,
                value: option.string(attrs::OPTION_VALUE)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(FieldKind::Select(SelectField {
        options,
        values: Vec::new(),
        multiple: attributes.bool(attrs::MULTIPLE)?.unwrap_or(false),
        user_input: attributes.bool(attrs::USER_INPUT)?.unwrap_or(false),
        formatter: formatter(attributes)?,
    }))
}

fn build_date(attributes: &Attributes<'_>, context: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let format = attributes
        .string(attrs::FORMAT)?
        .unwrap_or_else(|| DEFAULT_DATE_PATTERN.to_string());
    to_chrono_pattern(&format)?;

    let period = attributes.string(attrs::VALUE)?;
    let today = context.now().date_naive();
    let value = match period.as_deref() {
        Some("today") => Some(today),
        Some("yesterday") => today.checked_sub_signed(Duration::days(1)),
        Some("tomorrow") => today.checked_add_signed(Duration::days(1)),
        _ => None,
    };
    Ok(FieldKind::Date(DateField {
        format,
        period,
        value,
    }))
}

fn build_barcode(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    Ok(FieldKind::Barcode(BarcodeField {
        values: Vec::new(),
        multiple: attributes.bool(attrs::MULTIPLE)?.unwrap_or(false),
        formatter: formatter(attributes)?,
    }))
}

fn build_toggle(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    Ok(FieldKind::Toggle(ToggleField {
        checked: attributes.bool(attrs::CHECKED)?.unwrap_or(false),
        text: attributes.string(attrs::TEXT)?,
    }))
}

fn build_reference(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    Ok(FieldKind::Reference(ReferenceField {
        ref_name: attributes.string(attrs::REF)?,
        intrinsic: attributes.bool(attrs::INTRINSIC)?.unwrap_or(false),
        target: None,
    }))
}

fn build_date_time(attributes: &Attributes<'_>, context: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let format = attributes
        .string(attrs::FORMAT)?
        .unwrap_or_else(|| DEFAULT_DATE_TIME_PATTERN.to_string());
    to_chrono_pattern(&format)?;
    Ok(FieldKind::DateTime(DateTimeValue {
        format,
        context: context.clone(),
    }))
}

fn build_device(attributes: &Attributes<'_>, context: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let info = attributes
        .string(attrs::TYPE)?
        .map(|kind| DeviceInfo::parse_or_default(&kind))
        .unwrap_or_default();
    Ok(FieldKind::Device(DeviceValue {
        info,
        context: context.clone(),
    }))
}

fn build_random(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let kind = attributes
        .string(attrs::TYPE)?
        .map(|kind| RandomKind::parse_or_default(&kind))
        .unwrap_or_default();
    let options = attributes.string_list(attrs::OPTIONS)?;
    if kind == RandomKind::Custom && options.is_empty() {
        return Err(FieldError::InvalidDefinition(
            "custom random value needs options".to_string(),
        ));
    }
    Ok(FieldKind::Random(RandomValue { kind, options }))
}

fn build_clipboard(_: &Attributes<'_>, context: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    Ok(FieldKind::Clipboard(ClipboardValue {
        context: context.clone(),
    }))
}

fn build_snippet(attributes: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
    let snippet_id = attributes
        .string(attrs::REF)?
        .filter(|id| !id.trim().is_empty())
        .ok_or(FieldError::MissingAttribute(attrs::REF))?;
    Ok(FieldKind::Snippet(SnippetValue {
        snippet_id,
        value: attributes.string(attrs::VALUE)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::FixedContext;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(FixedContext::shared())
    }

    fn preview() -> MaterializeOptions {
        MaterializeOptions::default()
    }

    #[test]
    fn test_typed_field_with_common_attributes() {
        let field = registry()
            .materialize(
                r#"{{"id":"text","label":"Name","prefix":"<","suffix":">","required":true,"value":"Ann"}}"#,
                MaterializeOptions { level: 2, edit_mode: false },
            )
            .unwrap()
            .unwrap();

        assert_eq!(field.id(), "text");
        assert_eq!(field.label.as_deref(), Some("Name"));
        assert!(field.required);
        assert_eq!(field.level, 2);
        assert_eq!(field.value().as_deref(), Some("<Ann>"));
        assert!(field.placeholder.starts_with("{{\"id\""));
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let placeholder = r#"{{"id":"weather","city":"Oslo"}}"#;
        let field = registry().materialize(placeholder, preview()).unwrap().unwrap();

        assert!(field.is_unknown());
        assert_eq!(field.id(), "weather");
        assert_eq!(field.value().as_deref(), Some(placeholder));
        assert_eq!(field.to_placeholder(), placeholder);
    }

    #[test]
    fn test_legacy_ids() {
        let field = registry().materialize("{{ date }}", preview()).unwrap().unwrap();
        assert!(field.is_legacy());
        assert_eq!(field.value().as_deref(), Some("2024-03-05"));

        let edit = MaterializeOptions { level: 0, edit_mode: true };
        let blank = registry().materialize("{{date}}", edit).unwrap().unwrap();
        assert_eq!(blank.value(), None);

        let snippet = registry().materialize("{{snippet:abc}}", preview()).unwrap().unwrap();
        assert_eq!(snippet.snippet_id(), Some("abc"));
    }

    #[test]
    fn test_not_a_placeholder() {
        let registry = registry();
        assert!(registry.materialize("{{ hello }}", preview()).unwrap().is_none());
        assert!(registry.materialize("{{\ndate}}", preview()).unwrap().is_none());
        assert!(registry.materialize("{{}}", preview()).unwrap().is_none());
        assert!(registry.materialize(r#"{{"label":"x"}}"#, preview()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_attributes_fail() {
        let registry = registry();
        assert!(registry
            .materialize(r#"{{"id":"number","minValue":5,"maxValue":1}}"#, preview())
            .is_err());
        assert!(registry
            .materialize(r#"{{"id":"text","multiLine":"yes"}}"#, preview())
            .is_err());
        assert!(registry
            .materialize(r#"{{"id":"datetime","format":"yyyy Q"}}"#, preview())
            .is_err());
        assert!(matches!(
            registry.materialize(r#"{{"id":"snippet"}}"#, preview()),
            Err(FieldError::MissingAttribute("ref"))
        ));
    }

    #[test]
    fn test_label_truncation() {
        let field = registry()
            .with_label_max_length(4)
            .materialize(r#"{{"id":"text","label":"Überlang"}}"#, preview())
            .unwrap()
            .unwrap();
        assert_eq!(field.label.as_deref(), Some("Über"));
    }

    #[test]
    fn test_computed_types() {
        let registry = registry();
        let clipboard = registry.materialize(r#"{{"id":"clipboard"}}"#, preview()).unwrap().unwrap();
        assert_eq!(clipboard.value().as_deref(), Some("copied text"));

        let text = registry
            .materialize(r#"{{"id":"text","clipboard":true}}"#, preview())
            .unwrap()
            .unwrap();
        assert!(text.is_user_input());
        assert_eq!(text.value().as_deref(), Some("copied text"));

        let date = registry
            .materialize(r#"{{"id":"date","value":"yesterday","format":"d.M.yy"}}"#, preview())
            .unwrap()
            .unwrap();
        assert_eq!(date.value().as_deref(), Some("4.3.24"));

        let random = registry
            .materialize(r#"{{"id":"random","type":"custom","options":["a","b"]}}"#, preview())
            .unwrap()
            .unwrap();
        let value = random.value().unwrap();
        assert!(value == "a" || value == "b");
    }

    #[test]
    fn test_custom_constructor() {
        fn build_shout(_: &Attributes<'_>, _: &Arc<dyn ValueContext>) -> Result<FieldKind> {
            Ok(FieldKind::Toggle(ToggleField {
                checked: true,
                text: Some("HEY".to_string()),
            }))
        }

        let mut registry = FieldRegistry::empty(FixedContext::shared());
        assert!(!registry.is_registered("text"));
        registry.register("shout", build_shout);

        let field = registry.materialize(r#"{{"id":"shout"}}"#, preview()).unwrap().unwrap();
        assert_eq!(field.value().as_deref(), Some("HEY"));
    }
}
