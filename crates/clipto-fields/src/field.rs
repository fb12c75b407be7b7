//! Field model
//!
//! A [`Field`] is the typed model of one placeholder. Common attributes live
//! on the struct, behaviour is selected by the [`FieldKind`] variant.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::context::ValueContext;
use crate::date_format::{format_date, format_date_time};
use crate::error::{FieldError, Result};
use crate::formatter::ValueFormatter;
use crate::legacy::LegacyId;
use crate::markers::UNKNOWN_VALUE;
use crate::random::RandomKind;

/// Stable type ids of typed placeholders
pub mod ids {
    pub const TEXT: &str = "text";
    pub const NUMBER: &str = "number";
    pub const SELECT: &str = "select";
    pub const DATE: &str = "date";
    pub const BARCODE: &str = "barcode";
    pub const TOGGLE: &str = "toggle";
    pub const REFERENCE: &str = "reference";
    pub const DATE_TIME: &str = "datetime";
    pub const DEVICE: &str = "device";
    pub const RANDOM: &str = "random";
    pub const CLIPBOARD: &str = "clipboard";
    pub const SNIPPET: &str = "snippet";
}

/// One placeholder
#[derive(Debug, Clone)]
pub struct Field {
    /// User supplied label
    pub label: Option<String>,
    /// Prepended to non-empty values
    pub prefix: Option<String>,
    /// Appended to non-empty values
    pub suffix: Option<String>,
    /// Form hint from the `required` attribute. Written back on
    /// serialisation but not enforced here; input collaborators decide
    /// whether to accept a blank answer.
    pub required: bool,
    /// Nesting level the field was parsed at
    pub level: u32,
    /// Placeholder text the field was parsed from
    pub placeholder: String,
    /// Variant data
    pub kind: FieldKind,
}

/// Field variants
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text(TextField),
    Number(NumberField),
    Select(SelectField),
    Date(DateField),
    Barcode(BarcodeField),
    Toggle(ToggleField),
    Reference(ReferenceField),
    DateTime(DateTimeValue),
    Device(DeviceValue),
    Random(RandomValue),
    Clipboard(ClipboardValue),
    Snippet(SnippetValue),
    Legacy(LegacyField),
    Unknown(UnknownField),
}

/// Free text answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: Option<String>,
    pub max_length: Option<usize>,
    pub multi_line: bool,
    /// Pre-filled from the clipboard when materialised
    pub clipboard: bool,
}

/// Integer answer with optional bounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberField {
    pub value: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

/// One entry of a select field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOption {
    /// Display title (`l`)
    pub title: Option<String>,
    /// Value inserted into the text (`v`)
    pub value: Option<String>,
}

impl SelectOption {
    /// Value if set, otherwise the title
    pub fn value_or_title(&self) -> Option<&str> {
        self.value.as_deref().or(self.title.as_deref())
    }
}

/// Single or multiple choice answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectField {
    pub options: Vec<SelectOption>,
    pub values: Vec<String>,
    pub multiple: bool,
    /// Free entries beyond the options are accepted
    pub user_input: bool,
    pub formatter: ValueFormatter,
}

/// Calendar date answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    /// `SimpleDateFormat` pattern
    pub format: String,
    /// Period code the default was derived from
    pub period: Option<String>,
    pub value: Option<NaiveDate>,
}

/// Scanned barcode answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarcodeField {
    pub values: Vec<String>,
    pub multiple: bool,
    pub formatter: ValueFormatter,
}

/// Boolean answer that inserts `text` when checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleField {
    pub checked: bool,
    pub text: Option<String>,
}

/// Alias of another field in the same template, looked up by label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceField {
    /// Label of the target field
    pub ref_name: Option<String>,
    /// Inline a clone of the target instead of linking to it
    pub intrinsic: bool,
    /// Ordinal index of the linked target in the same parse
    pub target: Option<usize>,
}

/// Current date and time
#[derive(Debug, Clone)]
pub struct DateTimeValue {
    /// `SimpleDateFormat` pattern
    pub format: String,
    pub context: Arc<dyn ValueContext>,
}

/// Device information selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceInfo {
    #[default]
    Platform,
    IpAddress,
    Os,
    Arch,
}

impl DeviceInfo {
    /// Parse a `type` attribute, falling back to [`DeviceInfo::Platform`]
    pub fn parse_or_default(id: &str) -> Self {
        match id {
            "ip_address" => DeviceInfo::IpAddress,
            "os" => DeviceInfo::Os,
            "arch" => DeviceInfo::Arch,
            _ => DeviceInfo::Platform,
        }
    }

    /// Attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceInfo::Platform => "platform",
            DeviceInfo::IpAddress => "ip_address",
            DeviceInfo::Os => "os",
            DeviceInfo::Arch => "arch",
        }
    }
}

/// Device information value
#[derive(Debug, Clone)]
pub struct DeviceValue {
    pub info: DeviceInfo,
    pub context: Arc<dyn ValueContext>,
}

/// Random value, drawn on every read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RandomValue {
    pub kind: RandomKind,
    pub options: Vec<String>,
}

/// Current clipboard text
#[derive(Debug, Clone)]
pub struct ClipboardValue {
    pub context: Arc<dyn ValueContext>,
}

/// Another stored snippet, expanded recursively by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetValue {
    pub snippet_id: String,
    /// Expanded text, cached by the snippet pass
    pub value: Option<String>,
}

/// Payload-less placeholder from the fixed vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyField {
    pub legacy: LegacyId,
    /// Value computed at parse time, blank in edit mode
    pub value: Option<String>,
}

/// Typed placeholder whose id has no registered provider
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownField {
    pub id: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// An answer supplied for a user-input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Number(Option<i64>),
    Choices(Vec<String>),
    Date(Option<NaiveDate>),
    Scan(String),
    Checked(bool),
}

impl Answer {
    fn kind_name(&self) -> &'static str {
        match self {
            Answer::Text(_) => "text",
            Answer::Number(_) => "number",
            Answer::Choices(_) => "choice",
            Answer::Date(_) => "date",
            Answer::Scan(_) => "scan",
            Answer::Checked(_) => "toggle",
        }
    }
}

impl FieldKind {
    /// Type id of the variant
    pub fn id(&self) -> &str {
        match self {
            FieldKind::Text(_) => ids::TEXT,
            FieldKind::Number(_) => ids::NUMBER,
            FieldKind::Select(_) => ids::SELECT,
            FieldKind::Date(_) => ids::DATE,
            FieldKind::Barcode(_) => ids::BARCODE,
            FieldKind::Toggle(_) => ids::TOGGLE,
            FieldKind::Reference(_) => ids::REFERENCE,
            FieldKind::DateTime(_) => ids::DATE_TIME,
            FieldKind::Device(_) => ids::DEVICE,
            FieldKind::Random(_) => ids::RANDOM,
            FieldKind::Clipboard(_) => ids::CLIPBOARD,
            FieldKind::Snippet(_) => ids::SNIPPET,
            FieldKind::Legacy(legacy) => legacy.legacy.id(),
            FieldKind::Unknown(unknown) => &unknown.id,
        }
    }

    fn default_label(&self) -> &str {
        match self {
            FieldKind::Text(_) => "Text",
            FieldKind::Number(_) => "Number",
            FieldKind::Select(_) => "Select",
            FieldKind::Date(_) => "Date",
            FieldKind::Barcode(_) => "Barcode",
            FieldKind::Toggle(_) => "Toggle",
            FieldKind::Reference(_) => "Reference",
            FieldKind::DateTime(_) => "Date and time",
            FieldKind::Device(_) => "Device info",
            FieldKind::Random(_) => "Random value",
            FieldKind::Clipboard(_) => "Clipboard",
            FieldKind::Snippet(_) => "Snippet",
            FieldKind::Legacy(legacy) => legacy.legacy.title(),
            FieldKind::Unknown(_) => "Unknown",
        }
    }
}

impl Field {
    /// Field with no common attributes set
    pub fn new(kind: FieldKind) -> Self {
        Self {
            label: None,
            prefix: None,
            suffix: None,
            required: false,
            level: 0,
            placeholder: String::new(),
            kind,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Type id, e.g. `"text"` or `"snippet:"`
    pub fn id(&self) -> &str {
        self.kind.id()
    }

    /// Label, or the default label of the kind
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => self.kind.default_label().to_string(),
        }
    }

    /// Placeholder text, serialising the field when it was built in code
    pub fn placeholder_text(&self) -> String {
        if self.placeholder.is_empty() {
            self.to_placeholder()
        } else {
            self.placeholder.clone()
        }
    }

    /// Holds an answer the user can edit
    pub fn is_user_input(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Text(_)
                | FieldKind::Number(_)
                | FieldKind::Select(_)
                | FieldKind::Date(_)
                | FieldKind::Barcode(_)
                | FieldKind::Toggle(_)
                | FieldKind::Reference(_)
        )
    }

    /// Embeds another stored snippet
    pub fn is_snippet_reference(&self) -> bool {
        match &self.kind {
            FieldKind::Snippet(_) => true,
            FieldKind::Legacy(legacy) => matches!(legacy.legacy, LegacyId::Snippet(_)),
            _ => false,
        }
    }

    /// Snippet id for snippet references
    pub fn snippet_id(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Snippet(snippet) => Some(snippet.snippet_id.as_str()),
            FieldKind::Legacy(LegacyField {
                legacy: LegacyId::Snippet(id),
                ..
            }) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Points at another field of the same template
    pub fn is_alias_reference(&self) -> bool {
        matches!(self.kind, FieldKind::Reference(_))
    }

    /// Payload-less placeholder
    pub fn is_legacy(&self) -> bool {
        matches!(self.kind, FieldKind::Legacy(_))
    }

    /// Unregistered type id
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, FieldKind::Unknown(_))
    }

    /// Value without prefix and suffix. May fail.
    pub fn raw_value(&self) -> Result<Option<String>> {
        match &self.kind {
            FieldKind::Text(text) => Ok(text.value.clone()),
            FieldKind::Number(number) => Ok(number.value.map(|v| v.to_string())),
            FieldKind::Select(select) => Ok(non_empty_join(&select.formatter, &select.values)),
            FieldKind::Date(date) => date
                .value
                .as_ref()
                .map(|value| format_date(value, &date.format))
                .transpose(),
            FieldKind::Barcode(barcode) => {
                Ok(non_empty_join(&barcode.formatter, &barcode.values))
            }
            FieldKind::Toggle(toggle) => Ok(if toggle.checked {
                toggle.text.clone()
            } else {
                None
            }),
            FieldKind::Reference(_) => Ok(None),
            FieldKind::DateTime(date_time) => {
                format_date_time(&date_time.context.now(), &date_time.format).map(Some)
            }
            FieldKind::Device(device) => match device.info {
                DeviceInfo::Platform => Ok(Some(device.context.platform())),
                DeviceInfo::IpAddress => device
                    .context
                    .ip_address()
                    .map(Some)
                    .ok_or_else(|| FieldError::Unavailable("ip address".to_string())),
                DeviceInfo::Os => Ok(Some(device.context.os())),
                DeviceInfo::Arch => Ok(Some(device.context.arch())),
            },
            FieldKind::Random(random) => random.kind.generate(&random.options).map(Some),
            FieldKind::Clipboard(clipboard) => Ok(clipboard.context.clipboard_text()),
            FieldKind::Snippet(snippet) => Ok(snippet.value.clone()),
            FieldKind::Legacy(legacy) => Ok(legacy.value.clone()),
            FieldKind::Unknown(_) => Ok(Some(self.placeholder_text())),
        }
    }

    /// Value as inserted into text.
    ///
    /// Never fails: errors are logged and reported as [`UNKNOWN_VALUE`].
    /// Empty values are `None`.
    pub fn value(&self) -> Option<String> {
        match self.raw_value() {
            Ok(Some(value)) if !value.is_empty() => Some(self.wrap(value)),
            Ok(_) => None,
            Err(err) => {
                warn!(field_id = %self.id(), error = %err, "Failed to compute field value");
                Some(UNKNOWN_VALUE.to_string())
            }
        }
    }

    /// Apply prefix and suffix to a non-empty value
    pub fn wrap(&self, value: String) -> String {
        if value.is_empty() || self.unwrapped() {
            return value;
        }
        match (self.prefix.as_deref(), self.suffix.as_deref()) {
            (None, None) => value,
            (prefix, suffix) => format!(
                "{}{}{}",
                prefix.unwrap_or_default(),
                value,
                suffix.unwrap_or_default()
            ),
        }
    }

    fn unwrapped(&self) -> bool {
        matches!(self.kind, FieldKind::Toggle(_) | FieldKind::Unknown(_))
    }

    /// Whether the field currently has a value
    pub fn has_value(&self) -> bool {
        match &self.kind {
            FieldKind::Reference(reference) => reference.target.is_some(),
            _ => self.value().is_some(),
        }
    }

    /// Drop the answer or cached value
    pub fn clear(&mut self) {
        match &mut self.kind {
            FieldKind::Text(text) => text.value = None,
            FieldKind::Number(number) => number.value = None,
            FieldKind::Select(select) => select.values.clear(),
            FieldKind::Date(date) => date.value = None,
            FieldKind::Barcode(barcode) => barcode.values.clear(),
            FieldKind::Toggle(toggle) => toggle.checked = false,
            FieldKind::Snippet(snippet) => snippet.value = None,
            FieldKind::Legacy(legacy) => legacy.value = None,
            FieldKind::Reference(_)
            | FieldKind::DateTime(_)
            | FieldKind::Device(_)
            | FieldKind::Random(_)
            | FieldKind::Clipboard(_)
            | FieldKind::Unknown(_) => {}
        }
    }

    /// This field carrying over the answer of `previous`.
    ///
    /// Only answers of the same kind are carried. Everything else, including
    /// the placeholder attributes, comes from `self`.
    pub fn merged_with(&self, previous: &Field) -> Field {
        let mut merged = self.clone();
        match (&mut merged.kind, &previous.kind) {
            (FieldKind::Text(new), FieldKind::Text(old)) => new.value = old.value.clone(),
            (FieldKind::Number(new), FieldKind::Number(old)) => new.value = old.value,
            (FieldKind::Select(new), FieldKind::Select(old)) => new.values = old.values.clone(),
            (FieldKind::Date(new), FieldKind::Date(old)) => new.value = old.value,
            (FieldKind::Barcode(new), FieldKind::Barcode(old)) => {
                new.values = old.values.clone()
            }
            (FieldKind::Toggle(new), FieldKind::Toggle(old)) => new.checked = old.checked,
            _ => {}
        }
        merged
    }

    /// Store an answer.
    ///
    /// Text is truncated to `maxLength`, numbers must be in range, choices
    /// must be options unless free entry is allowed.
    pub fn answer(&mut self, answer: Answer) -> Result<()> {
        let field_id = self.id().to_string();
        match (&mut self.kind, answer) {
            (FieldKind::Text(text), Answer::Text(value)) => {
                let value = match text.max_length {
                    Some(max) => value.chars().take(max).collect(),
                    None => value,
                };
                text.value = (!value.is_empty()).then_some(value);
            }
            (FieldKind::Number(number), Answer::Number(value)) => {
                if let Some(v) = value {
                    if let Some(min) = number.min_value.filter(|min| v < *min) {
                        return Err(FieldError::OutOfRange(format!("{} < {}", v, min)));
                    }
                    if let Some(max) = number.max_value.filter(|max| v > *max) {
                        return Err(FieldError::OutOfRange(format!("{} > {}", v, max)));
                    }
                }
                number.value = value;
            }
            (FieldKind::Select(select), Answer::Choices(mut values)) => {
                if !select.user_input {
                    if let Some(unknown) = values.iter().find(|v| {
                        !select
                            .options
                            .iter()
                            .any(|o| o.value_or_title() == Some(v.as_str()))
                    }) {
                        return Err(FieldError::UnknownOption(unknown.clone()));
                    }
                }
                if !select.multiple {
                    values.truncate(1);
                }
                select.values = values;
            }
            (FieldKind::Date(date), Answer::Date(value)) => date.value = value,
            (FieldKind::Barcode(barcode), Answer::Scan(value)) => {
                if barcode.multiple {
                    barcode.values.push(value);
                } else {
                    barcode.values = vec![value];
                }
            }
            (FieldKind::Toggle(toggle), Answer::Checked(checked)) => toggle.checked = checked,
            (_, answer) => {
                return Err(FieldError::AnswerMismatch {
                    field: field_id,
                    answer: answer.kind_name(),
                })
            }
        }
        Ok(())
    }
}

fn non_empty_join(formatter: &ValueFormatter, values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(formatter.format(values))
    }
}
