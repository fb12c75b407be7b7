//! Placeholder wire format
//!
//! A typed placeholder is a flat JSON object wrapped in one extra pair of
//! braces: `{{"id":"text","label":"Name"}}`. Removing the outermost `{` and
//! `}` leaves the object.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{FieldError, Result};
use crate::field::{Field, FieldKind};
use crate::formatter::ValueFormatter;
use crate::markers::legacy_placeholder;

/// Attribute keys
pub mod attrs {
    pub const ID: &str = "id";
    pub const LABEL: &str = "label";
    pub const VALUE: &str = "value";
    pub const LEVEL: &str = "level";
    pub const REQUIRED: &str = "required";
    pub const OPTIONS: &str = "options";
    pub const TYPE: &str = "type";
    pub const PREFIX: &str = "prefix";
    pub const SUFFIX: &str = "suffix";
    pub const CLIPBOARD: &str = "clipboard";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const MULTI_LINE: &str = "multiLine";
    pub const MIN_VALUE: &str = "minValue";
    pub const MAX_VALUE: &str = "maxValue";
    pub const FORMATTER: &str = "formatter";
    pub const USER_INPUT: &str = "userInput";
    pub const MULTIPLE: &str = "multiple";
    pub const OPTION_TITLE: &str = "l";
    pub const OPTION_VALUE: &str = "v";
    pub const FORMAT: &str = "format";
    pub const REF: &str = "ref";
    pub const CHECKED: &str = "checked";
    pub const TEXT: &str = "text";
    pub const INTRINSIC: &str = "intrinsic";
}

/// JSON object inside a typed placeholder, or `None` if there is none
pub fn payload(placeholder: &str) -> Option<Map<String, Value>> {
    let inner = placeholder.strip_prefix('{')?.strip_suffix('}')?;
    match serde_json::from_str::<Value>(inner) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Typed view over placeholder attributes. `null` counts as absent.
#[derive(Debug, Clone, Copy)]
pub struct Attributes<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Attributes<'a> {
    /// Wrap a payload object
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// String attribute. Numbers are accepted and rendered as text.
    pub fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(FieldError::invalid_attribute(key, "a string")),
        }
    }

    /// Boolean attribute
    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(FieldError::invalid_attribute(key, "a boolean")),
        }
    }

    /// Integer attribute. Whole floats are accepted.
    pub fn int(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| FieldError::invalid_attribute(key, "an integer")),
            Some(_) => Err(FieldError::invalid_attribute(key, "an integer")),
        }
    }

    /// List of strings
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect()),
            Some(_) => Err(FieldError::invalid_attribute(key, "a list")),
        }
    }

    /// List of objects
    pub fn objects(&self, key: &str) -> Result<Vec<Attributes<'a>>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(Attributes::new(map)),
                    _ => Err(FieldError::invalid_attribute(key, "a list of objects")),
                })
                .collect(),
            Some(_) => Err(FieldError::invalid_attribute(key, "a list of objects")),
        }
    }
}

impl Field {
    /// Serialise to placeholder text.
    ///
    /// Legacy fields use the bare form `{{ id }}`. Unknown fields keep the
    /// text they were parsed from.
    pub fn to_placeholder(&self) -> String {
        match &self.kind {
            FieldKind::Legacy(legacy) => legacy_placeholder(&legacy.legacy.placeholder_id()),
            FieldKind::Unknown(_) if !self.placeholder.is_empty() => self.placeholder.clone(),
            _ => {
                let json = escaped_json(&Value::Object(self.attributes()));
                format!("{{{}}}", json)
            }
        }
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_str(&mut map, attrs::ID, Some(self.id()));
        put_str(&mut map, attrs::LABEL, self.label.as_deref());
        put_str(&mut map, attrs::PREFIX, self.prefix.as_deref());
        put_str(&mut map, attrs::SUFFIX, self.suffix.as_deref());
        put_flag(&mut map, attrs::REQUIRED, self.required);

        match &self.kind {
            FieldKind::Text(text) => {
                put_str(&mut map, attrs::VALUE, text.value.as_deref());
                put_int(&mut map, attrs::MAX_LENGTH, text.max_length.map(|v| v as i64));
                put_flag(&mut map, attrs::MULTI_LINE, text.multi_line);
                put_flag(&mut map, attrs::CLIPBOARD, text.clipboard);
            }
            FieldKind::Number(number) => {
                put_int(&mut map, attrs::VALUE, number.value);
                put_int(&mut map, attrs::MIN_VALUE, number.min_value);
                put_int(&mut map, attrs::MAX_VALUE, number.max_value);
            }
            FieldKind::Select(select) => {
                let options: Vec<Value> = select
                    .options
                    .iter()
                    .map(|option| {
                        let mut entry = Map::new();
                        put_str(&mut entry, attrs::OPTION_TITLE, option.title.as_deref());
                        put_str(&mut entry, attrs::OPTION_VALUE, option.value.as_deref());
                        Value::Object(entry)
                    })
                    .collect();
                if !options.is_empty() {
                    map.insert(attrs::OPTIONS.to_string(), Value::Array(options));
                }
                put_flag(&mut map, attrs::MULTIPLE, select.multiple);
                put_flag(&mut map, attrs::USER_INPUT, select.user_input);
                put_formatter(&mut map, &select.formatter);
            }
            FieldKind::Date(date) => {
                put_str(&mut map, attrs::FORMAT, Some(&date.format));
                put_str(&mut map, attrs::VALUE, date.period.as_deref());
            }
            FieldKind::Barcode(barcode) => {
                put_flag(&mut map, attrs::MULTIPLE, barcode.multiple);
                if barcode.multiple {
                    put_formatter(&mut map, &barcode.formatter);
                }
            }
            FieldKind::Toggle(toggle) => {
                put_flag(&mut map, attrs::CHECKED, toggle.checked);
                put_str(&mut map, attrs::TEXT, toggle.text.as_deref());
            }
            FieldKind::Reference(reference) => {
                put_str(&mut map, attrs::REF, reference.ref_name.as_deref());
                put_flag(&mut map, attrs::INTRINSIC, reference.intrinsic);
            }
            FieldKind::DateTime(date_time) => {
                put_str(&mut map, attrs::FORMAT, Some(&date_time.format));
            }
            FieldKind::Device(device) => {
                put_str(&mut map, attrs::TYPE, Some(device.info.as_str()));
            }
            FieldKind::Random(random) => {
                put_str(&mut map, attrs::TYPE, Some(random.kind.as_str()));
                if !random.options.is_empty() {
                    let options = random.options.iter().cloned().map(Value::String).collect();
                    map.insert(attrs::OPTIONS.to_string(), Value::Array(options));
                }
            }
            FieldKind::Snippet(snippet) => {
                put_str(&mut map, attrs::REF, Some(&snippet.snippet_id));
            }
            FieldKind::Unknown(unknown) => {
                for (key, value) in &unknown.attributes {
                    map.entry(key.clone()).or_insert_with(|| value.clone());
                }
                map.remove(attrs::LEVEL);
            }
            FieldKind::Clipboard(_) | FieldKind::Legacy(_) => {}
        }
        map
    }
}

fn put_str(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn put_int(map: &mut Map<String, Value>, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::from(value));
    }
}

fn put_flag(map: &mut Map<String, Value>, key: &str, value: bool) {
    if value {
        map.insert(key.to_string(), Value::Bool(true));
    }
}

fn put_formatter(map: &mut Map<String, Value>, formatter: &ValueFormatter) {
    if *formatter != ValueFormatter::default() {
        put_str(map, attrs::FORMATTER, Some(formatter.name()));
    }
}

/// Writes `{` and `}` inside JSON strings as unicode escapes so the
/// serialised object never contains a premature close marker.
struct BraceEscaping;

impl Formatter for BraceEscaping {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut rest = fragment;
        while let Some(at) = rest.find(&['{', '}'][..]) {
            writer.write_all(rest[..at].as_bytes())?;
            let escape: &[u8] = if rest.as_bytes()[at] == b'{' {
                b"\\u007b"
            } else {
                b"\\u007d"
            };
            writer.write_all(escape)?;
            rest = &rest[at + 1..];
        }
        writer.write_all(rest.as_bytes())
    }
}

fn escaped_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, BraceEscaping);
    if let Err(err) = value.serialize(&mut serializer) {
        warn!(error = %err, "Placeholder serialisation failed");
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
