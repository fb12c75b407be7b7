//! Field model for clipto dynamic templates
//!
//! A dynamic template is ordinary text containing placeholders such as
//! `{{ date }}` or `{{"id":"text","label":"Name"}}`. This crate owns what a
//! single placeholder is:
//!
//! - [`field`]: the [`Field`] model and its variants
//! - [`registry`]: turning placeholder text into a [`Field`]
//! - [`wire`]: the payload format and serialisation back to text
//! - [`legacy`]: the fixed vocabulary of payload-less placeholders
//! - [`form`]: fields bound to their span in a parsed text

pub mod context;
pub mod date_format;
pub mod error;
pub mod field;
pub mod form;
pub mod formatter;
pub mod legacy;
pub mod markers;
pub mod random;
pub mod registry;
pub mod wire;

pub use context::{MemorySnippetSource, SnippetRecord, SnippetSource, SystemValueContext, ValueContext};
pub use error::{FieldError, Result};
pub use field::{
    Answer, BarcodeField, ClipboardValue, DateField, DateTimeValue, DeviceInfo, DeviceValue,
    Field, FieldKind, LegacyField, NumberField, RandomValue, ReferenceField, SelectField,
    SelectOption, SnippetValue, TextField, ToggleField, UnknownField,
};
pub use form::{resolved_value, FormField};
pub use formatter::ValueFormatter;
pub use legacy::LegacyId;
pub use markers::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN, UNKNOWN_VALUE};
pub use random::RandomKind;
pub use registry::{FieldConstructor, FieldRegistry, MaterializeOptions};
