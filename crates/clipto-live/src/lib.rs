//! Live rendering of dynamic templates
//!
//! Keeps an editor's placeholder chips in sync with its text while the user
//! types:
//!
//! - [`change`]: cheap classification of edits
//! - [`renderer`]: debounced, epoch-tagged render cycles
//! - [`apply`]: span diffing and caret correction
//! - [`chips`]: what each field looks like
//! - [`host`]: the editor collaborator

pub mod apply;
pub mod change;
pub mod chips;
pub mod error;
pub mod host;
pub mod renderer;

pub use apply::{apply_fields, sweep_invalid_spans, ApplyReport};
pub use change::{classify, ChangeEffect, TextChange};
pub use chips::{field_spans, ChipMode, ChipSpan, ChipTone, ClickSpan, CloseIcon, FieldSpans};
pub use error::{RenderError, Result};
pub use host::{EditorHost, MemoryHost};
pub use renderer::{LiveRenderer, RenderOutcome};
