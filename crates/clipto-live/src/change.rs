//! Edit classification
//!
//! Decides from a small window around an edit, without parsing, whether the
//! edit can affect placeholders.

use clipto_fields::markers::{can_be_dynamic, can_be_invalid, is_dynamic};

/// One edit of the buffer, in byte offsets of the resulting text.
///
/// `before` bytes starting at `start` were replaced by `count` new bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    pub start: usize,
    pub before: usize,
    pub count: usize,
}

impl TextChange {
    pub fn insert(start: usize, count: usize) -> Self {
        Self {
            start,
            before: 0,
            count,
        }
    }

    pub fn delete(start: usize, before: usize) -> Self {
        Self {
            start,
            before,
            count: 0,
        }
    }

    /// Whole buffer replaced by `len` bytes
    pub fn replace_all(len: usize) -> Self {
        Self {
            start: 0,
            before: 0,
            count: len,
        }
    }
}

/// What an edit requires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeEffect {
    /// Schedule a new render cycle
    pub render: bool,
    /// Existing spans may no longer cover a placeholder
    pub sweep: bool,
}

impl ChangeEffect {
    pub const NONE: ChangeEffect = ChangeEffect {
        render: false,
        sweep: false,
    };

    pub fn is_none(&self) -> bool {
        !self.render && !self.sweep
    }
}

/// Classify `change` applied to produce `text`
pub fn classify(text: &str, change: TextChange) -> ChangeEffect {
    if text.is_empty() {
        return ChangeEffect::NONE;
    }

    if change.before == 0 && change.count == text.len() {
        return ChangeEffect {
            render: is_dynamic(text),
            sweep: false,
        };
    }

    if change.count > 0 {
        let around = window(
            text,
            change.start.saturating_sub(1),
            change.start + change.count + 1,
        );
        if can_be_dynamic(around) {
            return ChangeEffect {
                render: true,
                sweep: false,
            };
        }
        // A line break can split a placeholder without touching its markers
        if around.contains('\n') && can_be_dynamic(text) {
            return ChangeEffect {
                render: true,
                sweep: true,
            };
        }
        return ChangeEffect::NONE;
    }

    if change.before > 0 {
        let around = window(
            text,
            change.start.saturating_sub(change.before),
            change.start + change.before + 1,
        );
        return ChangeEffect {
            render: change.before == 1 && can_be_dynamic(text),
            sweep: can_be_invalid(around),
        };
    }

    ChangeEffect::NONE
}

/// `text[from..to]` clamped to the text and widened to char boundaries
fn window(text: &str, from: usize, to: usize) -> &str {
    let mut from = from.min(text.len());
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = to.min(text.len()).max(from);
    while !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}
