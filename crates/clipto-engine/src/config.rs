//! Per-call resolution configuration

use clipto_fields::FormField;

/// What the resolved text is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Confirm,
    Copy,
    Share,
    Insert,
    Edit,
    Preview,
    /// Expanding a snippet inside another template
    Recursive,
}

impl ActionType {
    /// Whether this action never asks the user for input
    pub fn skips_user_input(&self) -> bool {
        matches!(self, ActionType::Preview | ActionType::Recursive)
    }
}

/// Kind of text being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextKind {
    #[default]
    Plain,
    /// Encoded as a QR code: raw values only
    QrCode,
}

/// Configuration of one parse or resolution call
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    /// 0 for a top-level call, deeper for snippet expansion
    pub level: u32,
    pub action_type: ActionType,
    pub text_kind: TextKind,
    /// Fields from a previous parse, for value continuity
    pub initial_fields: Vec<FormField>,
    /// Text produced by the application itself: returned untouched
    pub internal: bool,
}

impl ResolutionConfig {
    /// Top-level configuration for `action_type`
    pub fn new(action_type: ActionType) -> Self {
        Self {
            level: 0,
            action_type,
            text_kind: TextKind::Plain,
            initial_fields: Vec::new(),
            internal: false,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_text_kind(mut self, text_kind: TextKind) -> Self {
        self.text_kind = text_kind;
        self
    }

    pub fn with_initial_fields(mut self, fields: Vec<FormField>) -> Self {
        self.initial_fields = fields;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Configuration for expanding a snippet found at this level
    pub fn nested(&self) -> Self {
        Self {
            level: self.level + 1,
            action_type: ActionType::Recursive,
            text_kind: self.text_kind,
            initial_fields: Vec::new(),
            internal: false,
        }
    }

    pub fn skips_user_input(&self) -> bool {
        self.action_type.skips_user_input()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.action_type == ActionType::Edit
    }

    pub fn is_preview_mode(&self) -> bool {
        self.action_type == ActionType::Preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_flags() {
        assert!(ActionType::Preview.skips_user_input());
        assert!(ActionType::Recursive.skips_user_input());
        for action in [
            ActionType::Confirm,
            ActionType::Copy,
            ActionType::Share,
            ActionType::Insert,
            ActionType::Edit,
        ] {
            assert!(!action.skips_user_input());
        }
    }

    #[test]
    fn test_nested_config() {
        let config = ResolutionConfig::new(ActionType::Copy)
            .with_level(1)
            .with_text_kind(TextKind::QrCode);
        let nested = config.nested();

        assert_eq!(nested.level, 2);
        assert_eq!(nested.action_type, ActionType::Recursive);
        assert_eq!(nested.text_kind, TextKind::QrCode);
        assert!(nested.initial_fields.is_empty());
    }
}
