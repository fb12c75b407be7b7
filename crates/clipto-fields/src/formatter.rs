//! Joining of multi-value answers (select and barcode fields)

/// How several answer values are joined into one value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueFormatter {
    /// `a, b`
    #[default]
    Comma,
    /// `a; b`
    Semicolon,
    /// `a b`
    Space,
    /// One value per line
    NewLine,
    /// `• a` per line
    BulletList,
    /// `1. a` per line
    NumberedList,
    /// Arbitrary separator
    Separator(String),
}

impl ValueFormatter {
    /// Parse a `formatter` attribute. Unknown names are literal separators.
    pub fn parse(name: &str) -> Self {
        match name {
            "comma" => ValueFormatter::Comma,
            "semicolon" => ValueFormatter::Semicolon,
            "space" => ValueFormatter::Space,
            "new_line" => ValueFormatter::NewLine,
            "bullet_list" => ValueFormatter::BulletList,
            "numbered_list" => ValueFormatter::NumberedList,
            other => ValueFormatter::Separator(other.to_string()),
        }
    }

    /// Attribute value that parses back into this formatter
    pub fn name(&self) -> &str {
        match self {
            ValueFormatter::Comma => "comma",
            ValueFormatter::Semicolon => "semicolon",
            ValueFormatter::Space => "space",
            ValueFormatter::NewLine => "new_line",
            ValueFormatter::BulletList => "bullet_list",
            ValueFormatter::NumberedList => "numbered_list",
            ValueFormatter::Separator(sep) => sep,
        }
    }

    /// Join values. Empty input yields an empty string.
    pub fn format<S: AsRef<str>>(&self, values: &[S]) -> String {
        let parts = values.iter().map(|v| v.as_ref());
        let items: Vec<String> = match self {
            ValueFormatter::BulletList => parts.map(|v| format!("• {}", v)).collect(),
            ValueFormatter::NumberedList => parts
                .enumerate()
                .map(|(i, v)| format!("{}. {}", i + 1, v))
                .collect(),
            _ => parts.map(str::to_string).collect(),
        };
        items.join(self.separator())
    }

    fn separator(&self) -> &str {
        match self {
            ValueFormatter::Comma => ", ",
            ValueFormatter::Semicolon => "; ",
            ValueFormatter::Space => " ",
            ValueFormatter::NewLine | ValueFormatter::BulletList | ValueFormatter::NumberedList => {
                "\n"
            }
            ValueFormatter::Separator(sep) => sep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_formatters() {
        let values = ["red", "green"];
        assert_eq!(ValueFormatter::Comma.format(&values), "red, green");
        assert_eq!(ValueFormatter::parse("semicolon").format(&values), "red; green");
        assert_eq!(ValueFormatter::parse("new_line").format(&values), "red\ngreen");
        assert_eq!(ValueFormatter::parse("numbered_list").format(&values), "1. red\n2. green");
        assert_eq!(ValueFormatter::parse("bullet_list").format(&values), "• red\n• green");
    }

    #[test]
    fn test_literal_separator() {
        let formatter = ValueFormatter::parse(" | ");
        assert_eq!(formatter, ValueFormatter::Separator(" | ".to_string()));
        assert_eq!(formatter.format(&["a", "b", "c"]), "a | b | c");
        assert_eq!(formatter.name(), " | ");
    }

    #[test]
    fn test_single_value_has_no_separator() {
        assert_eq!(ValueFormatter::Comma.format(&["only"]), "only");
        assert_eq!(ValueFormatter::BulletList.format(&["only"]), "• only");
        assert_eq!(ValueFormatter::NumberedList.format(&["only"]), "1. only");
        assert_eq!(ValueFormatter::Space.format(&["a", "b", "c"]), "a b c");
    }

    #[test]
    fn test_empty_values() {
        let empty: [&str; 0] = [];
        assert_eq!(ValueFormatter::NumberedList.format(&empty), "");
    }
}
