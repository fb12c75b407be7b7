//! Placeholder markers and cheap text predicates
//!
//! These predicates never parse. They only look for marker characters and
//! are used to decide whether a parse is worth scheduling at all.

/// Opening placeholder marker
pub const PLACEHOLDER_OPEN: &str = "{{";
/// Closing placeholder marker
pub const PLACEHOLDER_CLOSE: &str = "}}";
/// Both markers, in the order they are matched
pub const PLACEHOLDERS: [&str; 2] = [PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE];
/// Value reported when a field fails to produce its value
pub const UNKNOWN_VALUE: &str = "???";

const BRACE_OPEN: char = '{';
const BRACE_CLOSE: char = '}';

/// Placeholder text for a bare (legacy) id: `{{ id }}`
pub fn legacy_placeholder(id: &str) -> String {
    format!("{} {} {}", PLACEHOLDER_OPEN, id, PLACEHOLDER_CLOSE)
}

/// An open marker exists and a close marker follows it
pub fn is_dynamic(text: &str) -> bool {
    match text.find(PLACEHOLDER_OPEN) {
        Some(open) => text[open + PLACEHOLDER_OPEN.len()..].contains(PLACEHOLDER_CLOSE),
        None => false,
    }
}

/// Like [`is_dynamic`] but the text must also be a single line
pub fn is_strongly_dynamic(text: &str) -> bool {
    is_dynamic(text) && !text.contains('\n')
}

/// Either marker occurs somewhere in the text
pub fn can_be_dynamic(text: &str) -> bool {
    text.contains(PLACEHOLDER_OPEN) || text.contains(PLACEHOLDER_CLOSE)
}

/// A single brace occurs somewhere in the text
pub fn can_be_invalid(text: &str) -> bool {
    text.contains(BRACE_OPEN) || text.contains(BRACE_CLOSE)
}

/// Earliest occurrence of either marker at or after `from`.
///
/// When both markers start at the same offset the open marker wins.
pub fn find_marker(text: &str, from: usize) -> Option<(usize, &'static str)> {
    let haystack = text.get(from..)?;
    let open = haystack.find(PLACEHOLDER_OPEN);
    let close = haystack.find(PLACEHOLDER_CLOSE);
    let found = match (open, close) {
        (Some(o), Some(c)) if c < o => (c, PLACEHOLDER_CLOSE),
        (Some(o), _) => (o, PLACEHOLDER_OPEN),
        (None, Some(c)) => (c, PLACEHOLDER_CLOSE),
        (None, None) => return None,
    };
    Some((from + found.0, found.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dynamic_requires_close_after_open() {
        assert!(is_dynamic("a {{ date }} b"));
        assert!(!is_dynamic("}} before {{"));
        assert!(!is_dynamic("{{}"));
        assert!(is_dynamic("{{}}"));
    }

    #[test]
    fn test_strongly_dynamic_rejects_newlines() {
        assert!(is_strongly_dynamic("{{ time }}"));
        assert!(!is_strongly_dynamic("{{\ntime }}"));
    }

    #[test]
    fn test_can_be_predicates() {
        assert!(can_be_dynamic("x}}"));
        assert!(!can_be_dynamic("{x}"));
        assert!(can_be_invalid("{x"));
        assert!(!can_be_invalid("plain"));
    }

    #[test]
    fn test_find_marker_prefers_earliest() {
        let text = "a }} {{ b }}";
        assert_eq!(find_marker(text, 0), Some((2, PLACEHOLDER_CLOSE)));
        assert_eq!(find_marker(text, 4), Some((5, PLACEHOLDER_OPEN)));
        assert_eq!(find_marker(text, 7), Some((10, PLACEHOLDER_CLOSE)));
        assert_eq!(find_marker(text, 12), None);
        assert_eq!(find_marker(text, 40), None);
    }

    #[test]
    fn test_legacy_placeholder() {
        assert_eq!(legacy_placeholder("date"), "{{ date }}");
    }
}
