//! Java-style date patterns
//!
//! Placeholders carry `SimpleDateFormat` patterns such as `dd.MM.yyyy HH:mm`.
//! They are translated once into chrono format strings.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::error::{FieldError, Result};

/// Pattern used by date-time fields without a `format` attribute
pub const DEFAULT_DATE_TIME_PATTERN: &str = "yyyy-MM-dd HH:mm";
/// Pattern used by date fields without a `format` attribute
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd";

/// Translate a `SimpleDateFormat` pattern into a chrono format string
pub fn to_chrono_pattern(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is a literal quote, otherwise everything up to the next quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&ch| ch == c).count();
        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M' | 'L', 1) => "%-m",
            ('M' | 'L', 2) => "%m",
            ('M' | 'L', 3) => "%b",
            ('M' | 'L', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('z', _) => "%Z",
            ('Z' | 'X', _) => "%z",
            _ => {
                return Err(FieldError::UnsupportedPattern {
                    letter: c,
                    pattern: pattern.to_string(),
                })
            }
        };
        out.push_str(directive);
        i += run;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Format a date-time with a `SimpleDateFormat` pattern
pub fn format_date_time(value: &DateTime<FixedOffset>, pattern: &str) -> Result<String> {
    let chrono_pattern = to_chrono_pattern(pattern)?;
    let mut out = String::new();
    write!(out, "{}", value.format(&chrono_pattern))
        .map_err(|_| FieldError::Format(pattern.to_string()))?;
    Ok(out)
}

/// Format a calendar date with a `SimpleDateFormat` pattern.
///
/// Time letters render midnight. Zone letters fail.
pub fn format_date(value: &NaiveDate, pattern: &str) -> Result<String> {
    let chrono_pattern = to_chrono_pattern(pattern)?;
    let midnight = value
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| FieldError::Format(pattern.to_string()))?;
    let mut out = String::new();
    write!(out, "{}", midnight.format(&chrono_pattern))
        .map_err(|_| FieldError::Format(pattern.to_string()))?;
    Ok(out)
}
