//! Legacy placeholder vocabulary
//!
//! Legacy placeholders carry no payload: `{{ date }}`, `{{ random_digit }}`,
//! or `{{ snippet:<id> }}`. The text between the markers is the whole id.

use crate::context::ValueContext;
use crate::date_format::format_date_time;
use crate::error::{FieldError, Result};
use crate::random::RandomKind;

/// Prefix of legacy snippet placeholders
pub const SNIPPET_PREFIX: &str = "snippet:";

/// A recognised legacy placeholder id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyId {
    Platform,
    IpAddress,
    Time,
    Date,
    DateTime,
    DayOfWeek,
    DayOfMonth,
    DayOfMonthZero,
    Year,
    YearShort,
    Hour24,
    Hour12,
    Minutes,
    Seconds,
    AmPm,
    Timezone,
    Month,
    MonthNumber,
    MonthNumberZero,
    RandomDigit,
    RandomLatin,
    /// `snippet:<id>`, holding the trimmed snippet id
    Snippet(String),
}

impl LegacyId {
    /// Every fixed id, in presentation order
    pub const COMMON: [LegacyId; 21] = [
        LegacyId::DateTime,
        LegacyId::Date,
        LegacyId::Time,
        LegacyId::DayOfWeek,
        LegacyId::DayOfMonth,
        LegacyId::DayOfMonthZero,
        LegacyId::Month,
        LegacyId::MonthNumber,
        LegacyId::MonthNumberZero,
        LegacyId::Year,
        LegacyId::YearShort,
        LegacyId::Hour24,
        LegacyId::Hour12,
        LegacyId::Minutes,
        LegacyId::Seconds,
        LegacyId::AmPm,
        LegacyId::Timezone,
        LegacyId::IpAddress,
        LegacyId::Platform,
        LegacyId::RandomDigit,
        LegacyId::RandomLatin,
    ];

    /// Match trimmed placeholder text against the vocabulary
    pub fn parse(id: &str) -> Option<Self> {
        if let Some(snippet) = id.strip_prefix(SNIPPET_PREFIX) {
            return Some(LegacyId::Snippet(snippet.trim().to_string()));
        }
        Self::COMMON.iter().find(|legacy| legacy.id() == id).cloned()
    }

    /// Placeholder id
    pub fn id(&self) -> &str {
        match self {
            LegacyId::Platform => "platform",
            LegacyId::IpAddress => "ip_address",
            LegacyId::Time => "time",
            LegacyId::Date => "date",
            LegacyId::DateTime => "date_time",
            LegacyId::DayOfWeek => "day_of_week",
            LegacyId::DayOfMonth => "day_of_month",
            LegacyId::DayOfMonthZero => "day_of_month_zero",
            LegacyId::Year => "year",
            LegacyId::YearShort => "year_short",
            LegacyId::Hour24 => "hour24",
            LegacyId::Hour12 => "hour12",
            LegacyId::Minutes => "minutes",
            LegacyId::Seconds => "seconds",
            LegacyId::AmPm => "am_pm",
            LegacyId::Timezone => "timezone",
            LegacyId::Month => "month",
            LegacyId::MonthNumber => "month_number",
            LegacyId::MonthNumberZero => "month_number_zero",
            LegacyId::RandomDigit => "random_digit",
            LegacyId::RandomLatin => "random_latin",
            LegacyId::Snippet(_) => SNIPPET_PREFIX,
        }
    }

    /// Text between the markers when serialised
    pub fn placeholder_id(&self) -> String {
        match self {
            LegacyId::Snippet(snippet) => format!("{}{}", SNIPPET_PREFIX, snippet),
            other => other.id().to_string(),
        }
    }

    /// Default label
    pub fn title(&self) -> &'static str {
        match self {
            LegacyId::Platform => "Platform",
            LegacyId::IpAddress => "IP address",
            LegacyId::Time => "Time",
            LegacyId::Date => "Date",
            LegacyId::DateTime => "Date and time",
            LegacyId::DayOfWeek => "Day of week",
            LegacyId::DayOfMonth => "Day of month",
            LegacyId::DayOfMonthZero => "Day of month (01)",
            LegacyId::Year => "Year",
            LegacyId::YearShort => "Year (short)",
            LegacyId::Hour24 => "Hour (24)",
            LegacyId::Hour12 => "Hour (12)",
            LegacyId::Minutes => "Minutes",
            LegacyId::Seconds => "Seconds",
            LegacyId::AmPm => "AM/PM",
            LegacyId::Timezone => "Timezone",
            LegacyId::Month => "Month",
            LegacyId::MonthNumber => "Month number",
            LegacyId::MonthNumberZero => "Month number (01)",
            LegacyId::RandomDigit => "Random digit",
            LegacyId::RandomLatin => "Random letter",
            LegacyId::Snippet(_) => "Snippet",
        }
    }

    fn date_pattern(&self) -> Option<&'static str> {
        let pattern = match self {
            LegacyId::Time => "HH:mm",
            LegacyId::Date => "yyyy-MM-dd",
            LegacyId::DateTime => "yyyy-MM-dd HH:mm",
            LegacyId::DayOfWeek => "EEEE",
            LegacyId::DayOfMonth => "d",
            LegacyId::DayOfMonthZero => "dd",
            LegacyId::Year => "yyyy",
            LegacyId::YearShort => "yy",
            LegacyId::Hour24 => "H",
            LegacyId::Hour12 => "h",
            LegacyId::Minutes => "mm",
            LegacyId::Seconds => "ss",
            LegacyId::AmPm => "a",
            LegacyId::Timezone => "zzz",
            LegacyId::Month => "MMMM",
            LegacyId::MonthNumber => "M",
            LegacyId::MonthNumberZero => "MM",
            _ => return None,
        };
        Some(pattern)
    }

    /// Compute the value now.
    ///
    /// Snippets are expanded by the engine, so they yield `None` here.
    pub fn compute(&self, context: &dyn ValueContext) -> Result<Option<String>> {
        if let Some(pattern) = self.date_pattern() {
            return format_date_time(&context.now(), pattern).map(Some);
        }
        match self {
            LegacyId::Platform => Ok(Some(context.platform())),
            LegacyId::IpAddress => context
                .ip_address()
                .map(Some)
                .ok_or_else(|| FieldError::Unavailable("ip address".to_string())),
            LegacyId::RandomDigit => RandomKind::Digit.generate(&[]).map(Some),
            LegacyId::RandomLatin => RandomKind::Latin.generate(&[]).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::FixedContext;

    #[test]
    fn test_vocabulary_round_trips_ids() {
        for legacy in LegacyId::COMMON.iter() {
            assert_eq!(LegacyId::parse(legacy.id()).as_ref(), Some(legacy));
        }
        assert_eq!(LegacyId::parse("weekday"), None);
    }

    #[test]
    fn test_snippet_prefix() {
        let legacy = LegacyId::parse("snippet: 42 ").unwrap();
        assert_eq!(legacy, LegacyId::Snippet("42".to_string()));
        assert_eq!(legacy.placeholder_id(), "snippet:42");
    }

    #[test]
    fn test_compute_date_components() {
        let context = FixedContext::shared();
        let value = |legacy: LegacyId| legacy.compute(context.as_ref()).unwrap();

        assert_eq!(value(LegacyId::Date).as_deref(), Some("2024-03-05"));
        assert_eq!(value(LegacyId::DayOfWeek).as_deref(), Some("Tuesday"));
        assert_eq!(value(LegacyId::DayOfMonthZero).as_deref(), Some("05"));
        assert_eq!(value(LegacyId::Hour12).as_deref(), Some("2"));
        assert_eq!(value(LegacyId::AmPm).as_deref(), Some("PM"));
        assert_eq!(value(LegacyId::MonthNumber).as_deref(), Some("3"));
        assert_eq!(value(LegacyId::Platform).as_deref(), Some("TestOS 1.0"));
        assert_eq!(value(LegacyId::IpAddress).as_deref(), Some("10.0.0.7"));
        assert_eq!(value(LegacyId::Snippet("x".to_string())), None);
    }
}
