//! Behavioural properties of the template engine, end to end

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone};
use clipto_engine::{ActionType, Resolution, ResolutionConfig, TemplateEngine};
use clipto_fields::{Answer, FieldKind, FieldRegistry, ValueContext};
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug)]
struct FixedContext;

impl ValueContext for FixedContext {
    fn now(&self) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).single())
            .expect("valid date")
    }

    fn clipboard_text(&self) -> Option<String> {
        Some("clip".to_string())
    }

    fn platform(&self) -> String {
        "TestOS".to_string()
    }

    fn ip_address(&self) -> Option<String> {
        Some("192.0.2.1".to_string())
    }
}

fn engine() -> TemplateEngine {
    TemplateEngine::builder()
        .registry(FieldRegistry::new(Arc::new(FixedContext)))
        .build()
}

fn placeholder(payload: serde_json::Value) -> String {
    format!("{{{}}}", payload)
}

fn computed_placeholder() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("{{ date }}".to_string()),
        Just("{{time}}".to_string()),
        Just("{{ year }}".to_string()),
        Just("{{ platform }}".to_string()),
        Just("{{ random_digit }}".to_string()),
        Just(placeholder(json!({"id": "datetime", "format": "dd.MM.yyyy"}))),
        Just(placeholder(json!({"id": "device", "type": "ip_address"}))),
        Just(placeholder(json!({"id": "clipboard", "prefix": "<", "suffix": ">"}))),
        Just(placeholder(json!({"id": "random", "type": "uuid"}))),
    ]
}

fn filler() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.\n]{0,12}"
}

fn computed_template() -> impl Strategy<Value = String> {
    prop::collection::vec((filler(), computed_placeholder()), 0..6).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(text, placeholder)| format!("{}{}", text, placeholder))
            .collect()
    })
}

proptest! {
    /// Substituting computed fields leaves nothing to parse
    #[test]
    fn prop_computed_substitution_is_total(template in computed_template()) {
        let engine = engine();
        let config = ResolutionConfig::new(ActionType::Copy);
        let fields = engine.form_fields(&template, &config);
        let output = clipto_engine::substitute(&template, &fields, &config);

        prop_assert!(engine.form_fields(&output, &config).is_empty());
        prop_assert!(!output.contains("{{"));
    }

    /// Spans are strictly increasing and never overlap
    #[test]
    fn prop_spans_increase(template in computed_template(), noise in "[{} a-z\n]{0,20}") {
        let text = format!("{}{}{}", noise, template, noise);
        let fields = engine().form_fields(&text, &ResolutionConfig::new(ActionType::Preview));

        for pair in fields.windows(2) {
            prop_assert!(pair[0].start < pair[0].end);
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }
}

#[test]
fn test_answers_carry_over_when_field_count_is_stable() {
    let engine = engine();
    let a = placeholder(json!({"id": "text", "label": "A"}));
    let b = placeholder(json!({"id": "number", "label": "B"}));
    let config = ResolutionConfig::new(ActionType::Copy);

    let mut fields = engine.form_fields(&format!("{} {}", a, b), &config);
    fields[0].field.answer(Answer::Text("alpha".to_string())).unwrap();
    fields[1].field.answer(Answer::Number(Some(42))).unwrap();

    let edited = format!("Dear {}, you owe {} coins", a, b);
    let carried = engine.form_fields(&edited, &config.clone().with_initial_fields(fields.clone()));
    assert_eq!(carried[0].field.value().as_deref(), Some("alpha"));
    assert_eq!(carried[1].field.value().as_deref(), Some("42"));

    let grown = format!("{} {} {}", a, b, a);
    let fresh = engine.form_fields(&grown, &config.with_initial_fields(fields));
    assert_eq!(fresh.len(), 3);
    assert!(fresh.iter().all(|f| f.field.value().is_none()));
}

#[test]
fn test_newline_inside_markers_is_text() {
    let engine = engine();
    let config = ResolutionConfig::new(ActionType::Preview);

    assert!(engine.form_fields("{{\nid}}", &config).is_empty());
    assert!(engine.form_fields("{{\ndate}}", &config).is_empty());
    assert_eq!(engine.field_count("{{ date }}\n{{ time }}"), 2);
}

#[test]
fn test_intrinsic_alias_clones_its_target() {
    let engine = engine();
    let text = format!(
        "{} and again {}",
        placeholder(json!({"id": "text", "label": "x", "value": "hi"})),
        placeholder(json!({"id": "reference", "ref": "x", "intrinsic": true})),
    );

    let fields = engine.form_fields(&text, &ResolutionConfig::new(ActionType::Copy));
    assert_eq!(fields.len(), 2);
    assert!(matches!(fields[1].field.kind, FieldKind::Text(_)));
    assert_eq!(fields[1].field.value().as_deref(), Some("hi"));
    assert_eq!(fields[1].start, text.find(" again ").unwrap() + 7);
}

#[tokio::test]
async fn test_preview_substitutes_computed_fields() {
    let resolved = engine()
        .resolve("Hello {{date}}", &ResolutionConfig::new(ActionType::Preview))
        .await
        .unwrap();

    assert_eq!(resolved, Resolution::Completed("Hello 2024-03-05".to_string()));
}

#[tokio::test]
async fn test_recursive_resolution_substitutes_nothing() {
    let engine = engine();
    let text = format!(
        "{{{{ date }}}} {}",
        placeholder(json!({"id": "text", "value": "v"}))
    );

    let resolved = engine
        .resolve(&text, &ResolutionConfig::new(ActionType::Recursive))
        .await
        .unwrap();
    assert_eq!(resolved, Resolution::Completed(text));
}
