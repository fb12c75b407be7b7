use std::sync::Arc;

use clipto_config::RenderingConfig;
use clipto_engine::TemplateEngine;
use clipto_live::{ChipTone, CloseIcon, EditorHost, LiveRenderer, MemoryHost, TextChange};
use proptest::prelude::*;

fn renderer(editable: bool) -> LiveRenderer {
    let engine = Arc::new(TemplateEngine::builder().build());
    let settings = RenderingConfig {
        debounce_ms: 250,
        immediate_first_render: true,
    };
    LiveRenderer::bind(engine, settings, editable)
}

#[tokio::test(start_paused = true)]
async fn test_typing_a_placeholder_renders_a_chip() {
    let mut renderer = renderer(true);
    let mut host = MemoryHost::new();

    let text = "Hi {{ date }}";
    let epoch = renderer.text_changed(&mut host, text, TextChange::replace_all(text.len()));
    assert_eq!(epoch, Some(1));

    let report = renderer.render_next(&mut host).await.expect("applied");
    assert_eq!(report.updated, 2);

    let chips = host.chips();
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].0, 3..13);
    assert_eq!(chips[0].1.text, "Date");
    assert_eq!(chips[0].1.close_icon, Some(CloseIcon::Expand));
    assert_eq!(chips[0].1.tone, ChipTone::Computed);
}

#[tokio::test(start_paused = true)]
async fn test_breaking_a_placeholder_removes_its_chip() {
    let mut renderer = renderer(true);
    let mut host = MemoryHost::new();

    let text = "Hi {{ date }}";
    renderer.text_changed(&mut host, text, TextChange::replace_all(text.len()));
    renderer.render_next(&mut host).await.expect("applied");

    // delete the last '}'
    let broken = "Hi {{ date }";
    let epoch = renderer.text_changed(&mut host, broken, TextChange::delete(12, 1));
    assert_eq!(epoch, Some(2));
    assert!(host.chips().is_empty());

    let report = renderer.render_next(&mut host).await.expect("applied");
    assert_eq!(report.updated, 0);
    assert!(host.span_ranges().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_only_latest_edit_is_applied() {
    let mut renderer = renderer(true);
    let mut host = MemoryHost::new();

    renderer.text_changed(&mut host, "{{ date }}", TextChange::replace_all(10));
    renderer.render_next(&mut host).await.expect("first");

    let first = "{{ date }} {{";
    renderer.text_changed(&mut host, first, TextChange::insert(11, 2));
    let second = "{{ date }} {{ time }}";
    let latest = renderer.text_changed(&mut host, second, TextChange::insert(13, 8));

    let outcome = renderer.next_outcome().await.expect("outcome");
    assert_eq!(Some(outcome.epoch), latest);
    assert_eq!(outcome.text, second);

    renderer.apply(&mut host, &outcome).unwrap();
    assert_eq!(host.chips().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_caret_is_pushed_out_of_a_placeholder() {
    let mut renderer = renderer(true);
    let mut host = MemoryHost::new();
    host.set_caret(Some(6));

    let text = "Hi {{ date }}!";
    renderer.text_changed(&mut host, text, TextChange::replace_all(text.len()));
    let report = renderer.render_next(&mut host).await.expect("applied");

    assert_eq!(report.caret, Some(13));
    assert_eq!(host.caret(), Some(13));
}

#[tokio::test(start_paused = true)]
async fn test_preview_chips_show_values() {
    let mut renderer = renderer(false);
    let mut host = MemoryHost::read_only();

    let text = r#"To: {{"id":"text","label":"Name","value":"Ann"}}"#;
    renderer.text_changed(&mut host, text, TextChange::replace_all(text.len()));
    renderer.render_next(&mut host).await.expect("applied");

    let chips = host.chips();
    assert_eq!(chips[0].1.text, "Ann");
    assert_eq!(chips[0].1.close_icon, None);
    assert_eq!(chips[0].1.tone, ChipTone::ReadOnly);
    assert_eq!(host.click_target(10), Some(0));
}

proptest! {
    /// Classification never panics on arbitrary text and offsets
    #[test]
    fn prop_classification_is_total(
        text in "[a-z{}\né ]{0,30}",
        start in 0usize..40,
        before in 0usize..5,
        count in 0usize..5,
    ) {
        let change = TextChange { start, before, count };
        let effect = clipto_live::classify(&text, change);
        if text.is_empty() {
            prop_assert!(effect.is_none());
        }
        if !text.contains('{') && !text.contains('}') {
            prop_assert!(!effect.render);
            prop_assert!(!effect.sweep);
        }
    }
}
