//! Editor host collaborator
//!
//! The editor owns the text buffer and its spans. Render results are
//! applied through [`EditorHost`] on the editor's own thread.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::chips::{ChipSpan, ClickSpan};
use crate::error::Result;

/// Span and caret operations of an editor widget.
///
/// Spans are addressed by their exact byte range in the current text.
pub trait EditorHost {
    /// Whether the editor accepts input
    fn is_read_only(&self) -> bool {
        false
    }

    fn chip_at(&self, range: Range<usize>) -> Option<ChipSpan>;

    fn click_at(&self, range: Range<usize>) -> Option<ClickSpan>;

    fn set_chip(&mut self, range: Range<usize>, chip: ChipSpan) -> Result<()>;

    fn set_click(&mut self, click: ClickSpan) -> Result<()>;

    /// Remove every span covering exactly `range`
    fn remove_spans(&mut self, range: Range<usize>);

    /// Ranges currently carrying a span, in text order
    fn span_ranges(&self) -> Vec<Range<usize>>;

    /// Caret or last touch position
    fn caret(&self) -> Option<usize>;

    /// Move the caret, relaying out first when span sizes changed
    fn restore_caret(&mut self, position: usize, relayout: bool);

    /// Redraw after span updates that did not move the caret
    fn refresh(&mut self, relayout: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SpanSlot {
    chip: Option<ChipSpan>,
    click: Option<ClickSpan>,
}

/// In-memory host for headless rendering
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    spans: BTreeMap<(usize, usize), SpanSlot>,
    caret: Option<usize>,
    read_only: bool,
    /// Number of refresh or caret restore requests with relayout
    pub relayouts: usize,
    /// Number of refresh requests
    pub refreshes: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn set_caret(&mut self, position: Option<usize>) {
        self.caret = position;
    }

    /// Chips in text order
    pub fn chips(&self) -> Vec<(Range<usize>, ChipSpan)> {
        self.spans
            .iter()
            .filter_map(|(&(start, end), slot)| slot.chip.clone().map(|chip| (start..end, chip)))
            .collect()
    }

    /// Click spans in text order
    pub fn clicks(&self) -> Vec<ClickSpan> {
        self.spans.values().filter_map(|slot| slot.click).collect()
    }

    /// Field index under `offset`, for routing a tap
    pub fn click_target(&self, offset: usize) -> Option<usize> {
        self.clicks()
            .into_iter()
            .find(|click| click.start <= offset && offset < click.end)
            .map(|click| click.field_index)
    }
}

impl EditorHost for MemoryHost {
    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn chip_at(&self, range: Range<usize>) -> Option<ChipSpan> {
        self.spans
            .get(&(range.start, range.end))
            .and_then(|slot| slot.chip.clone())
    }

    fn click_at(&self, range: Range<usize>) -> Option<ClickSpan> {
        self.spans
            .get(&(range.start, range.end))
            .and_then(|slot| slot.click)
    }

    fn set_chip(&mut self, range: Range<usize>, chip: ChipSpan) -> Result<()> {
        self.spans.entry((range.start, range.end)).or_default().chip = Some(chip);
        Ok(())
    }

    fn set_click(&mut self, click: ClickSpan) -> Result<()> {
        self.spans.entry((click.start, click.end)).or_default().click = Some(click);
        Ok(())
    }

    fn remove_spans(&mut self, range: Range<usize>) {
        self.spans.remove(&(range.start, range.end));
    }

    fn span_ranges(&self) -> Vec<Range<usize>> {
        self.spans.keys().map(|&(start, end)| start..end).collect()
    }

    fn caret(&self) -> Option<usize> {
        self.caret
    }

    fn restore_caret(&mut self, position: usize, relayout: bool) {
        self.caret = Some(position);
        if relayout {
            self.relayouts += 1;
        }
    }

    fn refresh(&mut self, relayout: bool) {
        self.refreshes += 1;
        if relayout {
            self.relayouts += 1;
        }
    }
}
