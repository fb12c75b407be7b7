//! Environment collaborators consulted by computed fields

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use parking_lot::RwLock;

/// Clock, clipboard and device information for computed fields
pub trait ValueContext: Send + Sync + fmt::Debug {
    /// Current local time
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current primary clipboard text, if any
    fn clipboard_text(&self) -> Option<String>;

    /// Human readable platform description
    fn platform(&self) -> String;

    /// Device IP address
    fn ip_address(&self) -> Option<String>;

    /// Operating system name
    fn os(&self) -> String {
        std::env::consts::OS.to_string()
    }

    /// CPU architecture
    fn arch(&self) -> String {
        std::env::consts::ARCH.to_string()
    }
}

/// Default context backed by the local clock and process information.
///
/// Never performs network lookups: the IP address is whatever was
/// configured, or the loopback address.
#[derive(Debug, Default)]
pub struct SystemValueContext {
    ip_address: Option<String>,
    clipboard: RwLock<Option<String>>,
}

impl SystemValueContext {
    /// Create a context with no clipboard content
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fixed IP address
    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Update the clipboard text seen by `clipboard` fields
    pub fn set_clipboard_text(&self, text: Option<String>) {
        *self.clipboard.write() = text;
    }
}

impl ValueContext for SystemValueContext {
    fn now(&self) -> DateTime<FixedOffset> {
        DateTime::<FixedOffset>::from(Local::now())
    }

    fn clipboard_text(&self) -> Option<String> {
        self.clipboard.read().clone()
    }

    fn platform(&self) -> String {
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
    }

    fn ip_address(&self) -> Option<String> {
        Some(
            self.ip_address
                .clone()
                .unwrap_or_else(|| "127.0.0.1".to_string()),
        )
    }
}

/// Stored snippet content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetRecord {
    /// Snippet title, used as the default label
    pub title: Option<String>,
    /// Raw snippet text, itself possibly a template
    pub text: String,
}

impl SnippetRecord {
    /// Snippet without a title
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: None,
            text: text.into(),
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Lookup of stored snippets by id
pub trait SnippetSource: Send + Sync {
    /// Snippet with the given id, if it exists
    fn snippet(&self, id: &str) -> Option<SnippetRecord>;
}

/// In-memory snippet store
#[derive(Debug, Default)]
pub struct MemorySnippetSource {
    snippets: RwLock<HashMap<String, SnippetRecord>>,
}

impl MemorySnippetSource {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a snippet
    pub fn insert(&self, id: impl Into<String>, record: SnippetRecord) {
        self.snippets.write().insert(id.into(), record);
    }

    /// Remove a snippet
    pub fn remove(&self, id: &str) -> Option<SnippetRecord> {
        self.snippets.write().remove(id)
    }
}

impl SnippetSource for MemorySnippetSource {
    fn snippet(&self, id: &str) -> Option<SnippetRecord> {
        self.snippets.read().get(id).cloned()
    }
}

impl<T: SnippetSource + ?Sized> SnippetSource for Arc<T> {
    fn snippet(&self, id: &str) -> Option<SnippetRecord> {
        (**self).snippet(id)
    }
}
