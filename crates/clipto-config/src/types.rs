//! Configuration types for the dynamic template engine

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Live render pipeline settings
    pub rendering: RenderingConfig,
    /// Resolution settings
    pub resolution: ResolutionSettings,
    /// Field materialisation settings
    pub fields: FieldsConfig,
}

/// Live render pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderingConfig {
    /// Debounce delay for render cycles after the first one of a bind
    pub debounce_ms: u64,
    /// Whether the first render after a bind skips the debounce delay
    pub immediate_first_render: bool,
}

/// Resolution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionSettings {
    /// Snippets nested at or beyond this level are not expanded
    pub max_snippet_depth: u32,
}

/// Field materialisation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldsConfig {
    /// Labels longer than this many characters are truncated
    pub label_max_length: usize,
}

impl RenderingConfig {
    /// Debounce delay as a [`Duration`]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            immediate_first_render: true,
        }
    }
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            max_snippet_depth: 5,
        }
    }
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            label_max_length: 64,
        }
    }
}

/// Loading, saving and validation of [`EngineConfig`]
pub trait ConfigStore {
    /// Load configuration
    fn load_config(&self) -> crate::Result<EngineConfig>;
    /// Save configuration
    fn save_config(&self, config: &EngineConfig) -> crate::Result<()>;
    /// Validate configuration
    fn validate_config(&self, config: &EngineConfig) -> crate::Result<()>;
}
