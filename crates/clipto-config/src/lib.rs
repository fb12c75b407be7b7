//! Clipto dynamic template configuration
//!
//! Loads [`EngineConfig`] from an optional TOML file layered under
//! `CLIPTO__*` environment variables, and validates it.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    ConfigStore, EngineConfig, FieldsConfig, RenderingConfig, ResolutionSettings,
};
