//! Loading and saving [`EngineConfig`]

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::{ConfigStore, EngineConfig},
};

/// Default environment prefix, e.g. `CLIPTO__RENDERING__DEBOUNCE_MS=50`
pub const DEFAULT_ENV_PREFIX: &str = "CLIPTO";

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager using the default path
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager reading `path` instead of the default location
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path the configuration is read from and written to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// `<config_dir>/clipto/dynamic.toml`
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clipto")
            .join("dynamic.toml")
    }
}

impl ConfigStore for ConfigManager {
    fn load_config(&self) -> Result<EngineConfig> {
        let sources = Config::builder()
            .add_source(
                File::from(self.config_path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            );

        let engine_config: EngineConfig = sources.build()?.try_deserialize()?;
        self.validate_config(&engine_config)?;

        debug!(path = %self.config_path.display(), "Loaded dynamic template configuration");
        Ok(engine_config)
    }

    fn save_config(&self, config: &EngineConfig) -> Result<()> {
        self.validate_config(config)?;
        let contents = toml::to_string_pretty(config)?;
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.config_path, contents)?;
        Ok(())
    }

    fn validate_config(&self, config: &EngineConfig) -> Result<()> {
        if config.resolution.max_snippet_depth == 0 {
            return Err(ConfigError::Validation(
                "Max snippet depth must be greater than 0".to_string(),
            ));
        }
        if config.fields.label_max_length == 0 {
            return Err(ConfigError::Validation(
                "Label max length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
