use std::time::Duration;

use clipto_config::*;

fn manager_in(dir: &tempfile::TempDir, prefix: &str) -> ConfigManager {
    ConfigManager::with_path(dir.path().join("dynamic.toml")).with_env_prefix(prefix)
}

#[test]
fn test_engine_config_default() {
    let config = EngineConfig::default();
    assert_eq!(config.rendering.debounce_ms, 300);
    assert!(config.rendering.immediate_first_render);
    assert_eq!(config.rendering.debounce(), Duration::from_millis(300));
    assert_eq!(config.resolution.max_snippet_depth, 5);
    assert_eq!(config.fields.label_max_length, 64);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir, "CLIPTO_TEST_MISSING");

    let config = manager.load_config().unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dynamic.toml"),
        "[rendering]\ndebounce_ms = 120\n",
    )
    .unwrap();
    let manager = manager_in(&dir, "CLIPTO_TEST_PARTIAL");

    let config = manager.load_config().unwrap();
    assert_eq!(config.rendering.debounce_ms, 120);
    assert!(config.rendering.immediate_first_render);
    assert_eq!(config.resolution.max_snippet_depth, 5);
}

#[test]
fn test_environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dynamic.toml"),
        "[resolution]\nmax_snippet_depth = 3\n",
    )
    .unwrap();
    std::env::set_var("CLIPTO_TEST_ENV__RESOLUTION__MAX_SNIPPET_DEPTH", "7");
    let manager = manager_in(&dir, "CLIPTO_TEST_ENV");

    let config = manager.load_config().unwrap();
    std::env::remove_var("CLIPTO_TEST_ENV__RESOLUTION__MAX_SNIPPET_DEPTH");

    assert_eq!(config.resolution.max_snippet_depth, 7);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConfigManager::with_path(dir.path().join("nested").join("dynamic.toml"))
        .with_env_prefix("CLIPTO_TEST_SAVE");

    let mut config = EngineConfig::default();
    config.rendering.debounce_ms = 42;
    config.fields.label_max_length = 12;
    manager.save_config(&config).unwrap();

    assert!(manager.config_path().exists());
    assert_eq!(manager.load_config().unwrap(), config);
}

#[test]
fn test_config_validation() {
    let manager = ConfigManager::new();
    let mut config = EngineConfig::default();
    assert!(manager.validate_config(&config).is_ok());

    config.resolution.max_snippet_depth = 0;
    assert!(matches!(
        manager.validate_config(&config),
        Err(ConfigError::Validation(_))
    ));

    config.resolution.max_snippet_depth = 2;
    config.fields.label_max_length = 0;
    assert!(manager.validate_config(&config).is_err());
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dynamic.toml"),
        "[fields]\nlabel_max_length = 0\n",
    )
    .unwrap();
    let manager = manager_in(&dir, "CLIPTO_TEST_INVALID");

    assert!(matches!(
        manager.load_config(),
        Err(ConfigError::Validation(_))
    ));
}
