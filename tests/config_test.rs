//! Config file loading

use std::fs;
use tempfile::TempDir;

use toastline::{ConfigError, Theme, ToastOptions, ToastStore, Toaster, ToasterConfig};

#[test]
fn test_load_or_default_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = ToasterConfig::load_or_default(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, ToasterConfig::default());
}

#[test]
fn test_load_applies_file_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"appName": "editor", "updateDelayMs": 250, "defaults": {"theme": "colored"}, "container": {"limit": 2}}"#,
    )
    .unwrap();

    let config = ToasterConfig::load_or_default(&path).unwrap();
    assert_eq!(config.app_name, "editor");
    assert_eq!(config.update_delay_ms, 250);
    assert_eq!(config.defaults.theme, Some(Theme::Colored));
    assert_eq!(config.container.limit, Some(2));
}

#[test]
fn test_load_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let err = ToasterConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("config.json"));
}

#[test]
fn test_load_rejects_zero_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"container": {"limit": 0}}"#).unwrap();

    let err = ToasterConfig::load(&path).unwrap_err();
    assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::ZeroLimit));
}

#[test]
fn test_loaded_config_drives_toaster() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"defaults": {"theme": "dark"}, "container": {"limit": 1}}"#).unwrap();

    let config = ToasterConfig::load(&path).unwrap();
    let toaster = Toaster::builder().config(config).build().unwrap();

    let first = toaster.show("first", ToastOptions::new());
    let second = toaster.show("second", ToastOptions::new());
    assert!(toaster.is_active(&first, None));
    assert!(!toaster.is_active(&second, None));

    let stored = toaster.store().get_toast(&first, None).unwrap();
    assert_eq!(stored.props.options.theme, Some(Theme::Dark));
}
