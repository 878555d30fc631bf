//! Configuration tests

use super::*;
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that the serialized default config parses back to the same values.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let reloaded = Config::resolve(parsed.unwrap(), |_| None);
    assert_eq!(reloaded.api.url, config.api.url);
    assert_eq!(reloaded.api.token, None);
    assert_eq!(reloaded.api.timeout_secs, config.api.timeout_secs);
    assert_eq!(reloaded.api.page_size, config.api.page_size);
    assert_eq!(reloaded.export.poll_interval_ms, 2000);
    assert_eq!(reloaded.ui.theme, config.ui.theme);
    assert_eq!(reloaded.ui.mouse, config.ui.mouse);
    assert_eq!(reloaded.logging.level, config.logging.level);
    assert_eq!(reloaded.logging.file_rotation, LogRotation::Daily);
    assert_eq!(reloaded.logging.file_prefix, config.logging.file_prefix);
}

/// A token set in the file is written back and survives the round trip.
#[test]
fn test_config_roundtrip_with_token() {
    let mut config = Config::default();
    config.api.token = Some("abc123".to_string());
    config.logging.file_rotation = LogRotation::Hourly;

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let reloaded = Config::resolve(parsed, |_| None);
    assert_eq!(reloaded.api.token.as_deref(), Some("abc123"));
    assert_eq!(reloaded.logging.file_rotation, LogRotation::Hourly);
}

#[test]
fn test_default_template_documents_env_vars() {
    let toml_str = Config::default().to_toml();
    assert!(toml_str.contains(env::API_URL));
    assert!(toml_str.contains(env::TOKEN));
    assert!(toml_str.contains("[export]"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

fn env_map(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
[api]
url = "https://file.example/graphql"
token = "from-file"
page_size = 10
"#,
    )
    .unwrap();

    let config = Config::resolve(
        file,
        env_map(&[
            (env::API_URL, "https://env.example/graphql"),
            (env::TOKEN, "from-env"),
        ]),
    );
    assert_eq!(config.api.url, "https://env.example/graphql");
    assert_eq!(config.api.token.as_deref(), Some("from-env"));
    assert_eq!(config.api.page_size, 10);
}

#[test]
fn test_file_overrides_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
[export]
poll_interval_ms = 500

[logging]
level = "debug"
file_rotation = "never"
"#,
    )
    .unwrap();

    let config = Config::resolve(file, |_| None);
    assert_eq!(config.export.poll_interval_ms, 500);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file_rotation, LogRotation::Never);
    assert_eq!(config.api.url, ApiConfig::default().url);
}

#[test]
fn test_no_tui_flag() {
    assert!(Config::resolve(FileConfig::default(), |_| None).enable_tui);
    assert!(!Config::resolve(FileConfig::default(), env_map(&[(env::NO_TUI, "1")])).enable_tui);
    assert!(!Config::resolve(FileConfig::default(), env_map(&[(env::NO_TUI, "TRUE")])).enable_tui);
    assert!(Config::resolve(FileConfig::default(), env_map(&[(env::NO_TUI, "0")])).enable_tui);
}

#[test]
fn test_empty_token_is_none() {
    let config = Config::resolve(FileConfig::default(), env_map(&[(env::TOKEN, "")]));
    assert!(!config.api.has_token());
}

#[test]
fn test_zero_values_fall_back_to_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
[api]
page_size = 0

[export]
poll_interval_ms = 0
"#,
    )
    .unwrap();
    let config = Config::resolve(file, |_| None);
    assert_eq!(config.api.page_size, ApiConfig::default().page_size);
    assert_eq!(config.export.poll_interval_ms, 2000);
}

#[test]
fn test_unknown_rotation_falls_back_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
}

#[test]
fn test_log_level_is_normalized() {
    let level = |raw: &str| {
        LoggingConfig::from_file(Some(FileLogging {
            level: Some(raw.to_string()),
            ..Default::default()
        }))
        .level
    };
    assert_eq!(level("DEBUG"), "debug");
    assert_eq!(level(" warn "), "warn");
    assert_eq!(level("verbose"), "info");
}

#[test]
fn test_blank_log_paths_keep_defaults() {
    let config = LoggingConfig::from_file(Some(FileLogging {
        file_dir: Some("  ".to_string()),
        file_prefix: Some(String::new()),
        ..Default::default()
    }));
    let defaults = LoggingConfig::default();
    assert_eq!(config.file_dir, defaults.file_dir);
    assert_eq!(config.file_prefix, "lana-admin");
}

#[test]
fn test_default_logs_live_under_the_app_dir() {
    let config = LoggingConfig::default();
    assert!(config.file_dir.ends_with("logs"));
    assert!(!config.file_enabled);
    assert!(config.appender().is_none());
    assert_eq!(config.filter_directive(), "lana_admin=info");
}
