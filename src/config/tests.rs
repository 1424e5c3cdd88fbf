use super::builder::default_config_content;
use super::validation::validate_config;
use super::*;
use crate::common::constants::test_constants::*;
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn with_config_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir);
    }
    let result = f();
    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
    result
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("themeflux").join("themeflux.toml");

    let result = with_config_home(temp_dir.path(), load);

    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.api_key(), "");
    assert_eq!(config.poll_interval(), std::time::Duration::from_secs(600));
}

#[test]
fn test_default_content_parses_to_defaults() {
    let config: Config = toml::from_str(&default_config_content()).unwrap();
    validate_config(&config).unwrap();

    assert_eq!(config.api_key.as_deref(), Some(""));
    assert_eq!(config.poll_interval, Some(DEFAULT_POLL_INTERVAL));
    assert_eq!(config.transition_offset, Some(DEFAULT_TRANSITION_OFFSET));
    assert_eq!(config.request_timeout, Some(DEFAULT_REQUEST_TIMEOUT));
    assert_eq!(config.applier, Some(ApplierKind::SettingsFile));
    assert_eq!(config.notifier, Some(NotifierKind::Auto));
    assert_eq!(config.settings_file, None);
    assert_eq!(config.command, None);
    assert_eq!(config.day_pair(), ThemePair::new("one-light-ui", "one-light-syntax"));
    assert_eq!(config.night_pair(), ThemePair::new("one-dark-ui", "one-dark-syntax"));
}

#[test]
fn test_default_content_aligns_comments() {
    let content = default_config_content();
    let comment_columns: Vec<usize> = content
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with('[') && line.contains(" # "))
        .map(|line| line.find(" # ").unwrap())
        .collect();
    assert!(!comment_columns.is_empty());
    assert!(comment_columns.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.transition_offset(), chrono::Duration::minutes(10));
    assert_eq!(config.request_timeout(), std::time::Duration::from_secs(30));
    assert_eq!(config.applier(), ApplierKind::SettingsFile);
    assert_eq!(config.notifier(), NotifierKind::Auto);
    assert_eq!(config.settings_key(), "core.themes");
}

#[test]
fn test_api_key_is_trimmed() {
    let config = Config {
        api_key: Some(format!("  {TEST_API_KEY}\n")),
        ..Default::default()
    };
    assert_eq!(config.api_key(), TEST_API_KEY);

    let blank = Config {
        api_key: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(blank.api_key(), "");
}

#[test]
fn test_partial_theme_tables_fall_back_per_field() {
    let config: Config = toml::from_str(&format!(
        r#"
        [day]
        ui = "{TEST_DAY_UI}"

        [night]
        ui = "{TEST_NIGHT_UI}"
        syntax = "{TEST_NIGHT_SYNTAX}"
        "#
    ))
    .unwrap();

    assert_eq!(config.day_pair(), ThemePair::new(TEST_DAY_UI, "one-light-syntax"));
    assert_eq!(
        config.night_pair(),
        ThemePair::new(TEST_NIGHT_UI, TEST_NIGHT_SYNTAX)
    );
    assert_eq!(config.theme_pair(Period::Day), config.day_pair());
    assert_eq!(config.theme_pair(Period::Night), config.night_pair());
    assert_eq!(config.theme_pair(Period::Unknown), config.night_pair());
}

#[test]
fn test_enum_values_parse() {
    let config: Config = toml::from_str(
        r#"
        applier = "command"
        command = ["editor-ctl", "{ui}", "{syntax}"]
        notifier = "desktop"

        [day]
        syntax = "atom-light-syntax"
        "#,
    )
    .unwrap();
    assert_eq!(config.day_pair().syntax, TEST_DAY_SYNTAX);
    assert_eq!(config.applier(), ApplierKind::Command);
    assert_eq!(config.notifier(), NotifierKind::Desktop);
    assert_eq!(config.command().len(), 3);

    assert!(toml::from_str::<Config>(r#"applier = "plugin""#).is_err());
    assert!(toml::from_str::<Config>(r#"notifier = "email""#).is_err());
}

#[test]
fn test_validation_ranges() {
    let ok = Config {
        poll_interval: Some(MAXIMUM_POLL_INTERVAL),
        transition_offset: Some(MINIMUM_TRANSITION_OFFSET),
        request_timeout: Some(MINIMUM_REQUEST_TIMEOUT),
        ..Default::default()
    };
    assert!(validate_config(&ok).is_ok());

    let cases = [
        Config {
            poll_interval: Some(0),
            ..Default::default()
        },
        Config {
            poll_interval: Some(MAXIMUM_POLL_INTERVAL + 1),
            ..Default::default()
        },
        Config {
            transition_offset: Some(MAXIMUM_TRANSITION_OFFSET + 1),
            ..Default::default()
        },
        Config {
            request_timeout: Some(0),
            ..Default::default()
        },
        Config {
            request_timeout: Some(MAXIMUM_REQUEST_TIMEOUT + 1),
            ..Default::default()
        },
    ];
    for config in cases {
        assert!(validate_config(&config).is_err(), "{config:?} should fail");
    }
}

#[test]
fn test_validation_error_names_key() {
    let config = Config {
        poll_interval: Some(0),
        ..Default::default()
    };
    let error = validate_config(&config).unwrap_err().to_string();
    assert!(error.contains("poll_interval"));
}

#[test]
fn test_validation_command_applier_needs_command() {
    let config = Config {
        applier: Some(ApplierKind::Command),
        ..Default::default()
    };
    assert!(validate_config(&config).is_err());

    let config = Config {
        applier: Some(ApplierKind::Command),
        command: Some(vec![" ".to_string()]),
        ..Default::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_blank_theme_and_bad_key() {
    let config = Config {
        night: Some(ThemePairConfig {
            ui: Some("".to_string()),
            syntax: None,
        }),
        ..Default::default()
    };
    assert!(validate_config(&config).is_err());

    let config = Config {
        settings_key: Some("core.".to_string()),
        ..Default::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_load_from_path_errors() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing.toml");
    assert!(load_from_path(&missing).is_err());

    let invalid = temp_dir.path().join("themeflux.toml");
    fs::write(&invalid, "poll_interval = \"often\"").unwrap();
    assert!(load_from_path(&invalid).is_err());

    fs::write(&invalid, "poll_interval = 0").unwrap();
    assert!(load_from_path(&invalid).is_err());

    fs::write(&invalid, format!("api_key = \"{TEST_API_KEY}\"\npoll_interval = 5")).unwrap();
    let config = load_from_path(&invalid).unwrap();
    assert_eq!(config.poll_interval(), std::time::Duration::from_secs(300));
}

#[test]
fn test_settings_file_path_expands_tilde() {
    let config = Config {
        settings_file: Some("/tmp/editor/settings.json".to_string()),
        ..Default::default()
    };
    assert_eq!(
        config.settings_file_path().unwrap(),
        std::path::PathBuf::from("/tmp/editor/settings.json")
    );

    if let Some(home) = dirs::home_dir() {
        let config = Config {
            settings_file: Some("~/editor.json".to_string()),
            ..Default::default()
        };
        assert_eq!(config.settings_file_path().unwrap(), home.join("editor.json"));
    }
}

#[test]
#[serial]
fn test_default_settings_file_next_to_config() {
    let temp_dir = tempdir().unwrap();
    let path = with_config_home(temp_dir.path(), || Config::default().settings_file_path());
    assert_eq!(
        path.unwrap(),
        temp_dir.path().join("themeflux").join("editor.json")
    );
}

#[test]
fn test_applier_settings_change_detection() {
    let base = Config::default();
    let mut changed = base.clone();
    changed.settings_key = Some("ui.themes".to_string());
    assert_ne!(base.applier_settings(), changed.applier_settings());

    let mut slower = base.clone();
    slower.request_timeout = Some(90);
    assert_ne!(base.applier_settings(), slower.applier_settings());

    let mut unrelated = base.clone();
    unrelated.poll_interval = Some(30);
    assert_eq!(base.applier_settings(), unrelated.applier_settings());
}
