/*!
 * Tests for application configuration functionality
 */

use subweave::app_config::{ClipboardCommand, Config, LogLevel};
use subweave::classifier::DEFAULT_DENYLIST;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.filter.ignore_effects);
    assert_eq!(config.filter.min_duration_secs, 0.6);
    assert_eq!(config.filter.denylist.len(), DEFAULT_DENYLIST.len());
    assert!(config.filter.extra_ignore_patterns.is_empty());
    assert!(!config.output.include_styled_text);
    assert_eq!(config.output.preview_limit, 30);
    assert_eq!(config.output.diagnose_sample, 10);
    assert_eq!(config.output.tail_sample, 5);
    assert_eq!(config.watch.interval_ms, 1000);
    assert!(config.watch.clipboard_command.is_none());
    assert_eq!(config.watch.encoding, "utf-8");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.filter.min_duration_secs = -1.0;
    assert!(config.validate().is_err());
    config.filter.min_duration_secs = f64::NAN;
    assert!(config.validate().is_err());
    config.filter.min_duration_secs = 0.0;
    assert!(config.validate().is_ok());

    config.watch.interval_ms = 0;
    assert!(config.validate().is_err());
    config.watch.interval_ms = 250;

    config.output.preview_limit = 0;
    assert!(config.validate().is_err());
    config.output.preview_limit = 1;

    config.watch.clipboard_command = Some(ClipboardCommand {
        program: "  ".to_string(),
        args: vec![],
    });
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("subweave.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "subweave.json",
        r#"{
            "filter": { "extra_ignore_patterns": ["Wipe"] },
            "output": { "include_styled_text": true },
            "watch": { "clipboard_command": { "program": "xsel" } },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert!(config.filter.ignore_effects);
    assert_eq!(config.filter.extra_ignore_patterns, vec!["Wipe".to_string()]);
    assert!(config.output.include_styled_text);
    assert_eq!(config.output.preview_limit, 30);
    assert_eq!(config.watch.clipboard_command.as_ref().map(|c| c.program.as_str()), Some("xsel"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);

    let filter = config.filter_config();
    assert!(filter.include_styled_text);
    assert_eq!(filter.extra_ignore_patterns, vec!["Wipe".to_string()]);
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "subweave.json", "{ not json")?;

    let result = Config::load_or_create(&path);

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_overrideWatch_withIntervalAndEncoding_shouldReplaceConfigValues() -> anyhow::Result<()> {
    let mut config = Config::default();

    config.override_watch(Some(0.25), Some("shift_jis".to_string()))?;

    assert_eq!(config.watch.interval_ms, 250);
    assert_eq!(config.watch.encoding, "shift_jis");

    config.override_watch(None, None)?;
    assert_eq!(config.watch.interval_ms, 250);
    Ok(())
}

#[test]
fn test_overrideWatch_withBadValues_shouldFail() {
    let mut config = Config::default();

    assert!(config.override_watch(Some(0.0), None).is_err());
    assert!(config.override_watch(Some(-1.0), None).is_err());
    assert!(config.override_watch(None, Some("klingon".to_string())).is_err());
}
