/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use captionfit::app_config::{Config, LogLevel};
use captionfit::errors::ConfigError;
use crate::common;

/// Test that a partial config file is merged with defaults
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "create_backup": false,
            "log_level": "warn",
            "conform": {
                "limits": { "max_line_chars": 37, "max_block_chars": 74 },
                "words": { "interjections": ["indeed"] }
            }
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert!(!config.create_backup);
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(config.conform.limits.max_line_chars, 37);
    assert_eq!(config.conform.limits.max_block_chars, 74);
    assert_eq!(config.conform.limits.max_duration_ms, 8000);
    assert_eq!(config.conform.scoring.sentence_end_bonus, 200.0);
    assert!(config.conform.words.is_standalone_interjection("Indeed."));
    assert!(!config.conform.words.is_standalone_interjection("Yeah."));
    assert_eq!(config.syllable_dictionary, None);

    Ok(())
}

/// Test that an empty object yields the default configuration
#[test]
fn test_load_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{}")?;

    let config = Config::load(&path)?;

    assert!(config.create_backup);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.conform.limits.min_duration_ms, 833);
    assert_eq!(config.conform.timing.syllable_weight, 0.7);

    Ok(())
}

/// Test that a missing file is an IO error naming the path
#[test]
fn test_load_withMissingFile_shouldReturnIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("missing.json");

    match Config::load(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert!(reported.ends_with("missing.json")),
        other => panic!("expected IO error, got {:?}", other),
    }

    Ok(())
}

/// Test that malformed JSON is a parse error
#[test]
fn test_load_withMalformedJson_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ \"conform\": ")?;

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));

    Ok(())
}

/// Test that inconsistent values are rejected at load time
#[test]
fn test_load_withInvalidValues_shouldReturnInvalidError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "conform": { "limits": { "min_char_ratio": 0.8 } } }"#,
    )?;

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("min_char_ratio"));

    Ok(())
}

/// Test that the default config survives a JSON round trip
#[test]
fn test_default_config_shouldSerializeAndLoadBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = serde_json::to_string_pretty(&Config::default())?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", &json)?;

    let config = Config::load(&path)?;

    assert_eq!(config.conform.timing.punctuation_pauses, Config::default().conform.timing.punctuation_pauses);
    assert_eq!(config.conform.words.hesitations, Config::default().conform.words.hesitations);

    Ok(())
}
