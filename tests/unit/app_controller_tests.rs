/*!
 * Tests for the application controller
 */

use std::collections::HashMap;
use std::fs;
use anyhow::Result;
use captionfit::app_config::Config;
use captionfit::app_controller::{Controller, FixOptions};
use captionfit::errors::AppError;
use captionfit::validation::ValidatorConfig;
use crate::common;

/// Test that the default controller can be created
#[test]
fn test_new_for_test_shouldUseDefaultConfig() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config().conform.limits.max_line_chars, 42);
    Ok(())
}

/// Test that an invalid configuration is rejected
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.conform.limits.max_duration_ms = 0;

    let err = Controller::with_config(config).err().expect("invalid config accepted");
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::Config(_))));
}

/// Test that a configured syllable dictionary is loaded
#[test]
fn test_with_config_withSyllableDictionary_shouldLoadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut entries = HashMap::new();
    entries.insert("fire", 2);
    let dictionary = common::create_test_file(temp_dir.path(), "syllables.json", &serde_json::to_string(&entries)?)?;

    let mut config = Config::default();
    config.syllable_dictionary = Some(dictionary);
    assert!(Controller::with_config(config).is_ok());

    let mut config = Config::default();
    config.syllable_dictionary = Some(temp_dir.path().join("missing.json"));
    assert!(Controller::with_config(config).is_err());

    Ok(())
}

/// Test that a missing input path is reported as a file error
#[test]
fn test_fix_path_withMissingPath_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let err = controller
        .fix_path(&temp_dir.path().join("missing.srt"), &FixOptions::default())
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::File(_))));

    Ok(())
}

/// Test that fixing a file rewrites it and keeps a backup
#[test]
fn test_fix_file_withNonCompliantFile_shouldRewriteAndBackUp() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let report = controller.fix_file(&path, &FixOptions::default())?;

    assert!(report.written);
    assert!(report.has_changes());
    assert_eq!(report.stats.original_count, 3);
    assert_eq!(report.stats.blocks_split, 1);
    assert_eq!(report.stats.durations_extended, 1);
    assert_eq!(report.stats.still_short, 0);

    let backup = temp_dir.path().join("movie.srt.bak");
    assert_eq!(report.backup_path, Some(backup.display().to_string()));
    assert_eq!(fs::read_to_string(&backup)?, common::NON_COMPLIANT_SRT);
    assert_ne!(fs::read_to_string(&path)?, common::NON_COMPLIANT_SRT);

    Ok(())
}

/// Test that a dry run reports changes without writing
#[test]
fn test_fix_file_withDryRun_shouldNotTouchFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let options = FixOptions { dry_run: true, backup: true };
    let report = controller.fix_file(&path, &options)?;

    assert!(report.has_changes());
    assert!(!report.written);
    assert_eq!(report.backup_path, None);
    assert_eq!(fs::read_to_string(&path)?, common::NON_COMPLIANT_SRT);
    assert!(!temp_dir.path().join("movie.srt.bak").exists());

    Ok(())
}

/// Test that a compliant file is left alone
#[test]
fn test_fix_file_withCompliantFile_shouldNotRewrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "clean.srt", common::COMPLIANT_SRT)?;
    let controller = Controller::new_for_test()?;

    let report = controller.fix_file(&path, &FixOptions::default())?;

    assert!(!report.has_changes());
    assert!(!report.written);
    assert_eq!(fs::read_to_string(&path)?, common::COMPLIANT_SRT);
    assert!(!temp_dir.path().join("clean.srt.bak").exists());

    Ok(())
}

/// Test that removing artifacts alone is enough to rewrite a file
#[test]
fn test_fix_file_withOnlyArtifacts_shouldRewrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = format!("{}\n4\n00:00:15,000 --> 00:00:15,200\n.\n", common::COMPLIANT_SRT);
    let path = common::create_test_file(temp_dir.path(), "dots.srt", &content)?;
    let controller = Controller::new_for_test()?;

    let options = FixOptions { dry_run: false, backup: false };
    let report = controller.fix_file(&path, &options)?;

    assert_eq!(report.artifacts_removed, 1);
    assert!(report.written);
    assert!(!temp_dir.path().join("dots.srt.bak").exists());
    assert_eq!(fs::read_to_string(&path)?.trim_end(), common::COMPLIANT_SRT.trim_end());

    Ok(())
}

/// Test that check_path reports one entry per file
#[test]
fn test_check_path_withDirectory_shouldReportEachFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.srt", common::COMPLIANT_SRT)?;
    common::create_test_subtitle(temp_dir.path(), "b.srt")?;
    let controller = Controller::new_for_test()?;

    let reports = controller.check_path(temp_dir.path(), ValidatorConfig::default())?;

    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_clean());
    assert!(reports[1].error_count() > 0);

    Ok(())
}
