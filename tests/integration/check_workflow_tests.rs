/*!
 * End-to-end tests for the check workflow
 */

use std::fs;
use anyhow::Result;
use captionfit::app_controller::Controller;
use captionfit::validation::ValidatorConfig;
use crate::common;

/// Test that checking never modifies the file
#[test]
fn test_check_shouldLeaveFileUntouched() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let reports = Controller::new_for_test()?.check_path(&path, ValidatorConfig::default())?;

    assert_eq!(reports.len(), 1);
    assert!(!reports[0].is_clean());
    assert_eq!(fs::read_to_string(&path)?, common::NON_COMPLIANT_SRT);
    assert!(!temp_dir.path().join("movie.srt.bak").exists());

    Ok(())
}

/// Test that the layout problems of the fixture are marked fixable and the timing ones are not
#[test]
fn test_check_shouldMarkFixableViolations() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let reports = Controller::new_for_test()?.check_path(&path, ValidatorConfig::default())?;
    let report = &reports[0];

    for violation in &report.violations {
        let expected = matches!(violation.rule.as_str(), "line-length" | "line-count" | "line-balance" | "double-space");
        assert_eq!(violation.auto_fixable, expected, "{:?}", violation);
    }
    assert!(report.auto_fixable_count() >= 2);

    Ok(())
}

/// Test that unreadable files in a folder are skipped rather than aborting the check
#[test]
fn test_check_folder_withBrokenFile_shouldSkipIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "good.srt", common::COMPLIANT_SRT)?;
    common::create_test_file(temp_dir.path(), "bad.srt", "no captions here")?;

    let reports = Controller::new_for_test()?.check_path(temp_dir.path(), ValidatorConfig::default())?;

    assert_eq!(reports.len(), 1);
    assert!(reports[0].path.ends_with("good.srt"));
    assert!(reports[0].is_clean());

    Ok(())
}

/// Test that the children preset is stricter than the adult one
#[test]
fn test_check_withChildrenPreset_shouldReportMoreReadingSpeedIssues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:01,000 --> 00:00:03,000\nSixteen characters per second ok\n";
    let path = common::create_test_file(temp_dir.path(), "kids.srt", content)?;
    let controller = Controller::new_for_test()?;

    let adult = controller.check_path(&path, ValidatorConfig::default())?;
    let children = controller.check_path(&path, ValidatorConfig::children())?;

    assert!(adult[0].is_clean());
    assert_eq!(children[0].violations.len(), 1);
    assert_eq!(children[0].violations[0].rule, "reading-speed");
    assert_eq!(children[0].error_count(), 0);

    Ok(())
}

/// Test that a missing path is an error
#[test]
fn test_check_withMissingPath_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = Controller::new_for_test()?.check_path(&temp_dir.path().join("nope.srt"), ValidatorConfig::default());
    assert!(result.is_err());
    Ok(())
}
