/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use captionfit::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that find_srt_files walks subdirectories and returns sorted paths
#[test]
fn test_find_srt_files_withNestedDirectories_shouldFindAllSorted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b.srt", common::COMPLIANT_SRT)?;
    common::create_test_file(root, "a.SRT", common::COMPLIANT_SRT)?;
    common::create_test_file(root, "season1/episode1.srt", common::COMPLIANT_SRT)?;
    common::create_test_file(root, "notes.txt", "not a subtitle")?;
    common::create_test_file(root, "b.srt.bak", common::COMPLIANT_SRT)?;

    let files = FileManager::find_srt_files(root)?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.SRT", "b.srt", "season1/episode1.srt"]);

    Ok(())
}

/// Test that write_atomic replaces content and leaves no temp file behind
#[test]
fn test_write_atomic_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.srt", "old")?;

    FileManager::write_atomic(&path, "new content")?;

    assert_eq!(fs::read_to_string(&path)?, "new content");
    assert!(!temp_dir.path().join("movie.srt.tmp").exists());

    Ok(())
}

/// Test that write_atomic creates missing parent directories
#[test]
fn test_write_atomic_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out/nested/movie.srt");

    FileManager::write_atomic(&path, "content")?;

    assert_eq!(FileManager::read_to_string(&path)?, "content");

    Ok(())
}

/// Test the backup naming scheme
#[test]
fn test_backup_path_shouldAppendBakSuffix() {
    let backup = FileManager::backup_path(Path::new("/tmp/subs/movie.en.srt"));
    assert_eq!(backup, Path::new("/tmp/subs/movie.en.srt.bak"));
}

/// Test that create_backup copies the original content
#[test]
fn test_create_backup_shouldCopyOriginal() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.srt", common::COMPLIANT_SRT)?;

    let backup = FileManager::create_backup(&path)?;

    assert_eq!(backup, temp_dir.path().join("movie.srt.bak"));
    assert_eq!(fs::read_to_string(&backup)?, common::COMPLIANT_SRT);

    Ok(())
}

/// Test that copy_file fails for a missing source
#[test]
fn test_copy_file_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = FileManager::copy_file(temp_dir.path().join("missing.srt"), temp_dir.path().join("copy.srt"));
    assert!(result.is_err());
    Ok(())
}

/// Test that append_to_log_file appends timestamped lines
#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("captionfit.log");

    FileManager::append_to_log_file(&log_path, "first run")?;
    FileManager::append_to_log_file(&log_path, "second run")?;

    let content = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first run"));
    assert!(lines[1].ends_with("] second run"));

    Ok(())
}
