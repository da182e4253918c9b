/*!
 * Tests for error types
 */

use std::io;
use captionfit::errors::{AppError, ConfigError, SubtitleError};

/// Test subtitle error messages
#[test]
fn test_subtitle_error_display_shouldDescribeProblem() {
    let err = SubtitleError::InvalidTimestamp("00:xx:00,000".to_string());
    assert_eq!(err.to_string(), "Invalid timestamp: 00:xx:00,000");

    let err = SubtitleError::InvalidTimeRange { index: 4, start_ms: 2000, end_ms: 1000 };
    assert_eq!(err.to_string(), "Invalid time range for entry 4: end 1000ms <= start 2000ms");

    assert_eq!(SubtitleError::NoEntries.to_string(), "No valid subtitle entries were found");
}

/// Test that config errors keep their source
#[test]
fn test_config_error_withIoSource_shouldExposeSource() {
    let err = ConfigError::Io {
        path: "conf.json".to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    };
    assert_eq!(err.to_string(), "Failed to read conf.json: not found");
    assert!(std::error::Error::source(&err).is_some());
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_shouldWrapInnerErrors() {
    let err: AppError = SubtitleError::NoEntries.into();
    assert!(matches!(err, AppError::Subtitle(SubtitleError::NoEntries)));
    assert_eq!(err.to_string(), "Subtitle error: No valid subtitle entries were found");

    let err: AppError = ConfigError::Invalid("bad ratio".to_string()).into();
    assert_eq!(err.to_string(), "Config error: Invalid configuration: bad ratio");

    let err: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(err, AppError::File(ref message) if message == "denied"));

    let err: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(err.to_string(), "Unknown error: something odd");
}

/// Test that app errors convert into anyhow and can be recovered
#[test]
fn test_app_error_intoAnyhow_shouldDowncast() {
    let err: anyhow::Error = AppError::File("missing".to_string()).into();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::File(_))));
}
