/*!
 * Error types for the captionfit application.
 *
 * The conform pipeline itself is total and never fails; these types cover the
 * edges around it: SRT parsing, configuration loading and file handling.
 */

use thiserror::Error;

/// Errors that can occur while reading or writing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// End time is not strictly after start time
    #[error("Invalid time range for entry {index}: end {end_ms}ms <= start {start_ms}ms")]
    InvalidTimeRange {
        /// Entry number as written in the file
        index: usize,
        /// Start time in milliseconds
        start_ms: u64,
        /// End time in milliseconds
        end_ms: u64,
    },

    /// Nothing usable was found in the content
    #[error("No valid subtitle entries were found")]
    NoEntries,
}

/// Errors that can occur while loading configuration or dictionaries
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected shape
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Path that failed
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Values are present but make no sense together
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
