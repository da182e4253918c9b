/*!
 * # captionfit - caption conforming for SRT files
 *
 * A Rust library that rewrites subtitle captions so every caption satisfies
 * fixed length, layout and duration limits while keeping speech timing.
 *
 * ## Features
 *
 * - Split over-long captions into timed fragments joined by `...` markers,
 *   sharing the original duration by syllables, characters and pauses
 * - Wrap captions into at most two bottom-heavy lines of 42 characters
 * - Extend captions shorter than 5/6 of a second without closing the
 *   50 ms gap to the next caption
 * - Validate files against the same guidelines without changing them
 * - Pluggable syllable estimation with an optional JSON dictionary
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and the constant tables
 * - `subtitle_processor`: Caption records and SRT reading/writing
 * - `conform`: The pipeline:
 *   - `conform::scorer`: Split-point scoring shared by splitter and balancer
 *   - `conform::metrics`: Syllable, character and pause weighting
 *   - `conform::splitter`: Block splitting and duration distribution
 *   - `conform::balancer`: Two-line wrapping
 *   - `conform::extender`: Minimum-duration extension
 * - `validation`: Read-only rule checking and reports
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod conform;
pub mod validation;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, ConformConfig};
pub use subtitle_processor::{CaptionBlock, SubtitleFile};
pub use conform::{ConformOutcome, ConformStats, Conformer};
pub use validation::{FileReport, ValidationService, ValidatorConfig};
pub use errors::{AppError, ConfigError, SubtitleError};
