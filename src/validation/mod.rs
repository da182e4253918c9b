/*!
 * Read-only validation of caption files.
 *
 * This module checks caption sequences against the layout and timing
 * guidelines and reports every violation without changing anything:
 * - Layout validation (line length, line count, balance, spacing)
 * - Timing validation (duration, reading speed, gaps, overlaps)
 *
 * # Architecture
 *
 * - `layout`: Validates the text of a single caption
 * - `timing`: Validates durations and the spacing between captions
 * - `service`: Orchestrates all validators into a per-file report
 */

pub mod layout;
pub mod service;
pub mod timing;

// Re-export main types
pub use service::{FileReport, Severity, ValidationService, ValidatorConfig, Violation};
