/*!
 * Validation service that orchestrates all validators.
 *
 * This module provides a unified interface for running every rule over a
 * caption sequence and collecting the violations into a per-file report.
 */

use std::path::Path;

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::{CaptionBlock, SubtitleFile};

use super::layout::{LayoutValidator, LayoutValidatorConfig};
use super::timing::{ADULT_MAX_CPS, CHILDREN_MAX_CPS, TimingValidator, TimingValidatorConfig};

/// Thresholds used by the validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Maximum characters per line
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,

    /// Maximum lines per caption
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Minimum caption duration in ms
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Maximum comfortable caption duration in ms
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    /// Maximum characters per second
    #[serde(default = "default_max_cps")]
    pub max_chars_per_second: f64,

    /// Minimum shorter:longer ratio of two-line captions
    #[serde(default = "default_min_balance_ratio")]
    pub min_balance_ratio: f64,

    /// Minimum gap between consecutive captions in ms
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,
}

fn default_max_line_chars() -> usize {
    42
}

fn default_max_lines() -> usize {
    2
}

fn default_min_duration_ms() -> u64 {
    833
}

fn default_max_duration_ms() -> u64 {
    7000
}

fn default_max_cps() -> f64 {
    ADULT_MAX_CPS
}

fn default_min_balance_ratio() -> f64 {
    0.25
}

fn default_min_gap_ms() -> u64 {
    50
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_line_chars: default_max_line_chars(),
            max_lines: default_max_lines(),
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            max_chars_per_second: default_max_cps(),
            min_balance_ratio: default_min_balance_ratio(),
            min_gap_ms: default_min_gap_ms(),
        }
    }
}

impl ValidatorConfig {
    /// Thresholds for children's programming: slower reading speed
    pub fn children() -> Self {
        Self {
            max_chars_per_second: CHILDREN_MAX_CPS,
            ..Self::default()
        }
    }
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Caption is readable but off the guidelines
    Warning,
    /// Caption breaks a hard limit
    Error,
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Rule identifier, e.g. `line-length`
    pub rule: String,
    /// Index of the caption as written in the file
    pub block_index: usize,
    pub severity: Severity,
    pub message: String,
    /// Whether the `fix` command repairs this violation
    pub auto_fixable: bool,
}

/// Validation report for one file
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    /// Path of the validated file, empty for in-memory sequences
    pub path: String,
    pub total_blocks: usize,
    pub violations: Vec<Violation>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == Severity::Warning).count()
    }

    pub fn auto_fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.auto_fixable).count()
    }

    /// Whether the file has no violations at all
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "{}: {} captions, {} errors, {} warnings ({} auto-fixable)",
            self.path,
            self.total_blocks,
            self.error_count(),
            self.warning_count(),
            self.auto_fixable_count()
        )
    }
}

/// Validation service for caption files
pub struct ValidationService {
    layout_validator: LayoutValidator,
    timing_validator: TimingValidator,
}

impl ValidationService {
    /// Create a new validation service with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create a new validation service with custom configuration
    pub fn with_config(config: ValidatorConfig) -> Self {
        let layout_config = LayoutValidatorConfig {
            max_line_chars: config.max_line_chars,
            max_lines: config.max_lines,
            min_balance_ratio: config.min_balance_ratio,
        };

        let timing_config = TimingValidatorConfig {
            max_cps: config.max_chars_per_second,
            min_duration_ms: config.min_duration_ms,
            max_duration_ms: config.max_duration_ms,
            min_gap_ms: config.min_gap_ms,
        };

        Self {
            layout_validator: LayoutValidator::with_config(layout_config),
            timing_validator: TimingValidator::with_config(timing_config),
        }
    }

    /// Validate a caption sequence; never modifies it
    pub fn validate(&self, blocks: &[CaptionBlock]) -> FileReport {
        let mut violations = Vec::new();

        for block in blocks {
            for issue in self.layout_validator.validate_block(block) {
                violations.push(Violation {
                    rule: issue.rule().to_string(),
                    block_index: block.index,
                    severity: if issue.is_error() { Severity::Error } else { Severity::Warning },
                    message: issue.to_string(),
                    auto_fixable: issue.auto_fixable(),
                });
            }
        }

        for (position, issue) in self.timing_validator.validate_sequence(blocks) {
            violations.push(Violation {
                rule: issue.rule().to_string(),
                block_index: blocks[position].index,
                severity: if issue.is_error() { Severity::Error } else { Severity::Warning },
                message: issue.to_string(),
                auto_fixable: false,
            });
        }

        violations.sort_by_key(|v| v.block_index);

        let report = FileReport {
            path: String::new(),
            total_blocks: blocks.len(),
            violations,
        };

        debug!(
            "Validation complete: {} captions, {} errors, {} warnings",
            report.total_blocks,
            report.error_count(),
            report.warning_count()
        );

        report
    }

    /// Read and validate an SRT file
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<FileReport> {
        let path = path.as_ref();
        let file = SubtitleFile::read(path)?;
        let mut report = self.validate(&file.blocks);
        report.path = path.display().to_string();
        Ok(report)
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
