/*!
 * Timing validation for caption sequences.
 *
 * This module validates that captions are:
 * - Within duration limits
 * - Within reading speed limits
 * - Separated from their successor by the minimum gap
 * - Non-overlapping
 */

use log::debug;

use crate::conform::text::ELLIPSIS;
use crate::subtitle_processor::CaptionBlock;

/// Minimum duration for a caption in milliseconds (5/6 of a second)
const DEFAULT_MIN_DURATION_MS: u64 = 833;

/// Maximum comfortable duration for a caption in milliseconds
const DEFAULT_MAX_DURATION_MS: u64 = 7000;

/// Adult reading speed limit
pub const ADULT_MAX_CPS: f64 = 17.0;

/// Children's reading speed limit
pub const CHILDREN_MAX_CPS: f64 = 15.0;

/// Minimum gap between consecutive captions in milliseconds
const DEFAULT_MIN_GAP_MS: u64 = 50;

/// Types of timing issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimingIssue {
    /// Duration below the minimum
    DurationTooShort { duration_ms: u64, min_duration_ms: u64 },
    /// Duration above the maximum
    DurationTooLong { duration_ms: u64, max_duration_ms: u64 },
    /// Reading speed exceeds limit
    ReadingSpeedTooHigh { cps: f64, max_cps: f64 },
    /// Next caption starts before the minimum gap has passed
    GapTooSmall { next_index: usize, gap_ms: u64, min_gap_ms: u64 },
    /// Next caption starts before this one ends
    Overlap { next_index: usize, overlap_ms: u64 },
}

impl TimingIssue {
    /// Rule identifier used in reports
    pub fn rule(&self) -> &'static str {
        match self {
            TimingIssue::DurationTooShort { .. } => "duration-short",
            TimingIssue::DurationTooLong { .. } => "duration-long",
            TimingIssue::ReadingSpeedTooHigh { .. } => "reading-speed",
            TimingIssue::GapTooSmall { .. } => "gap",
            TimingIssue::Overlap { .. } => "overlap",
        }
    }

    /// Whether the issue breaks the sequence rather than just its readability
    pub fn is_error(&self) -> bool {
        matches!(self, TimingIssue::GapTooSmall { .. } | TimingIssue::Overlap { .. })
    }
}

impl std::fmt::Display for TimingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingIssue::DurationTooShort { duration_ms, min_duration_ms } => {
                write!(f, "Duration too short: {}ms (min: {}ms)", duration_ms, min_duration_ms)
            }
            TimingIssue::DurationTooLong { duration_ms, max_duration_ms } => {
                write!(f, "Duration too long: {}ms (max: {}ms)", duration_ms, max_duration_ms)
            }
            TimingIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "Reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
            TimingIssue::GapTooSmall {
                next_index,
                gap_ms,
                min_gap_ms,
            } => {
                write!(
                    f,
                    "Gap of {}ms before caption {} (min: {}ms)",
                    gap_ms, next_index, min_gap_ms
                )
            }
            TimingIssue::Overlap { next_index, overlap_ms } => {
                write!(f, "Overlaps caption {} by {}ms", next_index, overlap_ms)
            }
        }
    }
}

/// Configuration for timing validation
#[derive(Debug, Clone)]
pub struct TimingValidatorConfig {
    /// Maximum characters per second
    pub max_cps: f64,
    /// Minimum caption duration in ms
    pub min_duration_ms: u64,
    /// Maximum caption duration in ms
    pub max_duration_ms: u64,
    /// Minimum gap to the next caption in ms
    pub min_gap_ms: u64,
}

impl Default for TimingValidatorConfig {
    fn default() -> Self {
        Self {
            max_cps: ADULT_MAX_CPS,
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            min_gap_ms: DEFAULT_MIN_GAP_MS,
        }
    }
}

/// Timing validator for caption sequences
pub struct TimingValidator {
    config: TimingValidatorConfig,
}

impl TimingValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: TimingValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimingValidatorConfig) -> Self {
        Self { config }
    }

    /// Characters per second, line breaks excluded
    pub fn reading_speed(block: &CaptionBlock) -> f64 {
        let secs = block.duration_ms() as f64 / 1000.0;
        if secs > 0.0 {
            block.char_count() as f64 / secs
        } else {
            f64::INFINITY
        }
    }

    /// Validate one caption's own timing
    pub fn validate_block(&self, block: &CaptionBlock) -> Vec<TimingIssue> {
        let mut issues = Vec::new();
        let duration_ms = block.duration_ms();

        if duration_ms < self.config.min_duration_ms {
            issues.push(TimingIssue::DurationTooShort {
                duration_ms,
                min_duration_ms: self.config.min_duration_ms,
            });
        }

        if duration_ms > self.config.max_duration_ms {
            issues.push(TimingIssue::DurationTooLong {
                duration_ms,
                max_duration_ms: self.config.max_duration_ms,
            });
        }

        let cps = Self::reading_speed(block);
        if cps > self.config.max_cps {
            issues.push(TimingIssue::ReadingSpeedTooHigh {
                cps,
                max_cps: self.config.max_cps,
            });
        }

        issues
    }

    /// Validate the spacing between a caption and its successor
    pub fn validate_pair(&self, current: &CaptionBlock, next: &CaptionBlock) -> Option<TimingIssue> {
        if current.end_ms > next.start_ms {
            return Some(TimingIssue::Overlap {
                next_index: next.index,
                overlap_ms: current.end_ms - next.start_ms,
            });
        }

        let gap_ms = next.start_ms - current.end_ms;
        if gap_ms >= self.config.min_gap_ms || Self::is_continuation(current, next) {
            return None;
        }

        Some(TimingIssue::GapTooSmall {
            next_index: next.index,
            gap_ms,
            min_gap_ms: self.config.min_gap_ms,
        })
    }

    /// Fragments of one split caption abut exactly and are joined by continuation markers
    pub fn is_continuation(current: &CaptionBlock, next: &CaptionBlock) -> bool {
        if current.source_index == next.source_index && current.end_ms == next.start_ms {
            return true;
        }

        current.end_ms == next.start_ms
            && current.lines.last().is_some_and(|l| l.ends_with(ELLIPSIS))
            && next.lines.first().is_some_and(|l| l.starts_with(ELLIPSIS))
    }

    /// Validate every caption and every adjacent pair; issues are keyed by position
    pub fn validate_sequence(&self, blocks: &[CaptionBlock]) -> Vec<(usize, TimingIssue)> {
        let mut issues: Vec<(usize, TimingIssue)> = Vec::new();

        for (i, block) in blocks.iter().enumerate() {
            issues.extend(self.validate_block(block).into_iter().map(|issue| (i, issue)));
            if let Some(next) = blocks.get(i + 1) {
                if let Some(issue) = self.validate_pair(block, next) {
                    issues.push((i, issue));
                }
            }
        }

        debug!("Timing validation: {} captions, {} issues", blocks.len(), issues.len());
        issues
    }
}

impl Default for TimingValidator {
    fn default() -> Self {
        Self::new()
    }
}
