/*!
 * Layout validation for caption text.
 *
 * Checks a single caption's text against:
 * - Characters per line
 * - Lines per caption
 * - Balance between the two lines
 * - Repeated spaces
 */

use crate::subtitle_processor::CaptionBlock;

/// Default maximum characters per line
const DEFAULT_MAX_LINE_CHARS: usize = 42;

/// Default maximum lines per caption
const DEFAULT_MAX_LINES: usize = 2;

/// Shorter line should be at least this share of the longer one
const DEFAULT_MIN_BALANCE_RATIO: f64 = 0.25;

/// Types of layout issues
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutIssue {
    /// A line is longer than allowed
    LineTooLong {
        line: usize,
        chars: usize,
        max_chars: usize,
        single_word: bool,
    },
    /// Too many lines in one caption
    TooManyLines { lines: usize, max_lines: usize },
    /// Two lines of very different length
    Unbalanced {
        top_chars: usize,
        bottom_chars: usize,
        ratio: f64,
        min_ratio: f64,
    },
    /// Two or more consecutive spaces
    DoubleSpace,
}

impl LayoutIssue {
    /// Rule identifier used in reports
    pub fn rule(&self) -> &'static str {
        match self {
            LayoutIssue::LineTooLong { .. } => "line-length",
            LayoutIssue::TooManyLines { .. } => "line-count",
            LayoutIssue::Unbalanced { .. } => "line-balance",
            LayoutIssue::DoubleSpace => "double-space",
        }
    }

    /// Whether the issue makes the caption unusable
    pub fn is_error(&self) -> bool {
        matches!(self, LayoutIssue::LineTooLong { .. } | LayoutIssue::TooManyLines { .. })
    }

    /// Whether running the fixer repairs this issue
    pub fn auto_fixable(&self) -> bool {
        match self {
            LayoutIssue::LineTooLong { single_word, .. } => !single_word,
            _ => true,
        }
    }
}

impl std::fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutIssue::LineTooLong { line, chars, max_chars, .. } => {
                write!(f, "Line {} has {} chars (max {})", line, chars, max_chars)
            }
            LayoutIssue::TooManyLines { lines, max_lines } => {
                write!(f, "Caption has {} lines (max {})", lines, max_lines)
            }
            LayoutIssue::Unbalanced {
                top_chars,
                bottom_chars,
                ratio,
                min_ratio,
            } => {
                write!(
                    f,
                    "Unbalanced lines: {} vs {} chars (ratio {:.2} < {:.2})",
                    top_chars, bottom_chars, ratio, min_ratio
                )
            }
            LayoutIssue::DoubleSpace => write!(f, "Contains double spaces"),
        }
    }
}

/// Configuration for layout validation
#[derive(Debug, Clone)]
pub struct LayoutValidatorConfig {
    pub max_line_chars: usize,
    pub max_lines: usize,
    pub min_balance_ratio: f64,
}

impl Default for LayoutValidatorConfig {
    fn default() -> Self {
        Self {
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
            max_lines: DEFAULT_MAX_LINES,
            min_balance_ratio: DEFAULT_MIN_BALANCE_RATIO,
        }
    }
}

/// Layout validator for caption text
pub struct LayoutValidator {
    config: LayoutValidatorConfig,
}

impl LayoutValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: LayoutValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: LayoutValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate one caption's text layout
    pub fn validate_block(&self, block: &CaptionBlock) -> Vec<LayoutIssue> {
        let mut issues = Vec::new();

        for (i, line) in block.lines.iter().enumerate() {
            let chars = line.chars().count();
            if chars > self.config.max_line_chars {
                issues.push(LayoutIssue::LineTooLong {
                    line: i + 1,
                    chars,
                    max_chars: self.config.max_line_chars,
                    single_word: line.split_whitespace().count() < 2,
                });
            }
        }

        if block.lines.len() > self.config.max_lines {
            issues.push(LayoutIssue::TooManyLines {
                lines: block.lines.len(),
                max_lines: self.config.max_lines,
            });
        }

        if let [top, bottom] = block.line_lengths()[..] {
            if top > 0 && bottom > 0 {
                let ratio = top.min(bottom) as f64 / top.max(bottom) as f64;
                if ratio < self.config.min_balance_ratio {
                    issues.push(LayoutIssue::Unbalanced {
                        top_chars: top,
                        bottom_chars: bottom,
                        ratio,
                        min_ratio: self.config.min_balance_ratio,
                    });
                }
            }
        }

        if block.lines.iter().any(|line| line.contains("  ")) {
            issues.push(LayoutIssue::DoubleSpace);
        }

        issues
    }
}

impl Default for LayoutValidator {
    fn default() -> Self {
        Self::new()
    }
}
