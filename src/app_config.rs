use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading and
/// validating the constant tables the conform pipeline is tuned with.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Constant tables injected into the conform pipeline
    #[serde(default)]
    pub conform: ConformConfig,

    /// Whether to copy the original file to `<file>.bak` before rewriting it
    #[serde(default = "default_true")]
    pub create_backup: bool,

    /// Optional JSON file mapping words to syllable counts
    #[serde(default)]
    pub syllable_dictionary: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Every threshold and weight used by the scorer, the metrics and the phases
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ConformConfig {
    /// Hard and soft layout/timing limits
    #[serde(default)]
    pub limits: LayoutLimits,

    /// Split-point scoring weights
    #[serde(default)]
    pub scoring: ScoringWeights,

    /// Duration distribution weights
    #[serde(default)]
    pub timing: TimingWeights,

    /// Word tables used for linguistic preferences
    #[serde(default)]
    pub words: WordLists,
}

/// Layout and timing limits a finished caption must respect
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LayoutLimits {
    /// Maximum characters on one line
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,

    /// Caption character count above which the caption is split
    #[serde(default = "default_max_block_chars")]
    pub max_block_chars: usize,

    /// Caption duration above which the caption is split
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    /// Duration below which the extender tries to lengthen a caption
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Minimum time between the end of a caption and the start of the next
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,

    /// Soft minimum words per line
    #[serde(default = "default_min_words_per_line")]
    pub min_words_per_line: usize,

    /// Soft minimum characters per line
    #[serde(default = "default_min_chars_per_line")]
    pub min_chars_per_line: usize,

    /// Minimum shorter:longer character ratio between the two sides of a split
    #[serde(default = "default_min_char_ratio")]
    pub min_char_ratio: f64,
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            max_line_chars: default_max_line_chars(),
            max_block_chars: default_max_block_chars(),
            max_duration_ms: default_max_duration_ms(),
            min_duration_ms: default_min_duration_ms(),
            min_gap_ms: default_min_gap_ms(),
            min_words_per_line: default_min_words_per_line(),
            min_chars_per_line: default_min_chars_per_line(),
            min_char_ratio: default_min_char_ratio(),
        }
    }
}

/// Weights of the split-point score. Bonuses are stored as positive magnitudes
/// and subtracted; penalties are added. Lower scores win.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoringWeights {
    /// Bonus for splitting after `.`, `?`, `!` or an ellipsis
    #[serde(default = "default_sentence_end_bonus")]
    pub sentence_end_bonus: f64,

    /// Bonus for splitting after `,`, `;`, `:` or an em-dash
    #[serde(default = "default_clause_punctuation_bonus")]
    pub clause_punctuation_bonus: f64,

    /// Bonus when the second side starts with an adversative conjunction
    #[serde(default = "default_adversative_bonus")]
    pub adversative_bonus: f64,

    /// Bonus when the second side starts with a coordinating conjunction
    #[serde(default = "default_coordinating_bonus")]
    pub coordinating_bonus: f64,

    /// Bonus when the second side starts with a relative pronoun
    #[serde(default = "default_relative_bonus")]
    pub relative_bonus: f64,

    /// Penalty when shorter:longer falls below `min_char_ratio`
    #[serde(default = "default_imbalance_penalty")]
    pub imbalance_penalty: f64,

    /// Penalty when either side is under `min_chars_per_line`
    #[serde(default = "default_short_line_penalty")]
    pub short_line_penalty: f64,

    /// Penalty when either side is under `min_words_per_line` and not an interjection
    #[serde(default = "default_orphan_penalty")]
    pub orphan_penalty: f64,

    /// Penalty when a side would not fit the width limit passed to the scorer
    #[serde(default = "default_overflow_penalty")]
    pub overflow_penalty: f64,

    /// Multiplier on the distance term when splitting captions into sentences
    #[serde(default = "default_sentence_distance_weight")]
    pub sentence_distance_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sentence_end_bonus: default_sentence_end_bonus(),
            clause_punctuation_bonus: default_clause_punctuation_bonus(),
            adversative_bonus: default_adversative_bonus(),
            coordinating_bonus: default_coordinating_bonus(),
            relative_bonus: default_relative_bonus(),
            imbalance_penalty: default_imbalance_penalty(),
            short_line_penalty: default_short_line_penalty(),
            orphan_penalty: default_orphan_penalty(),
            overflow_penalty: default_overflow_penalty(),
            sentence_distance_weight: default_sentence_distance_weight(),
        }
    }
}

/// Weights used to distribute a caption's duration over its fragments
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimingWeights {
    /// Share of the hybrid weight driven by syllables
    #[serde(default = "default_syllable_weight")]
    pub syllable_weight: f64,

    /// Share of the hybrid weight driven by characters
    #[serde(default = "default_char_weight")]
    pub char_weight: f64,

    /// Milliseconds of pause per punctuation mark (ellipsis handled separately)
    #[serde(default = "default_punctuation_pauses")]
    pub punctuation_pauses: Vec<PunctuationPause>,

    /// Milliseconds of pause per ellipsis
    #[serde(default = "default_ellipsis_pause_ms")]
    pub ellipsis_pause_ms: u64,

    /// Milliseconds of pause per hesitation marker
    #[serde(default = "default_hesitation_pause_ms")]
    pub hesitation_pause_ms: u64,

    /// Pause time is capped to this fraction of a fragment's duration share
    #[serde(default = "default_pause_cap_ratio")]
    pub pause_cap_ratio: f64,
}

impl Default for TimingWeights {
    fn default() -> Self {
        Self {
            syllable_weight: default_syllable_weight(),
            char_weight: default_char_weight(),
            punctuation_pauses: default_punctuation_pauses(),
            ellipsis_pause_ms: default_ellipsis_pause_ms(),
            hesitation_pause_ms: default_hesitation_pause_ms(),
            pause_cap_ratio: default_pause_cap_ratio(),
        }
    }
}

/// One entry of the punctuation pause table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PunctuationPause {
    /// The punctuation character
    pub mark: char,
    /// Pause in milliseconds
    pub pause_ms: u64,
}

/// Word tables; all entries are lowercase
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WordLists {
    #[serde(default = "default_adversatives")]
    pub adversatives: Vec<String>,

    #[serde(default = "default_coordinators")]
    pub coordinators: Vec<String>,

    #[serde(default = "default_relatives")]
    pub relatives: Vec<String>,

    #[serde(default = "default_hesitations")]
    pub hesitations: Vec<String>,

    /// Words allowed to stand alone on a line
    #[serde(default = "default_interjections")]
    pub interjections: Vec<String>,
}

impl Default for WordLists {
    fn default() -> Self {
        Self {
            adversatives: default_adversatives(),
            coordinators: default_coordinators(),
            relatives: default_relatives(),
            hesitations: default_hesitations(),
            interjections: default_interjections(),
        }
    }
}

impl WordLists {
    /// True when the text, stripped of surrounding punctuation, is a single whitelisted word
    pub fn is_standalone_interjection(&self, text: &str) -> bool {
        let mut words = text.split_whitespace();
        let (Some(word), None) = (words.next(), words.next()) else {
            return false;
        };
        let word = word
            .trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | '…' | '"' | '\''))
            .to_lowercase();
        self.interjections.iter().any(|w| *w == word)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_line_chars() -> usize {
    42
}

fn default_max_block_chars() -> usize {
    84
}

fn default_max_duration_ms() -> u64 {
    8000
}

fn default_min_duration_ms() -> u64 {
    833 // 5/6 of a second
}

fn default_min_gap_ms() -> u64 {
    50
}

fn default_min_words_per_line() -> usize {
    2
}

fn default_min_chars_per_line() -> usize {
    15
}

fn default_min_char_ratio() -> f64 {
    0.30
}

fn default_sentence_end_bonus() -> f64 {
    200.0
}

fn default_clause_punctuation_bonus() -> f64 {
    100.0
}

fn default_adversative_bonus() -> f64 {
    80.0
}

fn default_coordinating_bonus() -> f64 {
    50.0
}

fn default_relative_bonus() -> f64 {
    30.0
}

fn default_imbalance_penalty() -> f64 {
    400.0
}

fn default_short_line_penalty() -> f64 {
    300.0
}

fn default_orphan_penalty() -> f64 {
    500.0
}

fn default_overflow_penalty() -> f64 {
    1000.0
}

fn default_sentence_distance_weight() -> f64 {
    0.5
}

fn default_syllable_weight() -> f64 {
    0.7
}

fn default_char_weight() -> f64 {
    0.3
}

fn default_punctuation_pauses() -> Vec<PunctuationPause> {
    [
        (',', 250),
        (';', 350),
        (':', 300),
        ('.', 600),
        ('?', 600),
        ('!', 600),
        ('—', 400),
    ]
    .into_iter()
    .map(|(mark, pause_ms)| PunctuationPause { mark, pause_ms })
    .collect()
}

fn default_ellipsis_pause_ms() -> u64 {
    800
}

fn default_hesitation_pause_ms() -> u64 {
    200
}

fn default_pause_cap_ratio() -> f64 {
    0.20
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_adversatives() -> Vec<String> {
    words(&["but", "however", "although", "though", "yet", "still"])
}

fn default_coordinators() -> Vec<String> {
    words(&["and", "or", "so", "because", "since", "while", "as"])
}

fn default_relatives() -> Vec<String> {
    words(&["which", "that", "where", "when", "who", "whom", "whose", "if"])
}

fn default_hesitations() -> Vec<String> {
    words(&["uh", "um", "er", "ah", "eh", "mm", "hmm"])
}

fn default_interjections() -> Vec<String> {
    words(&[
        "yeah", "yes", "no", "okay", "ok", "right", "sure", "exactly", "totally",
        "absolutely", "definitely", "wow", "nice", "great", "mm-hmm", "uh-huh", "nope",
        "yep", "huh", "oh", "well",
    ])
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.conform.validate()
    }
}

impl ConformConfig {
    /// Reject tables the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.max_line_chars < 2 {
            return Err(ConfigError::Invalid(format!(
                "max_line_chars must be at least 2, got {}",
                limits.max_line_chars
            )));
        }
        if limits.max_block_chars < limits.max_line_chars {
            return Err(ConfigError::Invalid(format!(
                "max_block_chars ({}) must not be below max_line_chars ({})",
                limits.max_block_chars, limits.max_line_chars
            )));
        }
        if limits.max_duration_ms == 0 {
            return Err(ConfigError::Invalid("max_duration_ms must be positive".to_string()));
        }
        if !(limits.min_char_ratio > 0.0 && limits.min_char_ratio <= 0.5) {
            return Err(ConfigError::Invalid(format!(
                "min_char_ratio must be in (0, 0.5], got {}",
                limits.min_char_ratio
            )));
        }

        let timing = &self.timing;
        if timing.syllable_weight < 0.0
            || timing.char_weight < 0.0
            || (timing.syllable_weight + timing.char_weight - 1.0).abs() > 1e-6
        {
            return Err(ConfigError::Invalid(format!(
                "syllable_weight + char_weight must equal 1.0, got {} + {}",
                timing.syllable_weight, timing.char_weight
            )));
        }
        if !(0.0..1.0).contains(&timing.pause_cap_ratio) {
            return Err(ConfigError::Invalid(format!(
                "pause_cap_ratio must be in [0, 1), got {}",
                timing.pause_cap_ratio
            )));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            conform: ConformConfig::default(),
            create_backup: default_true(),
            syllable_dictionary: None,
            log_level: LogLevel::default(),
        }
    }
}
