/*!
 * Text metrics used to distribute spoken duration across caption fragments.
 *
 * - Syllable estimation through a pluggable [`SyllableCounter`]
 * - Hybrid syllable/character weight of a fragment within its caption
 * - Pause weighting for punctuation and hesitation markers
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{ConformConfig, TimingWeights};
use crate::errors::ConfigError;

use super::text::{ELLIPSIS, ELLIPSIS_CHAR};

static VOWEL_GROUPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").unwrap());

/// Estimates the number of syllables in a single word
pub trait SyllableCounter: Send + Sync {
    /// Syllables in `word`; at least 1 for any word containing a non-space character
    fn count(&self, word: &str) -> usize;
}

/// Vowel-group estimator, used when no dictionary is available
#[derive(Debug, Clone, Copy, Default)]
pub struct VowelGroupCounter;

impl SyllableCounter for VowelGroupCounter {
    fn count(&self, word: &str) -> usize {
        if word.trim().is_empty() {
            return 0;
        }

        let letters: String = word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        // Numbers, symbols and non-Latin words still take time to say
        if letters.is_empty() {
            return 1;
        }

        let mut count = VOWEL_GROUPS.find_iter(&letters).count();
        if count > 1 && letters.ends_with('e') && !ends_with_consonant_le(&letters) {
            count -= 1;
        }
        count.max(1)
    }
}

// "table", "simple": the final "le" is voiced
fn ends_with_consonant_le(letters: &str) -> bool {
    let bytes = letters.as_bytes();
    bytes.len() > 2
        && letters.ends_with("le")
        && !b"aeiouy".contains(&bytes[bytes.len() - 3])
}

/// Word list lookup with a vowel-group fallback for unknown words
#[derive(Debug, Clone, Default)]
pub struct DictionaryCounter {
    entries: HashMap<String, usize>,
    fallback: VowelGroupCounter,
}

impl DictionaryCounter {
    /// Create a counter from word → syllable entries
    pub fn new(entries: HashMap<String, usize>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(word, count)| (word.to_lowercase(), count))
            .collect();
        Self {
            entries,
            fallback: VowelGroupCounter,
        }
    }

    /// Load entries from a JSON object such as `{"fire": 1, "every": 3}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: HashMap<String, usize> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        debug!("Loaded {} syllable dictionary entries from {}", entries.len(), path.display());
        Ok(Self::new(entries))
    }

    /// Number of known words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SyllableCounter for DictionaryCounter {
    fn count(&self, word: &str) -> usize {
        let key: String = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        match self.entries.get(&key) {
            Some(count) => *count,
            None => self.fallback.count(word),
        }
    }
}

/// Duration-weighting metrics for caption text
#[derive(Clone)]
pub struct TextMetrics {
    timing: TimingWeights,
    hesitation_regex: Option<Regex>,
    counter: Arc<dyn SyllableCounter>,
}

impl std::fmt::Debug for TextMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMetrics")
            .field("timing", &self.timing)
            .field("hesitation_regex", &self.hesitation_regex)
            .finish_non_exhaustive()
    }
}

impl TextMetrics {
    /// Metrics backed by the vowel-group estimator
    pub fn new(config: &ConformConfig) -> Self {
        Self::with_counter(config, Arc::new(VowelGroupCounter))
    }

    /// Metrics backed by a custom syllable source
    pub fn with_counter(config: &ConformConfig, counter: Arc<dyn SyllableCounter>) -> Self {
        let hesitation_regex = if config.words.hesitations.is_empty() {
            None
        } else {
            let alternatives: Vec<String> =
                config.words.hesitations.iter().map(|w| regex::escape(w)).collect();
            Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
        };

        Self {
            timing: config.timing.clone(),
            hesitation_regex,
            counter,
        }
    }

    /// Syllables in one word, at least 1 for a non-empty word
    pub fn syllable_count(&self, word: &str) -> usize {
        if word.trim().is_empty() {
            return 0;
        }
        self.counter.count(word).max(1)
    }

    /// Syllables across all words of a text
    pub fn text_syllables(&self, text: &str) -> usize {
        text.split_whitespace().map(|w| self.syllable_count(w)).sum()
    }

    /// Blend of the syllable share and the character share of `segment` within `whole`
    pub fn hybrid_weight(&self, segment: &str, whole: &str) -> f64 {
        let total_syllables = self.text_syllables(whole).max(1) as f64;
        let total_chars = whole.chars().count().max(1) as f64;

        let syllable_share = self.text_syllables(segment) as f64 / total_syllables;
        let char_share = segment.chars().count() as f64 / total_chars;

        self.timing.syllable_weight * syllable_share + self.timing.char_weight * char_share
    }

    /// Whole-word hesitation markers ("uh", "um", ...) in the text
    pub fn hesitation_count(&self, text: &str) -> usize {
        self.hesitation_regex
            .as_ref()
            .map_or(0, |re| re.find_iter(text).count())
    }

    /// Uncapped pause time implied by punctuation and hesitations, in milliseconds
    pub fn pause_weight(&self, segment: &str) -> u64 {
        let ellipses = segment.matches(ELLIPSIS).count() + segment.matches(ELLIPSIS_CHAR).count();
        let rest = segment.replace(ELLIPSIS, "").replace(ELLIPSIS_CHAR, "");

        let punctuation: u64 = self
            .timing
            .punctuation_pauses
            .iter()
            .map(|p| rest.matches(p.mark).count() as u64 * p.pause_ms)
            .sum();

        ellipses as u64 * self.timing.ellipsis_pause_ms
            + punctuation
            + self.hesitation_count(segment) as u64 * self.timing.hesitation_pause_ms
    }

    /// Pause time limited to the configured fraction of the segment's duration share
    pub fn capped_pause_weight(&self, segment: &str, share_ms: f64) -> f64 {
        let cap = (share_ms * self.timing.pause_cap_ratio).max(0.0);
        (self.pause_weight(segment) as f64).min(cap)
    }
}
