/*!
 * Split-point scoring shared by the block splitter and the line balancer.
 *
 * Every word boundary of a text is a candidate. Each candidate is scored by
 * its distance from a target character ratio, adjusted by linguistic bonuses
 * (punctuation, conjunctions, relative pronouns) and layout penalties
 * (imbalance, short sides, orphaned words, overflow). The lowest score wins;
 * ties go to the candidate closest to the target.
 */

use std::cmp::Ordering;

use crate::app_config::ConformConfig;

use super::text::{bare_word, ends_clause, ends_sentence, join, joined_len};

/// What the split is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Dividing a caption into separately timed captions
    Sentence,
    /// Wrapping a caption into two lines
    Line,
}

/// A scored word boundary
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate {
    /// Number of words on the first side
    pub word_index: usize,
    /// Character offset of the first character of the second side in the space-joined text
    pub offset: usize,
    /// Lower is better
    pub score: f64,
    /// Absolute distance in characters from the target position
    pub distance: f64,
}

/// Parameters of a single split decision
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRequest {
    /// Target share of characters on the first side
    pub target_ratio: f64,
    /// Scoring flavour
    pub mode: SplitMode,
    /// Sides longer than this are penalised as overflow
    pub max_side_chars: Option<usize>,
    /// Fewest words allowed on the first side
    pub min_first_words: usize,
    /// Fewest words allowed on the second side
    pub min_second_words: usize,
}

impl SplitRequest {
    /// Request for dividing a caption into timed segments
    pub fn sentence(target_ratio: f64) -> Self {
        Self {
            target_ratio,
            mode: SplitMode::Sentence,
            max_side_chars: None,
            min_first_words: 1,
            min_second_words: 1,
        }
    }

    /// Request for wrapping a caption into lines of at most `max_line_chars`
    pub fn line(target_ratio: f64, max_line_chars: usize) -> Self {
        Self {
            target_ratio,
            mode: SplitMode::Line,
            max_side_chars: Some(max_line_chars),
            min_first_words: 1,
            min_second_words: 1,
        }
    }

    /// Reserve words on each side, used when one side is split again later
    pub fn with_min_words(mut self, first: usize, second: usize) -> Self {
        self.min_first_words = first.max(1);
        self.min_second_words = second.max(1);
        self
    }
}

/// Scores candidate split points against the configured weights
#[derive(Debug, Clone, Copy)]
pub struct SplitScorer<'a> {
    config: &'a ConformConfig,
}

impl<'a> SplitScorer<'a> {
    pub fn new(config: &'a ConformConfig) -> Self {
        Self { config }
    }

    /// Score every admissible boundary between `words`
    pub fn candidates<S: AsRef<str>>(&self, words: &[S], request: &SplitRequest) -> Vec<SplitCandidate> {
        if words.len() < 2 {
            return Vec::new();
        }

        let first_index = request.min_first_words.max(1);
        let last_index = words.len().saturating_sub(request.min_second_words.max(1));

        (first_index..=last_index)
            .filter(|&i| i >= 1 && i < words.len())
            .map(|i| self.score_at(words, i, request))
            .collect()
    }

    /// Best boundary, or `None` when the words cannot be split as requested
    pub fn best_split<S: AsRef<str>>(&self, words: &[S], request: &SplitRequest) -> Option<SplitCandidate> {
        self.candidates(words, request).into_iter().min_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then(a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal))
                .then(a.word_index.cmp(&b.word_index))
        })
    }

    fn score_at<S: AsRef<str>>(&self, words: &[S], i: usize, request: &SplitRequest) -> SplitCandidate {
        let weights = &self.config.scoring;
        let limits = &self.config.limits;
        let lists = &self.config.words;

        let (first, second) = words.split_at(i);
        let first_chars = joined_len(first);
        let second_chars = joined_len(second);
        let total_chars = first_chars + 1 + second_chars;

        let target = total_chars as f64 * request.target_ratio;
        let distance = (first_chars as f64 - target).abs();
        let mut score = match request.mode {
            SplitMode::Sentence => distance * weights.sentence_distance_weight,
            SplitMode::Line => distance,
        };

        let previous = first[first.len() - 1].as_ref();
        if ends_sentence(previous) {
            score -= weights.sentence_end_bonus;
        } else if ends_clause(previous) {
            score -= weights.clause_punctuation_bonus;
        }

        let next = bare_word(second[0].as_ref());
        if lists.adversatives.contains(&next) {
            score -= weights.adversative_bonus;
        } else if lists.coordinators.contains(&next) {
            score -= weights.coordinating_bonus;
        } else if lists.relatives.contains(&next) {
            score -= weights.relative_bonus;
        }

        let shorter = first_chars.min(second_chars) as f64;
        let longer = first_chars.max(second_chars).max(1) as f64;
        if shorter / longer < limits.min_char_ratio {
            score += weights.imbalance_penalty;
        }

        if first_chars < limits.min_chars_per_line || second_chars < limits.min_chars_per_line {
            score += weights.short_line_penalty;
        }

        let orphaned = |side: &[S]| {
            side.len() < limits.min_words_per_line && !lists.is_standalone_interjection(&join(side))
        };
        if orphaned(first) || orphaned(second) {
            score += weights.orphan_penalty;
        }

        if let Some(max) = request.max_side_chars {
            if first_chars > max || second_chars > max {
                score += weights.overflow_penalty;
            }
        }

        SplitCandidate {
            word_index: i,
            offset: first_chars + 1,
            score,
            distance,
        }
    }
}
