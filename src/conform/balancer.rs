/*!
 * Two-line wrapping with a bottom-heavy balance.
 *
 * A caption that is not already compliant is re-wrapped from its joined
 * text: the scorer picks the wrap point against a target ratio that shifts
 * weight to the bottom line as the caption grows, and an over-long top line
 * is split again until it fits.
 */

use log::{debug, warn};

use crate::app_config::ConformConfig;
use crate::subtitle_processor::CaptionBlock;

use super::scorer::{SplitRequest, SplitScorer};
use super::text::{greedy_prefix, join, joined_len, tokenize};

/// Wraps caption text into at most two lines
pub struct LineBalancer<'a> {
    config: &'a ConformConfig,
    scorer: SplitScorer<'a>,
}

impl<'a> LineBalancer<'a> {
    pub fn new(config: &'a ConformConfig) -> Self {
        Self {
            config,
            scorer: SplitScorer::new(config),
        }
    }

    /// Share of characters wanted on the top line for a caption of `total_chars`
    pub fn target_ratio(total_chars: usize) -> f64 {
        match total_chars {
            0..25 => 0.50,
            25..35 => 0.45,
            35..=50 => 0.42,
            _ => 0.40,
        }
    }

    /// Whether the caption's current layout can be kept as is
    pub fn is_compliant(&self, block: &CaptionBlock) -> bool {
        let limits = &self.config.limits;
        let words = &self.config.words;

        if block.lines.is_empty() || block.lines.len() > 2 {
            return false;
        }
        let tidy = block.lines.iter().all(|line| {
            line.chars().count() <= limits.max_line_chars
                && line.split_whitespace().collect::<Vec<_>>().join(" ") == *line
        });
        if !tidy {
            return false;
        }
        if block.lines.len() == 1 {
            return true;
        }

        let line_ok = |line: &String| {
            words.is_standalone_interjection(line)
                || (line.split_whitespace().count() >= limits.min_words_per_line
                    && line.chars().count() >= limits.min_chars_per_line)
        };
        let lengths = block.line_lengths();
        let shorter = lengths[0].min(lengths[1]) as f64;
        let longer = lengths[0].max(lengths[1]).max(1) as f64;

        block.lines.iter().all(line_ok) && shorter / longer >= limits.min_char_ratio
    }

    /// Balance one caption; compliant captions come back unchanged
    pub fn balance(&self, block: &CaptionBlock) -> CaptionBlock {
        if self.is_compliant(block) {
            return block.clone();
        }

        let lines = self.wrap_text(&block.joined_text());
        debug!("Rewrapped block {}: {:?} -> {:?}", block.index, block.lines, lines);
        CaptionBlock {
            lines,
            ..block.clone()
        }
    }

    /// Wrap text into one or two lines of at most the line limit
    pub fn wrap_text(&self, text: &str) -> Vec<String> {
        let max = self.config.limits.max_line_chars;
        let tokens = tokenize(text, max);
        if tokens.is_empty() {
            return Vec::new();
        }
        if joined_len(&tokens) <= max {
            return vec![join(&tokens)];
        }

        let mut at = self.top_line_end(&tokens);
        // Move words up while the bottom overflows and the top has room
        while at < tokens.len()
            && joined_len(&tokens[at..]) > max
            && joined_len(&tokens[..=at]) <= max
        {
            at += 1;
        }

        let top = join(&tokens[..at]);
        let rest = &tokens[at..];
        if rest.is_empty() {
            return vec![top];
        }
        if joined_len(rest) <= max {
            return vec![top, join(rest)];
        }

        let keep = greedy_prefix(rest, max);
        warn!(
            "Text does not fit two lines of {} characters, dropping: {}",
            max,
            join(&rest[keep..])
        );
        vec![top, join(&rest[..keep])]
    }

    /// Words on the top line; an over-long top side is split again until it fits
    fn top_line_end(&self, words: &[String]) -> usize {
        let max = self.config.limits.max_line_chars;
        let total = joined_len(words);
        if words.len() < 2 || total <= max {
            return words.len();
        }

        let request = SplitRequest::line(Self::target_ratio(total), max);
        let at = self
            .scorer
            .best_split(words, &request)
            .map(|c| c.word_index)
            .unwrap_or_else(|| greedy_prefix(words, max).max(1));

        if joined_len(&words[..at]) <= max {
            at
        } else {
            self.top_line_end(&words[..at])
        }
    }
}
