/*!
 * Block splitting: turns an over-long or over-lengthy caption into several
 * consecutive captions.
 *
 * The text is bisected recursively at scored word boundaries, the original
 * duration is shared out by hybrid syllable/character weight plus capped
 * pause time, and continuation markers join the fragments. When a fragment
 * still breaks a limit the caption is re-cut into one more fragment, up to
 * one fragment per word.
 */

use std::ops::Range;

use log::{debug, warn};

use crate::app_config::ConformConfig;
use crate::subtitle_processor::CaptionBlock;

use super::metrics::TextMetrics;
use super::scorer::{SplitRequest, SplitScorer};
use super::text::{fits_lines, join, mark_continuation, tokenize};

/// Lines a caption may be wrapped into
const LINES_PER_CAPTION: usize = 2;

/// Splits captions that exceed the character or duration limit
pub struct BlockSplitter<'a> {
    config: &'a ConformConfig,
    scorer: SplitScorer<'a>,
    metrics: &'a TextMetrics,
}

impl<'a> BlockSplitter<'a> {
    pub fn new(config: &'a ConformConfig, metrics: &'a TextMetrics) -> Self {
        Self {
            config,
            scorer: SplitScorer::new(config),
            metrics,
        }
    }

    /// Whether the caption is over the character or the duration limit, or
    /// its words cannot be wrapped onto two lines at all
    pub fn needs_split(&self, block: &CaptionBlock) -> bool {
        let limits = &self.config.limits;
        if block.char_count() > limits.max_block_chars || block.duration_ms() > limits.max_duration_ms {
            return true;
        }
        let tokens = tokenize(&block.joined_text(), limits.max_line_chars);
        !fits_lines(&tokens, limits.max_line_chars, LINES_PER_CAPTION)
    }

    /// Fragments needed by the limits alone, at least 2
    pub fn required_segments(&self, block: &CaptionBlock) -> usize {
        let limits = &self.config.limits;
        let by_chars = block.char_count().div_ceil(limits.max_block_chars.max(1));
        let by_duration = block.duration_ms().div_ceil(limits.max_duration_ms.max(1)) as usize;
        by_chars.max(by_duration).max(2)
    }

    /// Split one caption; returns it unchanged when no split is needed or possible
    pub fn split_block(&self, block: &CaptionBlock) -> Vec<CaptionBlock> {
        if !self.needs_split(block) {
            return vec![block.clone()];
        }

        let whole = block.joined_text();
        let tokens = tokenize(&whole, self.config.limits.max_line_chars);
        let total_ms = block.duration_ms();
        // Every fragment needs a word and a millisecond of its own
        let max_segments = tokens.len().min(usize::try_from(total_ms).unwrap_or(usize::MAX));
        if max_segments < 2 {
            debug!(
                "Block {} over limits but cannot be divided ({} words, {}ms)",
                block.index,
                tokens.len(),
                total_ms
            );
            return vec![block.clone()];
        }

        let mut segments = self.required_segments(block).min(max_segments);
        loop {
            let ranges = self.partition(&tokens, segments);
            let texts: Vec<String> = ranges.iter().map(|r| join(&tokens[r.clone()])).collect();
            let durations = self.distribute_duration(&texts, &whole, total_ms);
            let marked = Self::add_continuation_markers(&texts);

            let offending = marked
                .iter()
                .zip(&durations)
                .filter(|(text, duration)| !self.segment_fits(text, **duration))
                .count();

            if offending == 0 || segments >= max_segments {
                if offending > 0 {
                    warn!(
                        "Block {}: {} of {} fragments still exceed limits at maximum split",
                        block.index, offending, segments
                    );
                }
                debug!(
                    "Split block {} ({} chars, {}ms) into {} fragments",
                    block.index,
                    block.char_count(),
                    total_ms,
                    segments
                );
                return self.build_fragments(block, marked, &durations);
            }

            segments += 1;
        }
    }

    /// Divide `words` into `segments` non-empty consecutive ranges by recursive bisection
    pub fn partition<S: AsRef<str>>(&self, words: &[S], segments: usize) -> Vec<Range<usize>> {
        let mut ranges = Vec::with_capacity(segments);
        self.bisect(words, 0, segments.clamp(1, words.len().max(1)), &mut ranges);
        ranges
    }

    fn bisect<S: AsRef<str>>(&self, words: &[S], offset: usize, segments: usize, out: &mut Vec<Range<usize>>) {
        if segments <= 1 || words.len() <= 1 {
            out.push(offset..offset + words.len());
            return;
        }

        let left = segments / 2;
        let right = segments - left;
        let request = SplitRequest::sentence(left as f64 / segments as f64).with_min_words(left, right);
        // Midpoint policy when no boundary can be scored
        let at = self
            .scorer
            .best_split(words, &request)
            .map(|c| c.word_index)
            .unwrap_or_else(|| (words.len() * left / segments).clamp(left, words.len() - right));

        self.bisect(&words[..at], offset, left, out);
        self.bisect(&words[at..], offset + at, right, out);
    }

    /// Share `total_ms` across segments; the sum is exactly `total_ms`
    ///
    /// Each segment gets its hybrid-weight share of the speech time (total
    /// minus pauses) plus its own capped pause time. All but the last segment
    /// are floored to whole milliseconds and the last absorbs the remainder.
    /// Requires `total_ms >= segments.len()`; every segment gets at least 1ms.
    pub fn distribute_duration(&self, segments: &[String], whole: &str, total_ms: u64) -> Vec<u64> {
        let count = segments.len();
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![total_ms];
        }

        let mut weights: Vec<f64> = segments.iter().map(|s| self.metrics.hybrid_weight(s, whole)).collect();
        let mut weight_sum: f64 = weights.iter().sum();
        if weight_sum <= 0.0 {
            weights = vec![1.0; count];
            weight_sum = count as f64;
        }

        let total = total_ms as f64;
        let pauses: Vec<f64> = segments
            .iter()
            .zip(&weights)
            .map(|(s, w)| self.metrics.capped_pause_weight(s, w / weight_sum * total))
            .collect();
        let speech = total - pauses.iter().sum::<f64>();

        let mut durations = Vec::with_capacity(count);
        let mut assigned = 0u64;
        for i in 0..count - 1 {
            let raw = weights[i] / weight_sum * speech + pauses[i];
            let still_needed = (count - 1 - i) as u64;
            let ceiling = total_ms.saturating_sub(assigned + still_needed).max(1);
            let duration = (raw.floor() as u64).clamp(1, ceiling);
            durations.push(duration);
            assigned += duration;
        }
        durations.push(total_ms.saturating_sub(assigned));

        durations
    }

    /// Prefix every fragment but the first and suffix every fragment but the last with `...`
    pub fn add_continuation_markers(texts: &[String]) -> Vec<String> {
        let last = texts.len().saturating_sub(1);
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| mark_continuation(text, i > 0, i < last))
            .collect()
    }

    fn segment_fits(&self, text: &str, duration_ms: u64) -> bool {
        let limits = &self.config.limits;
        let words: Vec<&str> = text.split_whitespace().collect();
        text.chars().count() <= limits.max_block_chars
            && duration_ms <= limits.max_duration_ms
            && fits_lines(&words, limits.max_line_chars, LINES_PER_CAPTION)
    }

    fn build_fragments(&self, block: &CaptionBlock, texts: Vec<String>, durations: &[u64]) -> Vec<CaptionBlock> {
        let mut start = block.start_ms;
        texts
            .into_iter()
            .zip(durations)
            .map(|(text, duration)| {
                let end = start + duration;
                let fragment = CaptionBlock {
                    index: block.index,
                    source_index: block.source_index,
                    start_ms: start,
                    end_ms: end,
                    lines: vec![text],
                };
                start = end;
                fragment
            })
            .collect()
    }
}
