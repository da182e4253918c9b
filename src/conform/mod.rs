/*!
 * Caption conforming pipeline.
 *
 * Captions flow through three phases in a fixed order, each a pure function
 * over its input and each completing over the whole sequence before the next
 * begins:
 *
 * 1. [`splitter::BlockSplitter`] divides over-long captions into timed fragments
 * 2. [`balancer::LineBalancer`] wraps every caption into at most two lines
 * 3. [`extender::DurationExtender`] lengthens short captions into free time
 *
 * [`Conformer::run`] chains the phases, renumbers the result and reports
 * what changed.
 */

use log::{debug, warn};
use serde::Serialize;

use crate::app_config::ConformConfig;
use crate::subtitle_processor::CaptionBlock;

pub mod balancer;
pub mod extender;
pub mod metrics;
pub mod scorer;
pub mod splitter;
pub mod text;

use balancer::LineBalancer;
use extender::DurationExtender;
use metrics::TextMetrics;
use splitter::BlockSplitter;

/// What a pipeline run changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConformStats {
    /// Captions before the run
    pub original_count: usize,
    /// Captions after the run
    pub final_count: usize,
    /// Source captions divided into several
    pub blocks_split: usize,
    /// Captions whose lines were rewrapped
    pub lines_balanced: usize,
    /// Captions whose end time moved later
    pub durations_extended: usize,
    /// Captions still under the minimum duration
    pub still_short: usize,
    /// Adjacent pairs where a caption ends after its successor starts
    pub overlaps: usize,
}

impl ConformStats {
    /// Whether the run changed anything
    pub fn has_changes(&self) -> bool {
        self.blocks_split > 0 || self.lines_balanced > 0 || self.durations_extended > 0
    }
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub struct ConformOutcome {
    pub blocks: Vec<CaptionBlock>,
    pub stats: ConformStats,
}

/// Runs the conform phases with one set of constant tables
#[derive(Debug, Clone)]
pub struct Conformer {
    config: ConformConfig,
    metrics: TextMetrics,
}

impl Conformer {
    /// Create a conformer using the vowel-group syllable estimator
    pub fn new(config: ConformConfig) -> Self {
        let metrics = TextMetrics::new(&config);
        Self { config, metrics }
    }

    /// Create a conformer with custom text metrics, e.g. backed by a syllable dictionary
    pub fn with_metrics(config: ConformConfig, metrics: TextMetrics) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &ConformConfig {
        &self.config
    }

    /// Split every over-long caption; fragments keep their source caption's index
    pub fn split(&self, blocks: &[CaptionBlock]) -> Vec<CaptionBlock> {
        let splitter = BlockSplitter::new(&self.config, &self.metrics);
        blocks.iter().flat_map(|block| splitter.split_block(block)).collect()
    }

    /// Wrap one caption into at most two balanced lines
    pub fn balance_lines(&self, block: &CaptionBlock) -> CaptionBlock {
        LineBalancer::new(&self.config).balance(block)
    }

    /// Extend short captions without closing the gap to their successors
    pub fn extend_durations(&self, blocks: &[CaptionBlock]) -> Vec<CaptionBlock> {
        DurationExtender::new(&self.config.limits).extend(blocks)
    }

    /// Run all phases in order and renumber the result from 1
    pub fn run(&self, blocks: &[CaptionBlock]) -> ConformOutcome {
        let mut stats = ConformStats {
            original_count: blocks.len(),
            ..ConformStats::default()
        };

        let splitter = BlockSplitter::new(&self.config, &self.metrics);
        let mut split = Vec::with_capacity(blocks.len());
        for block in blocks {
            let fragments = splitter.split_block(block);
            if fragments.len() > 1 {
                stats.blocks_split += 1;
            }
            split.extend(fragments);
        }

        let balancer = LineBalancer::new(&self.config);
        let balanced: Vec<CaptionBlock> = split
            .iter()
            .map(|block| {
                let result = balancer.balance(block);
                if result.lines != block.lines {
                    stats.lines_balanced += 1;
                }
                result
            })
            .collect();

        let extender = DurationExtender::new(&self.config.limits);
        let mut result = extender.extend(&balanced);
        stats.durations_extended = result
            .iter()
            .zip(&balanced)
            .filter(|(after, before)| after.end_ms != before.end_ms)
            .count();

        for block in result.iter().filter(|b| extender.is_short(b)) {
            warn!(
                "Block {} remains short at {}ms: no room before the next caption",
                block.index,
                block.duration_ms()
            );
            stats.still_short += 1;
        }

        for pair in result.windows(2) {
            if pair[0].end_ms > pair[1].start_ms {
                warn!(
                    "Block {} overlaps block {} by {}ms",
                    pair[0].index,
                    pair[1].index,
                    pair[0].end_ms - pair[1].start_ms
                );
                stats.overlaps += 1;
            }
        }

        Self::renumber(&mut result);
        stats.final_count = result.len();
        debug!("Conform finished: {:?}", stats);

        ConformOutcome { blocks: result, stats }
    }

    /// Reassign indices from 1 in sequence order
    pub fn renumber(blocks: &mut [CaptionBlock]) {
        for (i, block) in blocks.iter_mut().enumerate() {
            block.index = i + 1;
        }
    }
}
