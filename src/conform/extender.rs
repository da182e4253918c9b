//! Minimum-duration extension in a single forward pass.

use log::debug;

use crate::app_config::LayoutLimits;
use crate::subtitle_processor::CaptionBlock;

/// Lengthens short captions into the free time before their successor
pub struct DurationExtender<'a> {
    limits: &'a LayoutLimits,
}

impl<'a> DurationExtender<'a> {
    pub fn new(limits: &'a LayoutLimits) -> Self {
        Self { limits }
    }

    /// Whether the caption is shorter than the minimum duration
    pub fn is_short(&self, block: &CaptionBlock) -> bool {
        block.duration_ms() < self.limits.min_duration_ms
    }

    /// Extend short captions; start times never move and end times never decrease
    pub fn extend(&self, blocks: &[CaptionBlock]) -> Vec<CaptionBlock> {
        let mut extended = blocks.to_vec();

        for i in 0..extended.len() {
            if !self.is_short(&extended[i]) {
                continue;
            }

            let wanted_end = extended[i].start_ms + self.limits.min_duration_ms;
            let max_end = extended
                .get(i + 1)
                .map_or(u64::MAX, |next| next.start_ms.saturating_sub(self.limits.min_gap_ms));
            let new_end = wanted_end.min(max_end);

            let block = &mut extended[i];
            if new_end > block.end_ms {
                debug!(
                    "Extended block {} from {}ms to {}ms",
                    block.index,
                    block.duration_ms(),
                    new_end - block.start_ms
                );
                block.end_ms = new_end;
            }
        }

        extended
    }
}
