use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};

use crate::errors::SubtitleError;

// @module: Caption records and SRT reading/writing

// @const: SRT timing line regex, accepts `,` or `.` before milliseconds
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @const: Texts treated as transcription artifacts and dropped at parse time
const ARTIFACT_TEXTS: [&str; 5] = [".", "-", "?", "!", ","];

// @struct: Single caption block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionBlock {
    // @field: Ordinal, reassigned when the pipeline finishes
    pub index: usize,

    // @field: Ordinal of the parsed block this one descends from
    pub source_index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms, strictly after start
    pub end_ms: u64,

    // @field: Text lines
    pub lines: Vec<String>,
}

impl CaptionBlock {
    /// Creates a block from newline-delimited text
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Self {
        CaptionBlock {
            index,
            source_index: index,
            start_ms,
            end_ms,
            lines: text.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect(),
        }
    }

    // @creates: Validated block
    // @validates: Time range and non-empty text
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Result<Self> {
        if end_ms <= start_ms {
            return Err(SubtitleError::InvalidTimeRange { index, start_ms, end_ms }.into());
        }

        let block = Self::new(index, start_ms, end_ms, text);
        if block.lines.is_empty() {
            return Err(anyhow::anyhow!("Empty subtitle text for entry {}", index));
        }

        Ok(block)
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Characters across all lines, line breaks excluded
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum()
    }

    /// Character count of each line
    pub fn line_lengths(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.chars().count()).collect()
    }

    /// Text as written in the file, lines joined by newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Text as spoken, lines joined by spaces
    pub fn joined_text(&self) -> String {
        self.lines.join(" ")
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(SubtitleError::InvalidTimestamp(timestamp.to_string()));
        }

        let mut values = [0u64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| SubtitleError::InvalidTimestamp(timestamp.to_string()))?;
        }
        let [hours, minutes, seconds, millis] = values;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::InvalidTimestamp(timestamp.to_string()));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for CaptionBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms)
        )?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Parsed SRT content
#[derive(Debug, Clone, Default)]
pub struct SubtitleFile {
    /// Blocks in chronological order
    pub blocks: Vec<CaptionBlock>,

    /// Entries dropped as single-character artifacts
    pub artifacts_removed: usize,
}

impl SubtitleFile {
    /// Read and parse an SRT file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        Self::parse_str(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))
    }

    /// Parse SRT content into caption blocks
    pub fn parse_str(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
        let mut blocks = Vec::new();
        let mut artifacts_removed = 0;

        for (chunk_no, chunk) in content.split("\n\n").enumerate() {
            let lines: Vec<&str> = chunk.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            if lines.is_empty() {
                continue;
            }
            if lines.len() < 3 {
                warn!("Skipping incomplete subtitle block #{}: {:?}", chunk_no + 1, lines);
                continue;
            }

            let Ok(index) = lines[0].parse::<usize>() else {
                warn!("Skipping block with invalid sequence number: {}", lines[0]);
                continue;
            };

            let Some(caps) = TIMING_REGEX.captures(lines[1]) else {
                warn!("Skipping entry {}: invalid timing line: {}", index, lines[1]);
                continue;
            };
            let start_ms = Self::captures_to_ms(&caps, 1);
            let end_ms = Self::captures_to_ms(&caps, 5);

            let text = lines[2..].join("\n");
            if ARTIFACT_TEXTS.contains(&text.as_str()) {
                debug!("Dropping single-character artifact in entry {}: {:?}", index, text);
                artifacts_removed += 1;
                continue;
            }

            match CaptionBlock::new_validated(index, start_ms, end_ms, &text) {
                Ok(block) => blocks.push(block),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", index, e),
            }
        }

        if blocks.is_empty() {
            return Err(SubtitleError::NoEntries.into());
        }

        blocks.sort_by_key(|b| b.start_ms);
        for (i, block) in blocks.iter_mut().enumerate() {
            block.index = i + 1;
            block.source_index = i + 1;
        }

        Ok(SubtitleFile { blocks, artifacts_removed })
    }

    /// Render blocks as SRT, renumbering from 1
    pub fn to_srt_string(blocks: &[CaptionBlock]) -> String {
        let mut out = String::new();
        for (i, block) in blocks.iter().enumerate() {
            let mut block = block.clone();
            block.index = i + 1;
            out.push_str(&block.to_string());
        }
        out
    }

    // Groups are all two-to-three digit numbers matched by the regex
    fn captures_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let part = |offset: usize| -> u64 {
            caps.get(start_idx + offset).map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        ((part(0) * 60 + part(1)) * 60 + part(2)) * 1000 + part(3)
    }
}
