/*!
 * Tests for SRT parsing and rendering
 */

use anyhow::Result;
use captionfit::errors::SubtitleError;
use captionfit::subtitle_processor::{CaptionBlock, SubtitleFile};
use crate::common;

/// Test parsing a well-formed file
#[test]
fn test_parse_str_withValidContent_shouldParseAllBlocks() -> Result<()> {
    let file = SubtitleFile::parse_str(common::NON_COMPLIANT_SRT)?;

    assert_eq!(file.blocks.len(), 3);
    assert_eq!(file.artifacts_removed, 0);
    assert_eq!(file.blocks[0].start_ms, 1000);
    assert_eq!(file.blocks[0].end_ms, 10_000);
    assert_eq!(file.blocks[1].lines, vec!["Wow."]);
    assert_eq!(file.blocks[2].index, 3);
    assert_eq!(file.blocks[2].source_index, 3);

    Ok(())
}

/// Test that out-of-order entries are sorted and renumbered
#[test]
fn test_parse_str_withUnorderedEntries_shouldSortByStart() -> Result<()> {
    let content = "7\n00:00:05,000 --> 00:00:06,000\nSecond\n\n3\n00:00:01,000 --> 00:00:02,000\nFirst\n";
    let file = SubtitleFile::parse_str(content)?;

    assert_eq!(file.blocks[0].lines, vec!["First"]);
    assert_eq!(file.blocks[0].index, 1);
    assert_eq!(file.blocks[1].index, 2);

    Ok(())
}

/// Test that malformed entries are skipped while valid ones survive
#[test]
fn test_parse_str_withMalformedEntries_shouldSkipThem() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nGood\n\n\
                   x\n00:00:03,000 --> 00:00:04,000\nBad number\n\n\
                   3\nnot a timing line\nBad timing\n\n\
                   4\n00:00:06,000 --> 00:00:05,000\nBackwards\n\n\
                   5\n00:00:07,000 --> 00:00:08,000\nAlso good\n";
    let file = SubtitleFile::parse_str(content)?;

    let texts: Vec<String> = file.blocks.iter().map(|b| b.text()).collect();
    assert_eq!(texts, vec!["Good", "Also good"]);

    Ok(())
}

/// Test that single-character artifacts are dropped and counted
#[test]
fn test_parse_str_withArtifacts_shouldCountThem() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,500 --> 00:00:02,700\n-\n\n3\n00:00:03,000 --> 00:00:03,100\n?\n";
    let file = SubtitleFile::parse_str(content)?;

    assert_eq!(file.blocks.len(), 1);
    assert_eq!(file.artifacts_removed, 2);

    Ok(())
}

/// Test that content without usable entries is an error
#[test]
fn test_parse_str_withNoEntries_shouldFail() {
    let err = SubtitleFile::parse_str("just some text\nwithout timing").unwrap_err();
    assert!(matches!(err.downcast_ref::<SubtitleError>(), Some(SubtitleError::NoEntries)));
}

/// Test timestamp parsing with both millisecond separators
#[test]
fn test_parse_timestamp_withCommaOrDot_shouldParse() -> Result<()> {
    assert_eq!(CaptionBlock::parse_timestamp("01:02:03,456")?, 3_723_456);
    assert_eq!(CaptionBlock::parse_timestamp("00:00:10.100")?, 10_100);
    assert!(CaptionBlock::parse_timestamp("00:61:00,000").is_err());
    assert!(CaptionBlock::parse_timestamp("garbage").is_err());
    Ok(())
}

/// Test timestamp formatting
#[test]
fn test_format_timestamp_shouldPadFields() {
    assert_eq!(CaptionBlock::format_timestamp(0), "00:00:00,000");
    assert_eq!(CaptionBlock::format_timestamp(3_723_456), "01:02:03,456");
}

/// Test that rendering renumbers from 1 and parses back to the same blocks
#[test]
fn test_to_srt_string_shouldRenumberAndKeepContent() -> Result<()> {
    let blocks = vec![
        CaptionBlock::new(10, 1000, 2500, "First line\nsecond line"),
        CaptionBlock::new(20, 3000, 4000, "Next."),
    ];
    let srt = SubtitleFile::to_srt_string(&blocks);

    assert!(srt.starts_with("1\n00:00:01,000 --> 00:00:02,500\nFirst line\nsecond line\n\n2\n"));

    let parsed = SubtitleFile::parse_str(&srt)?;
    assert_eq!(parsed.blocks[0].lines, blocks[0].lines);
    assert_eq!(parsed.blocks[1].start_ms, 3000);

    Ok(())
}

/// Test block metrics
#[test]
fn test_caption_block_metrics_shouldExcludeLineBreaks() {
    let block = CaptionBlock::new(1, 1000, 3500, "  Hello there \n\n general  ");
    assert_eq!(block.lines, vec!["Hello there", "general"]);
    assert_eq!(block.char_count(), 18);
    assert_eq!(block.line_lengths(), vec![11, 7]);
    assert_eq!(block.joined_text(), "Hello there general");
    assert_eq!(block.duration_ms(), 2500);
}

/// Test that new_validated rejects empty text and inverted ranges
#[test]
fn test_new_validated_withInvalidInput_shouldFail() {
    assert!(CaptionBlock::new_validated(1, 2000, 1000, "text").is_err());
    assert!(CaptionBlock::new_validated(1, 1000, 1000, "text").is_err());
    assert!(CaptionBlock::new_validated(1, 1000, 2000, "   ").is_err());
    assert!(CaptionBlock::new_validated(1, 1000, 2000, "ok").is_ok());
}

/// Test reading from disk
#[test]
fn test_read_withFile_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.srt", common::COMPLIANT_SRT)?;

    let file = SubtitleFile::read(&path)?;
    assert_eq!(file.blocks.len(), 3);
    assert!(SubtitleFile::read(temp_dir.path().join("missing.srt")).is_err());

    Ok(())
}
