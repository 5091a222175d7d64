/*!
 * Tests for SRT rendering and parsing
 */

use anyhow::Result;

use subweave::manual_blocks;
use subweave::reconciler::reconcile;
use subweave::subtitle_processor::{SrtWriter, SubtitleCollection, SubtitleEntry};
use subweave::timeline::Segment;

use crate::common;

#[test]
fn test_writer_roundTrip_shouldRecoverOrderAndText() -> Result<()> {
    let segments = vec![
        Segment::plain("a", 0.0, 1.5),
        Segment::plain("b", 1.5, 3.0),
        Segment::plain("c", 3.25, 4.0),
    ];
    let blocks = manual_blocks::parse(">First\n>Second\nline\n");
    let reconciliation = reconcile(&segments, &blocks, false);

    let output = SrtWriter::new().write(&reconciliation.entries);
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out.srt");
    output.write_to(&path)?;
    let parsed = SubtitleCollection::from_file(&path)?.entries;

    let seqs: Vec<usize> = parsed.iter().map(|e| e.seq_num).collect();
    let texts: Vec<&str> = parsed.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(texts, vec!["First", "Second\nline", ""]);
    assert_eq!(parsed[2].start_time_ms, 3250);
    assert_eq!(parsed, output.entries);
    Ok(())
}

#[test]
fn test_display_shouldRenderSrtBlock() {
    let entry = SubtitleEntry::new(7, 61_001, 62_500, "Hi".to_string());
    assert_eq!(entry.to_string(), "7\n00:01:01,001 --> 00:01:02,500\nHi\n\n");
}

#[test]
fn test_parseSrtString_withDotSeparatorsAndCrlf_shouldParse() -> Result<()> {
    let entries = SubtitleCollection::parse_srt_string("1\r\n00:00:01.000 --> 00:00:02.000\r\nHello\r\n\r\n")?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].start_time_ms, 1000);
    assert_eq!(entries[0].text, "Hello");
    Ok(())
}
