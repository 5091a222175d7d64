/*!
 * Integration tests for the timeline export to SRT workflow
 */

use anyhow::Result;

use subweave::app_config::Config;
use subweave::app_controller::Controller;
use subweave::subtitle_processor::SubtitleCollection;
use subweave::timeline::{JsonTimeline, TimelineSource};
use subweave::TimelineError;

use crate::common;

/// Test that aligned blocks produce one cue per kept segment
#[test]
fn test_srtWorkflow_withAlignedBlocks_shouldWriteTimedCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let timeline = common::create_test_timeline(temp_dir.path())?;
    let manual = common::create_test_manual(temp_dir.path(), &["First", "Second", "Third"])?;
    let output = temp_dir.path().join("out").join("subs.srt");
    let controller = Controller::with_config(Config::default(), JsonTimeline::open(&timeline)?)?;

    let summary = controller.generate_srt(&manual, &output, "V1")?;

    assert_eq!(summary.output.written(), 3);
    assert!(summary.output.skipped.is_empty());
    let entries = SubtitleCollection::from_file(&output)?.entries;
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second", "Third"]);
    let times: Vec<(u64, u64)> = entries.iter().map(|e| (e.start_time_ms, e.end_time_ms)).collect();
    assert_eq!(times, vec![(0, 2000), (2400, 4400), (6400, 8400)]);
    Ok(())
}

/// Styled text fills its own slot and manual blocks keep flowing around it
#[test]
fn test_srtWorkflow_withStyledTextIncluded_shouldInterleaveStyledCue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let timeline = common::create_test_timeline(temp_dir.path())?;
    let manual = common::create_test_manual(temp_dir.path(), &["First", "Second", "Third"])?;
    let output = temp_dir.path().join("subs.srt");
    let mut config = Config::default();
    config.output.include_styled_text = true;
    let controller = Controller::with_config(config, JsonTimeline::open(&timeline)?)?;

    let summary = controller.generate_srt(&manual, &output, "V1")?;

    let texts: Vec<&str> = summary.output.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second", "Styled hello", "Third"]);
    assert_eq!(summary.run.reconciliation.counts.styled_satisfied_count, 1);
    Ok(())
}

/// Without effect filtering the transition and the short segment take blocks too
#[test]
fn test_srtWorkflow_withEffectsKept_shouldEmitEmptyCuesForShortfall() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let timeline = common::create_test_timeline(temp_dir.path())?;
    let manual = common::create_test_manual(temp_dir.path(), &["First", "Second", "Third"])?;
    let output = temp_dir.path().join("subs.srt");
    let mut config = Config::default();
    config.filter.ignore_effects = false;
    let controller = Controller::with_config(config, JsonTimeline::open(&timeline)?)?;

    let summary = controller.generate_srt(&manual, &output, "V1")?;

    let texts: Vec<&str> = summary.output.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second", "Third", "", ""]);
    assert_eq!(summary.run.reconciliation.counts.shortfall(), 2);
    let report = summary.run.report();
    assert_eq!(report.styled_ignored_count, 1);
    assert_eq!(report.effect_ignored_count, 0);
    Ok(())
}

#[test]
fn test_srtWorkflow_withUnknownTrack_shouldFailWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let timeline = common::create_test_timeline(temp_dir.path())?;
    let manual = common::create_test_manual(temp_dir.path(), &["First"])?;
    let output = temp_dir.path().join("subs.srt");
    let controller = Controller::with_config(Config::default(), JsonTimeline::open(&timeline)?)?;

    let result = controller.generate_srt(&manual, &output, "A1");

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_jsonTimeline_withMissingOrBadFile_shouldReportTimelineErrors() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let missing = JsonTimeline::open(temp_dir.path().join("nope.json"));
    assert!(matches!(missing, Err(TimelineError::Unavailable(_))));

    let bad_rate = common::create_test_file(temp_dir.path(), "bad.json", r#"{"frame_rate": 0, "tracks": []}"#)?;
    assert!(matches!(JsonTimeline::open(&bad_rate), Err(TimelineError::Parse(_))));

    let timeline = JsonTimeline::open(common::create_test_timeline(temp_dir.path())?)?;
    assert_eq!(timeline.video_tracks()?, vec!["V1".to_string(), "V2".to_string()]);
    assert!(timeline.segments("V2")?.is_empty());
    Ok(())
}
