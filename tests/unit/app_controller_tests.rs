/*!
 * Tests for the application controller over an in-memory timeline
 */

use anyhow::Result;

use subweave::app_config::Config;
use subweave::app_controller::Controller;
use subweave::diagnostics::AlignmentHint;
use subweave::errors::AppError;
use subweave::manual_blocks;
use subweave::reconciler::TextSource;
use subweave::timeline::InMemoryTimeline;

use crate::common;

fn controller(config: Config) -> Controller<InMemoryTimeline> {
    Controller::with_config(config, common::sample_memory_timeline()).unwrap()
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.watch.interval_ms = 0;
    assert!(Controller::with_config(config, InMemoryTimeline::new()).is_err());
}

#[test]
fn test_tracksAndCount_shouldReflectFiltering() -> Result<()> {
    let controller = controller(Config::default());

    assert_eq!(controller.tracks()?, vec!["V1".to_string()]);
    assert_eq!(controller.count("V1")?, 3);
    assert!(controller.count("V9").is_err());
    Ok(())
}

#[test]
fn test_loadTrack_withUnknownTrack_shouldReturnTimelineError() {
    let controller = controller(Config::default());
    assert!(matches!(controller.load_track("V9"), Err(AppError::Timeline(_))));
}

#[test]
fn test_loadManual_withMissingFile_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller(Config::default());

    let result = controller.load_manual(&temp_dir.path().join("missing.txt"));

    match result {
        Err(AppError::File(message)) => {
            assert!(message.contains("Failed to read file"));
            assert!(message.contains("missing.txt"));
        }
        other => panic!("expected a file error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_runWithBlocks_withStyledIncluded_shouldUseStyledTextWithoutConsumingBlocks() -> Result<()> {
    let mut config = Config::default();
    config.output.include_styled_text = true;
    let controller = controller(config);

    let run = controller.run_with_blocks("V1", manual_blocks::parse(">a\n>b\n>c\n"))?;

    let texts: Vec<&str> = run.reconciliation.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "Styled hello", "c"]);
    assert_eq!(run.reconciliation.entries[2].source, TextSource::Styled);
    let counts = &run.reconciliation.counts;
    assert_eq!(counts.raw_segment_count, 6);
    assert_eq!(counts.kept_count, 4);
    assert_eq!(counts.ignored_count, 2);
    assert_eq!(counts.consumed_manual_count, 3);
    assert!(counts.is_consistent());
    Ok(())
}

#[test]
fn test_diagnose_withTooFewBlocks_shouldPointAtUncoveredSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manual = common::create_test_manual(temp_dir.path(), &["a", "b"])?;
    let controller = controller(Config::default());

    let report = controller.diagnose(&manual, "V1")?;

    assert_eq!(report.hint, Some(AlignmentHint::MoreSegmentsThanBlocks));
    let misalignment = report.first_misalignment.clone().unwrap();
    assert_eq!(misalignment.index, 2);
    assert_eq!(misalignment.segment_start_ms, Some(6400));
    assert_eq!(report.counts.empty_count, 1);

    let text = controller.format_diagnosis(&report, false);
    assert!(text.contains("first misalignment at #3"));
    assert!(text.contains("00:00:06,400"));
    assert!(text.contains("[hint] More segments than blocks"));
    Ok(())
}

#[test]
fn test_stats_shouldBreakDownIgnoredSegments() -> Result<()> {
    let controller = controller(Config::default());

    let report = controller.stats("V1")?;

    assert_eq!(report.counts.raw_segment_count, 6);
    assert_eq!(report.counts.kept_count, 3);
    assert_eq!(report.effect_ignored_count, 2);
    assert_eq!(report.styled_ignored_count, 1);
    assert_eq!(report.raw_styled_total, 1);
    assert_eq!(report.raw_denylist_hits, 1);

    let text = controller.format_stats("V1", &report);
    assert!(text.contains("[stats] track='V1' raw_items=6"));
    assert!(text.contains("[tail ignored effect] last 2:"));
    assert!(text.contains("Cross Dissolve"));
    Ok(())
}

#[test]
fn test_formatPreview_withLimit_shouldTruncateRows() -> Result<()> {
    let mut config = Config::default();
    config.output.preview_limit = 2;
    let controller = controller(config);
    let run = controller.run_with_blocks("V1", manual_blocks::parse(">one\ntwo\n>b\n>c\n>d\n"))?;

    let limited = controller.format_preview(&run, false);
    let full = controller.format_preview(&run, true);

    assert_eq!(limited.lines().filter(|l| l.contains("||")).count(), 2);
    assert_eq!(full.lines().filter(|l| l.contains("||")).count(), 3);
    assert!(limited.contains("one / two"));
    assert!(full.contains("[warn] mismatch: 1 unused blocks, 0 empty entries"));
    Ok(())
}

#[test]
fn test_apply_shouldWriteBlocksIntoStyledSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manual = common::create_test_manual(temp_dir.path(), &["Replaced", "Unused"])?;
    let mut controller = controller(Config::default());

    let summary = controller.apply(&manual, "V1")?;

    assert_eq!(summary.paired, 1);
    assert_eq!(summary.applied, 1);
    assert_eq!(summary.manual_blocks, 2);
    assert_eq!(controller.source().commit_count(), 1);
    let styled = controller.load_track("V1")?.into_iter().find(|s| s.is_styled()).unwrap();
    assert_eq!(styled.raw_text.as_deref(), Some("Replaced"));
    Ok(())
}
