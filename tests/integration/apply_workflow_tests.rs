/*!
 * Integration tests for writing manual blocks back into a timeline export
 */

use anyhow::Result;

use subweave::app_config::Config;
use subweave::app_controller::Controller;
use subweave::timeline::{JsonTimeline, TimelineSource};

use crate::common;

#[test]
fn test_applyWorkflow_shouldRewriteExportAndFeedNextRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let timeline = common::create_test_timeline(temp_dir.path())?;
    let manual = common::create_test_manual(temp_dir.path(), &["Rewritten title"])?;
    let mut controller = Controller::with_config(Config::default(), JsonTimeline::open(&timeline)?)?;

    let summary = controller.apply(&manual, "V1")?;

    assert_eq!((summary.applied, summary.paired, summary.styled_segments), (1, 1, 1));
    let reopened = JsonTimeline::open(&timeline)?;
    let styled: Vec<_> = reopened.segments("V1")?.into_iter().filter(|s| s.is_styled()).collect();
    assert_eq!(styled[0].raw_text.as_deref(), Some("Rewritten title"));
    Ok(())
}

#[test]
fn test_applyWorkflow_withNoStyledSegments_shouldApplyNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let timeline = common::create_test_timeline(temp_dir.path())?;
    let before = std::fs::read_to_string(&timeline)?;
    let manual = common::create_test_manual(temp_dir.path(), &["Unused"])?;
    let mut controller = Controller::with_config(Config::default(), JsonTimeline::open(&timeline)?)?;

    let summary = controller.apply(&manual, "V2")?;

    assert_eq!(summary.paired, 0);
    assert_eq!(summary.applied, 0);
    assert_eq!(std::fs::read_to_string(&timeline)?, before);
    Ok(())
}
