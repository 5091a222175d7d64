/*!
 * Tests for segment classification
 */

use subweave::classifier::{FilterConfig, IgnoreReason, SegmentClassifier};
use subweave::timeline::{Segment, TimelineSource};

use crate::common;

#[test]
fn test_classify_withCrossDissolve_shouldIgnoreRegardlessOfDuration() {
    let classifier = SegmentClassifier::new(&FilterConfig::default());

    let decision = classifier.classify(&Segment::plain("Cross Dissolve", 10.0, 12.0));

    assert!(matches!(decision, subweave::FilterDecision::Ignored(IgnoreReason::Denylisted { .. })));
}

#[test]
fn test_partition_withEffectsKeptAndStyledIncluded_shouldKeepEverything() -> anyhow::Result<()> {
    let raw = common::sample_memory_timeline().segments("V1")?;
    let config = FilterConfig {
        ignore_effects: false,
        include_styled_text: true,
        ..FilterConfig::default()
    };

    let classification = SegmentClassifier::new(&config).partition(&raw);

    assert_eq!(classification.kept, raw);
    assert!(classification.ignored.is_empty());
    Ok(())
}

#[test]
fn test_partition_withDefaults_shouldAccountForEverySegment() -> anyhow::Result<()> {
    let raw = common::sample_memory_timeline().segments("V1")?;

    let classification = SegmentClassifier::new(&FilterConfig::default()).partition(&raw);

    assert_eq!(classification.raw_count(), raw.len());
    let kept: Vec<&str> = classification.kept.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(kept, vec!["Line one", "Line two", "Line three"]);
    assert_eq!(classification.effect_ignored().count(), 2);
    assert_eq!(classification.styled_ignored().count(), 1);
    Ok(())
}

#[test]
fn test_classify_withExtraPattern_shouldMatchCaseInsensitively() {
    let config = FilterConfig {
        extra_ignore_patterns: vec!["WIPE".to_string(), "  ".to_string()],
        ..FilterConfig::default()
    };
    let classifier = SegmentClassifier::new(&config);

    assert!(!classifier.classify(&Segment::plain("Soft wipe left", 0.0, 3.0)).is_kept());
    assert!(classifier.classify(&Segment::plain("Ordinary line", 0.0, 3.0)).is_kept());
}
