/*!
 * Diagnostics for a reconciliation run.
 *
 * Produces structured data only: counts, the first point where manual blocks
 * and manual-consuming segments stop lining up, operator hints, and listings
 * of kept and ignored segments. Rendering is left to the caller.
 */

use std::fmt;

use crate::classifier::{default_denylist, Classification, FilterConfig, IgnoreReason, SegmentClassifier};
use crate::manual_blocks::ManualBlock;
use crate::reconciler::{DiagnosticCounts, Reconciliation, TextSource};
use crate::subtitle_processor::secs_to_ms;
use crate::timeline::Segment;

/// Suggested fix when counts disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentHint {
    MoreBlocksThanSegments,
    MoreSegmentsThanBlocks,
}

impl fmt::Display for AlignmentHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoreBlocksThanSegments => write!(
                f,
                "More blocks than segments: check for stray '>' lines or try --no-ignore-effects"
            ),
            Self::MoreSegmentsThanBlocks => write!(
                f,
                "More segments than blocks: add --extra-ignore patterns or merge blocks"
            ),
        }
    }
}

/// First position where the manual side and the segment side diverge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    /// 0-based position in the manual-consuming sequence
    pub index: usize,
    pub manual_blocks: usize,
    pub manual_consumers: usize,
    /// Start (ms) of the first segment left without a block, if that side is longer
    pub segment_start_ms: Option<u64>,
    /// First unused block text, if that side is longer
    pub block_text: Option<String>,
}

/// Listing row for kept or ignored segments
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub name: String,
    pub start_secs: f64,
    pub end_secs: f64,
    pub duration_secs: f64,
    pub reason: Option<IgnoreReason>,
}

impl SegmentSummary {
    fn from_segment(segment: &Segment, reason: Option<IgnoreReason>) -> Self {
        Self {
            name: segment.name.clone(),
            start_secs: segment.start_secs,
            end_secs: segment.end_secs,
            duration_secs: segment.duration_secs(),
            reason,
        }
    }
}

/// Full diagnostic snapshot
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub counts: DiagnosticCounts,
    pub effect_ignored_count: usize,
    pub styled_ignored_count: usize,
    /// Styled segments on the raw track, whether kept or not
    pub raw_styled_total: usize,
    /// Raw segments whose names hit the built-in denylist
    pub raw_denylist_hits: usize,
    pub first_misalignment: Option<Misalignment>,
    pub hint: Option<AlignmentHint>,
    pub kept: Vec<SegmentSummary>,
    pub ignored: Vec<SegmentSummary>,
}

impl DiagnosticReport {
    pub fn is_aligned(&self) -> bool {
        self.first_misalignment.is_none()
    }
}

/// Summarize one run without touching its inputs
pub fn diagnose(
    raw: &[Segment],
    classification: &Classification,
    blocks: &[ManualBlock],
    reconciliation: &Reconciliation,
) -> DiagnosticReport {
    let builtin = SegmentClassifier::new(&FilterConfig {
        denylist: default_denylist(),
        extra_ignore_patterns: Vec::new(),
        ..FilterConfig::default()
    });
    let raw_denylist_hits = raw
        .iter()
        .filter(|s| builtin.matching_pattern(&s.name.to_lowercase()).is_some())
        .count();
    let raw_styled_total = raw.iter().filter(|s| s.is_styled()).count();

    let consumer_starts: Vec<f64> = reconciliation
        .entries
        .iter()
        .filter(|e| e.source != TextSource::Styled)
        .map(|e| e.start_secs)
        .collect();
    let manual_consumers = consumer_starts.len();
    let first_misalignment = find_misalignment(&consumer_starts, blocks);

    let hint = match blocks.len().cmp(&manual_consumers) {
        std::cmp::Ordering::Greater => Some(AlignmentHint::MoreBlocksThanSegments),
        std::cmp::Ordering::Less => Some(AlignmentHint::MoreSegmentsThanBlocks),
        std::cmp::Ordering::Equal => None,
    };

    DiagnosticReport {
        counts: reconciliation.counts.clone(),
        effect_ignored_count: classification.effect_ignored().count(),
        styled_ignored_count: classification.styled_ignored().count(),
        raw_styled_total,
        raw_denylist_hits,
        first_misalignment,
        hint,
        kept: classification
            .kept
            .iter()
            .map(|s| SegmentSummary::from_segment(s, None))
            .collect(),
        ignored: classification
            .ignored
            .iter()
            .map(|(s, r)| SegmentSummary::from_segment(s, Some(r.clone())))
            .collect(),
    }
}

fn find_misalignment(consumer_starts: &[f64], blocks: &[ManualBlock]) -> Option<Misalignment> {
    if consumer_starts.len() == blocks.len() {
        return None;
    }
    let index = consumer_starts.len().min(blocks.len());
    Some(Misalignment {
        index,
        manual_blocks: blocks.len(),
        manual_consumers: consumer_starts.len(),
        segment_start_ms: consumer_starts.get(index).map(|s| secs_to_ms(*s)),
        block_text: blocks.get(index).map(|b| b.text()),
    })
}
