/*!
 * Reconciliation of timeline segments with subtitle text.
 *
 * A single forward pass walks the kept segments and the manual blocks with two
 * cursors. Styled segments with readable text use that text and leave the
 * manual cursor where it is; every other segment takes the next unconsumed
 * manual block, or empty text once the blocks run out. The pass never looks
 * ahead, never backtracks and never reorders segments.
 */

use log::debug;

use crate::manual_blocks::ManualBlock;
use crate::rich_text::{self, Extraction};
use crate::timeline::{Segment, SegmentKind};

/// Where an entry's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// The segment's own readable text
    Styled,
    /// The manual block at this index
    Manual(usize),
    /// Nothing was available
    Empty,
}

/// One timed subtitle produced by reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledEntry {
    pub start_secs: f64,
    pub end_secs: f64,
    pub text: String,
    pub source: TextSource,
    // @field: Name of the originating segment, for previews
    pub segment_name: String,
}

/// Counters gathered during reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    pub raw_segment_count: usize,
    pub kept_count: usize,
    pub ignored_count: usize,
    pub styled_count: usize,
    pub plain_text_kept_count: usize,
    pub styled_satisfied_count: usize,
    pub manual_satisfied_count: usize,
    pub empty_count: usize,
    pub manual_block_count: usize,
    pub consumed_manual_count: usize,
}

impl DiagnosticCounts {
    /// Segments that wanted manual text after the blocks ran out
    pub fn shortfall(&self) -> usize {
        self.empty_count
    }

    /// Manual blocks left unconsumed
    pub fn surplus(&self) -> usize {
        self.manual_block_count.saturating_sub(self.consumed_manual_count)
    }

    /// Check the bookkeeping identities
    pub fn is_consistent(&self) -> bool {
        self.raw_segment_count == self.kept_count + self.ignored_count
            && self.kept_count == self.styled_count + self.plain_text_kept_count
            && self.kept_count
                == self.styled_satisfied_count + self.manual_satisfied_count + self.empty_count
            && self.consumed_manual_count <= self.manual_block_count
    }
}

/// Output of a reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub entries: Vec<ReconciledEntry>,
    pub counts: DiagnosticCounts,
}

impl Reconciliation {
    /// Fold segments removed before reconciliation into the counts
    pub fn absorb_ignored(&mut self, ignored: usize) {
        self.counts.raw_segment_count += ignored;
        self.counts.ignored_count += ignored;
    }

    /// Number of segments that consumed (or wanted) a manual block
    pub fn manual_consumers(&self) -> usize {
        self.counts.manual_satisfied_count + self.counts.empty_count
    }
}

/// Two-cursor reconciler
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    include_styled_text: bool,
}

impl Reconciler {
    pub fn new(include_styled_text: bool) -> Self {
        Self { include_styled_text }
    }

    /// Pair filtered segments with text in timeline order
    pub fn reconcile(&self, segments: &[Segment], blocks: &[ManualBlock]) -> Reconciliation {
        let mut counts = DiagnosticCounts {
            raw_segment_count: segments.len(),
            manual_block_count: blocks.len(),
            ..DiagnosticCounts::default()
        };
        let mut entries = Vec::with_capacity(segments.len());
        let mut m = 0;

        for segment in segments {
            let styled = segment.kind == SegmentKind::StyledText;
            if styled && !self.include_styled_text {
                counts.ignored_count += 1;
                continue;
            }

            let mut resolved = None;
            if styled {
                match rich_text::extract(segment) {
                    Extraction::Text(text) => resolved = Some((text, TextSource::Styled)),
                    other => debug!(
                        "Styled segment '{}' at {:.3}s has {}, using manual text",
                        segment.name, segment.start_secs, other
                    ),
                }
            }

            let (text, source) = match resolved {
                Some(found) => found,
                None if m < blocks.len() => {
                    let found = (blocks[m].text(), TextSource::Manual(m));
                    m += 1;
                    found
                }
                None => (String::new(), TextSource::Empty),
            };

            counts.kept_count += 1;
            if styled {
                counts.styled_count += 1;
            } else {
                counts.plain_text_kept_count += 1;
            }
            match source {
                TextSource::Styled => counts.styled_satisfied_count += 1,
                TextSource::Manual(_) => counts.manual_satisfied_count += 1,
                TextSource::Empty => counts.empty_count += 1,
            }

            entries.push(ReconciledEntry {
                start_secs: segment.start_secs,
                end_secs: segment.end_secs,
                text,
                source,
                segment_name: segment.name.clone(),
            });
        }

        counts.consumed_manual_count = m;

        Reconciliation { entries, counts }
    }
}

/// Convenience wrapper around `Reconciler::reconcile`
pub fn reconcile(segments: &[Segment], blocks: &[ManualBlock], include_styled_text: bool) -> Reconciliation {
    Reconciler::new(include_styled_text).reconcile(segments, blocks)
}
