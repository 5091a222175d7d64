/*!
 * Timeline access for subtitle reconciliation.
 *
 * The host editor is treated as a black box that hands over an ordered list of
 * segments for a named video track. This module defines:
 * - `Segment` / `SegmentKind`: one clip as reported by the host
 * - `TimelineSource`: read access to tracks and their segments
 * - `StyledTextSink`: write-back of text into styled segments
 * - `json_export`: a source backed by a JSON timeline export
 * - `memory`: an in-memory source for tests and embedding
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

pub mod json_export;
pub mod memory;

pub use json_export::JsonTimeline;
pub use memory::InMemoryTimeline;

/// Whether the host exposes a segment's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Text is not readable through the scripting surface
    PlainText,
    /// Text is readable (rich-text title clips)
    StyledText,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::StyledText => write!(f, "styled"),
        }
    }
}

/// One item on a timeline track
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    // @field: Clip name as reported by the host
    pub name: String,

    // @field: Start in seconds
    pub start_secs: f64,

    // @field: End in seconds
    pub end_secs: f64,

    // @field: Text exposure
    pub kind: SegmentKind,

    // @field: Readable text (styled only); None when the host reported no field
    pub raw_text: Option<String>,
}

impl Segment {
    /// Create a plain text segment
    pub fn plain(name: impl Into<String>, start_secs: f64, end_secs: f64) -> Self {
        Self {
            name: name.into(),
            start_secs,
            end_secs,
            kind: SegmentKind::PlainText,
            raw_text: None,
        }
    }

    /// Create a styled segment carrying readable text
    pub fn styled(name: impl Into<String>, start_secs: f64, end_secs: f64, raw_text: Option<String>) -> Self {
        Self {
            name: name.into(),
            start_secs,
            end_secs,
            kind: SegmentKind::StyledText,
            raw_text,
        }
    }

    /// Length of the segment in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    pub fn is_styled(&self) -> bool {
        self.kind == SegmentKind::StyledText
    }
}

/// Sort segments into timeline order; ties keep the host's order
pub fn sort_by_start(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));
}

/// Read access to the host editor's timeline
///
/// Implementations must return segments already in timeline order.
pub trait TimelineSource {
    /// Names of all video tracks, in track order
    fn video_tracks(&self) -> Result<Vec<String>, TimelineError>;

    /// Ordered segments of every video track with the given name
    fn segments(&self, track: &str) -> Result<Vec<Segment>, TimelineError>;
}

/// Write access to the text of styled segments
pub trait StyledTextSink {
    /// Replace the text of the `styled_index`-th styled segment on `track`
    fn set_styled_text(&mut self, track: &str, styled_index: usize, text: &str) -> Result<(), TimelineError>;

    /// Persist pending changes
    fn commit(&mut self) -> Result<(), TimelineError>;
}
