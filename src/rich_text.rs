use std::fmt;

use crate::timeline::{Segment, SegmentKind};

// @module: Readable text extraction for styled segments

/// What a styled segment offers as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Trimmed, non-empty text
    Text(String),
    /// The field exists but holds only whitespace
    Empty,
    /// The host reported no text field (or the segment is not styled)
    Absent,
}

impl Extraction {
    /// Usable text, if any
    pub fn text(self) -> Option<String> {
        match self {
            Self::Text(t) => Some(t),
            Self::Empty | Self::Absent => None,
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "text ({} chars)", t.chars().count()),
            Self::Empty => write!(f, "empty text field"),
            Self::Absent => write!(f, "no text field"),
        }
    }
}

/// Extract the readable text of a styled segment
pub fn extract(segment: &Segment) -> Extraction {
    if segment.kind != SegmentKind::StyledText {
        return Extraction::Absent;
    }
    match segment.raw_text.as_deref().map(str::trim) {
        None => Extraction::Absent,
        Some("") => Extraction::Empty,
        Some(text) => Extraction::Text(text.to_string()),
    }
}
