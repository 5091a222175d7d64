/*!
 * Error types for the subweave application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by a timeline source (the host editor's scripting surface)
#[derive(Error, Debug)]
pub enum TimelineError {
    /// The host could not be reached or no timeline is open
    #[error("Timeline unavailable: {0}")]
    Unavailable(String),

    /// No video track with the requested name exists
    #[error("Video track not found: {0}")]
    TrackNotFound(String),

    /// The exported timeline data could not be understood
    #[error("Failed to parse timeline data: {0}")]
    Parse(String),

    /// A write-back targeted a styled segment that does not exist
    #[error("Styled segment {index} not found on track '{track}'")]
    SegmentNotFound {
        /// Track name
        track: String,
        /// Position among the track's styled segments
        index: usize,
    },
}

/// Errors that can occur while producing subtitle output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// End time is not after start time once rounded to milliseconds
    #[error("Invalid time range for entry {index}: end {end_ms}ms <= start {start_ms}ms")]
    InvalidTimeRange {
        /// 1-based position of the entry in the reconciled sequence
        index: usize,
        /// Rounded start time
        start_ms: u64,
        /// Rounded end time
        end_ms: u64,
    },
}

/// Errors surfaced by controller operations
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the timeline source
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),
}

impl From<serde_json::Error> for TimelineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
