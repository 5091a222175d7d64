/*!
 * In-memory timeline source.
 *
 * Holds fabricated tracks so the reconciliation pipeline can run without a
 * host editor. Styled write-backs are applied in place.
 */

use crate::errors::TimelineError;
use crate::timeline::{sort_by_start, Segment, StyledTextSink, TimelineSource};

/// Timeline made of named tracks held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimeline {
    tracks: Vec<(String, Vec<Segment>)>,
    commits: usize,
}

impl InMemoryTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a video track; segments are stored in timeline order
    pub fn with_track(mut self, name: impl Into<String>, mut segments: Vec<Segment>) -> Self {
        sort_by_start(&mut segments);
        self.tracks.push((name.into(), segments));
        self
    }

    /// Number of successful `commit` calls
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

impl TimelineSource for InMemoryTimeline {
    fn video_tracks(&self) -> Result<Vec<String>, TimelineError> {
        Ok(self.tracks.iter().map(|(name, _)| name.clone()).collect())
    }

    fn segments(&self, track: &str) -> Result<Vec<Segment>, TimelineError> {
        let mut matching = self.tracks.iter().filter(|(name, _)| name == track).peekable();
        if matching.peek().is_none() {
            return Err(TimelineError::TrackNotFound(track.to_string()));
        }
        let mut segments: Vec<Segment> = matching.flat_map(|(_, s)| s.iter().cloned()).collect();
        sort_by_start(&mut segments);
        Ok(segments)
    }
}

impl StyledTextSink for InMemoryTimeline {
    fn set_styled_text(&mut self, track: &str, styled_index: usize, text: &str) -> Result<(), TimelineError> {
        // Same order as `segments`: matching tracks concatenated, then stable by start
        let mut styled: Vec<&mut Segment> = self
            .tracks
            .iter_mut()
            .filter(|(name, _)| name == track)
            .flat_map(|(_, segments)| segments.iter_mut())
            .filter(|s| s.is_styled())
            .collect();
        styled.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

        let segment = styled.get_mut(styled_index).ok_or_else(|| TimelineError::SegmentNotFound {
            track: track.to_string(),
            index: styled_index,
        })?;
        segment.raw_text = Some(text.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), TimelineError> {
        self.commits += 1;
        Ok(())
    }
}
