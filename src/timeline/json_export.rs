use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;
use crate::timeline::{sort_by_start, Segment, SegmentKind, StyledTextSink, TimelineSource};

// @module: Timeline source backed by a JSON export of the editor timeline

/// Root of the exported timeline document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineExport {
    /// Frames per second used by the frame positions below
    pub frame_rate: f64,

    /// Tracks in host order
    #[serde(default)]
    pub tracks: Vec<TrackExport>,
}

/// Track category as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    #[default]
    Video,
    Audio,
    Subtitle,
}

/// One exported track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackExport {
    pub name: String,

    #[serde(default, rename = "kind")]
    pub track_type: TrackType,

    #[serde(default)]
    pub items: Vec<ItemExport>,
}

/// One exported timeline item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemExport {
    // @field: Clip name; hosts may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub start_frame: i64,

    pub end_frame: i64,

    // @field: Item carries a compositing graph, so its text is readable
    #[serde(default)]
    pub fusion: bool,

    // @field: Text read from the compositing graph, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styled_text: Option<String>,
}

impl TimelineExport {
    /// Parse an export document and check its frame rate
    pub fn from_json(content: &str) -> Result<Self, TimelineError> {
        let export: TimelineExport = serde_json::from_str(content)?;
        if !(export.frame_rate.is_finite() && export.frame_rate > 0.0) {
            return Err(TimelineError::Parse(format!(
                "frame_rate must be a positive number, got {}",
                export.frame_rate
            )));
        }
        Ok(export)
    }

    fn video_tracks(&self) -> impl Iterator<Item = &TrackExport> {
        self.tracks.iter().filter(|t| t.track_type == TrackType::Video)
    }

    fn to_segment(&self, item: &ItemExport) -> Segment {
        let kind = if item.fusion {
            SegmentKind::StyledText
        } else {
            SegmentKind::PlainText
        };
        Segment {
            name: item.name.clone().unwrap_or_default(),
            start_secs: item.start_frame as f64 / self.frame_rate,
            end_secs: item.end_frame as f64 / self.frame_rate,
            kind,
            raw_text: if item.fusion { item.styled_text.clone() } else { None },
        }
    }
}

/// Timeline source reading (and optionally rewriting) an export file
#[derive(Debug, Clone)]
pub struct JsonTimeline {
    path: Option<PathBuf>,
    export: TimelineExport,
    dirty: bool,
}

impl JsonTimeline {
    /// Load an export file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TimelineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TimelineError::Unavailable(format!("cannot read timeline export {}: {}", path.display(), e))
        })?;
        let export = TimelineExport::from_json(&content)?;
        debug!(
            "Loaded timeline export {} ({} tracks @ {} fps)",
            path.display(),
            export.tracks.len(),
            export.frame_rate
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            export,
            dirty: false,
        })
    }

    /// Wrap an already parsed export; `commit` becomes a no-op
    pub fn from_export(export: TimelineExport) -> Self {
        Self {
            path: None,
            export,
            dirty: false,
        }
    }
}

impl TimelineSource for JsonTimeline {
    fn video_tracks(&self) -> Result<Vec<String>, TimelineError> {
        Ok(self.export.video_tracks().map(|t| t.name.clone()).collect())
    }

    fn segments(&self, track: &str) -> Result<Vec<Segment>, TimelineError> {
        let mut found = false;
        let mut segments = Vec::new();
        for t in self.export.video_tracks().filter(|t| t.name == track) {
            found = true;
            segments.extend(t.items.iter().map(|item| self.export.to_segment(item)));
        }
        if !found {
            return Err(TimelineError::TrackNotFound(track.to_string()));
        }
        sort_by_start(&mut segments);
        Ok(segments)
    }
}

impl StyledTextSink for JsonTimeline {
    fn set_styled_text(&mut self, track: &str, styled_index: usize, text: &str) -> Result<(), TimelineError> {
        // Same order as `segments`: matching tracks concatenated, then stable by start
        let mut styled: Vec<&mut ItemExport> = self
            .export
            .tracks
            .iter_mut()
            .filter(|t| t.track_type == TrackType::Video && t.name == track)
            .flat_map(|t| t.items.iter_mut())
            .filter(|item| item.fusion)
            .collect();
        styled.sort_by_key(|item| item.start_frame);

        let item = styled.get_mut(styled_index).ok_or_else(|| TimelineError::SegmentNotFound {
            track: track.to_string(),
            index: styled_index,
        })?;
        item.styled_text = Some(text.to_string());
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), TimelineError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.export)?;
        fs::write(path, json).map_err(|e| {
            TimelineError::Unavailable(format!("cannot write timeline export {}: {}", path.display(), e))
        })?;
        self.dirty = false;
        Ok(())
    }
}
