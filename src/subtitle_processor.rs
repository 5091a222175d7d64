use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::reconciler::ReconciledEntry;

// @module: SRT rendering and parsing

// @const: SRT timestamp line regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

/// Convert seconds to whole milliseconds, rounding to nearest and clamping at zero
pub fn secs_to_ms(secs: f64) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * 1000.0).round() as u64
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, possibly multi-line or empty
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Parse an SRT timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Rendered SRT document plus what had to be left out
#[derive(Debug, Clone, Default)]
pub struct SrtOutput {
    /// Complete SRT text
    pub text: String,
    /// Entries as written, renumbered from 1
    pub entries: Vec<SubtitleEntry>,
    /// Entries skipped because of a degenerate time range
    pub skipped: Vec<SubtitleError>,
}

impl SrtOutput {
    pub fn written(&self) -> usize {
        self.entries.len()
    }

    /// Write the document to disk in one go
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_to_file(path, &self.text)
    }
}

/// Renders reconciled entries as SRT
#[derive(Debug, Default, Clone, Copy)]
pub struct SrtWriter;

impl SrtWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render entries; a range that is empty after rounding is skipped with a warning
    pub fn write(&self, entries: &[ReconciledEntry]) -> SrtOutput {
        let mut output = SrtOutput::default();

        for (i, entry) in entries.iter().enumerate() {
            let start_ms = secs_to_ms(entry.start_secs);
            let end_ms = secs_to_ms(entry.end_secs);
            if end_ms <= start_ms {
                let error = SubtitleError::InvalidTimeRange {
                    index: i + 1,
                    start_ms,
                    end_ms,
                };
                warn!("Skipping subtitle entry: {}", error);
                output.skipped.push(error);
                continue;
            }

            let subtitle = SubtitleEntry::new(output.entries.len() + 1, start_ms, end_ms, entry.text.clone());
            output.text.push_str(&subtitle.to_string());
            output.entries.push(subtitle);
        }

        debug!(
            "Rendered {} SRT entries ({} skipped)",
            output.entries.len(),
            output.skipped.len()
        );
        output
    }
}

/// Collection of parsed subtitle entries
#[derive(Debug, Default)]
pub struct SubtitleCollection {
    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let entries = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse SRT file: {:?}", path.as_ref()))?;
        Ok(Self { entries })
    }

    /// Parse SRT text into entries; entries with empty text are preserved
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let lines: Vec<&str> = content
            .lines()
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();

        let mut entries = Vec::new();
        let mut current: Option<SubtitleEntry> = None;
        let mut text_lines: Vec<&str> = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let header = lines[i].trim().parse::<usize>().ok().and_then(|seq| {
                let caps = TIMESTAMP_REGEX.captures(lines.get(i + 1)?.trim())?;
                Some((seq, caps))
            });

            match header {
                Some((seq_num, caps)) => {
                    if let Some(entry) = current.take() {
                        entries.push(Self::finish_entry(entry, &text_lines));
                    }
                    text_lines.clear();
                    let start = Self::parse_timestamp_to_ms(&caps, 1)?;
                    let end = Self::parse_timestamp_to_ms(&caps, 5)?;
                    current = Some(SubtitleEntry::new(seq_num, start, end, String::new()));
                    i += 2;
                }
                None => {
                    if current.is_some() {
                        text_lines.push(lines[i]);
                    } else if !lines[i].trim().is_empty() {
                        warn!("Unexpected text at line {} before first subtitle: {}", i + 1, lines[i]);
                    }
                    i += 1;
                }
            }
        }
        if let Some(entry) = current {
            entries.push(Self::finish_entry(entry, &text_lines));
        }

        if entries.is_empty() && !content.trim().is_empty() {
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }
        Ok(entries)
    }

    fn finish_entry(mut entry: SubtitleEntry, text_lines: &[&str]) -> SubtitleEntry {
        let mut end = text_lines.len();
        while end > 0 && text_lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        entry.text = text_lines[..end].join("\n");
        entry
    }

    /// Parse timestamp to milliseconds
    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> Result<u64> {
        let part = |offset: usize| -> Result<u64> {
            caps.get(start_idx + offset)
                .ok_or_else(|| anyhow!("Missing timestamp component"))?
                .as_str()
                .parse::<u64>()
                .context("Invalid timestamp component")
        };
        Ok((part(0)? * 3600 + part(1)? * 60 + part(2)?) * 1000 + part(3)?)
    }
}
