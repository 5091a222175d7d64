use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::path::Path;

use crate::app_config::Config;
use crate::classifier::{Classification, SegmentClassifier};
use crate::diagnostics::{self, DiagnosticReport, SegmentSummary};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::manual_blocks::{self, ManualBlock};
use crate::reconciler::{ReconciledEntry, Reconciler, Reconciliation};
use crate::subtitle_processor::{secs_to_ms, SrtOutput, SrtWriter, SubtitleEntry};
use crate::timeline::{Segment, StyledTextSink, TimelineSource};

// @module: Application controller for subtitle reconciliation

/// Characters of subtitle text shown per preview row
const PREVIEW_TEXT_CHARS: usize = 80;

/// Characters of a segment name shown in sampled listings
const SAMPLE_NAME_CHARS: usize = 60;

/// Everything one pass over a track produced
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub raw: Vec<Segment>,
    pub classification: Classification,
    pub blocks: Vec<ManualBlock>,
    pub reconciliation: Reconciliation,
}

impl PipelineRun {
    pub fn report(&self) -> DiagnosticReport {
        diagnostics::diagnose(&self.raw, &self.classification, &self.blocks, &self.reconciliation)
    }
}

/// Result of the `srt` command
#[derive(Debug, Clone)]
pub struct SrtSummary {
    pub output: SrtOutput,
    pub run: PipelineRun,
}

/// Result of the `apply` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub paired: usize,
    pub applied: usize,
    pub styled_segments: usize,
    pub manual_blocks: usize,
}

/// Main application controller; one instance serves one command
pub struct Controller<S> {
    // @field: App configuration
    config: Config,
    // @field: Host timeline access
    source: S,
}

impl<S: TimelineSource> Controller<S> {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, source: S) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config, source })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read and parse a manual block file
    pub fn load_manual(&self, path: &Path) -> Result<Vec<ManualBlock>, AppError> {
        let content = FileManager::read_to_string(path).map_err(|e| AppError::File(format!("{:#}", e)))?;
        let blocks = manual_blocks::parse(&content);
        debug!("Parsed {} manual blocks from {}", blocks.len(), path.display());
        Ok(blocks)
    }

    /// Ordered segments of a track
    pub fn load_track(&self, track: &str) -> Result<Vec<Segment>, AppError> {
        Ok(self.source.segments(track)?)
    }

    /// Video track names
    pub fn tracks(&self) -> Result<Vec<String>> {
        Ok(self.source.video_tracks()?)
    }

    /// Segments of a track split into kept and ignored
    pub fn classify_track(&self, track: &str) -> Result<(Vec<Segment>, Classification)> {
        let raw = self.load_track(track)?;
        let classification = SegmentClassifier::new(&self.config.filter_config()).partition(&raw);
        debug!(
            "Track '{}': {} raw, {} kept, {} ignored",
            track,
            raw.len(),
            classification.kept.len(),
            classification.ignored.len()
        );
        Ok((raw, classification))
    }

    /// Number of subtitle candidate segments on a track
    pub fn count(&self, track: &str) -> Result<usize> {
        let (_, classification) = self.classify_track(track)?;
        Ok(classification.kept.len())
    }

    /// Classify, reconcile and count against already parsed blocks
    pub fn run_with_blocks(&self, track: &str, blocks: Vec<ManualBlock>) -> Result<PipelineRun> {
        let (raw, classification) = self.classify_track(track)?;
        let mut reconciliation =
            Reconciler::new(self.config.output.include_styled_text).reconcile(&classification.kept, &blocks);
        reconciliation.absorb_ignored(classification.ignored.len());
        Ok(PipelineRun {
            raw,
            classification,
            blocks,
            reconciliation,
        })
    }

    /// Full pipeline with blocks read from a manual file
    pub fn run(&self, manual_path: &Path, track: &str) -> Result<PipelineRun> {
        let blocks = self.load_manual(manual_path)?;
        self.run_with_blocks(track, blocks)
    }

    /// Generate an SRT file from a manual file and a track
    pub fn generate_srt(&self, manual_path: &Path, output_path: &Path, track: &str) -> Result<SrtSummary> {
        let run = self.run(manual_path, track)?;
        let output = SrtWriter::new().write(&run.reconciliation.entries);
        output
            .write_to(output_path)
            .with_context(|| format!("Failed to write SRT to {}", output_path.display()))?;

        let counts = &run.reconciliation.counts;
        info!(
            "Wrote {} entries -> {} (manual_used={}/{} styled={})",
            output.written(),
            output_path.display(),
            counts.consumed_manual_count,
            counts.manual_block_count,
            counts.styled_satisfied_count
        );
        if counts.surplus() > 0 {
            warn!("Unused manual blocks: {}", counts.surplus());
        }
        if counts.shortfall() > 0 {
            warn!("Empty subtitle entries: {}", counts.shortfall());
        }
        if !output.skipped.is_empty() {
            warn!("Skipped {} entries with invalid time ranges", output.skipped.len());
        }
        Ok(SrtSummary { output, run })
    }

    /// Diagnostic report for a manual file against a track
    pub fn diagnose(&self, manual_path: &Path, track: &str) -> Result<DiagnosticReport> {
        Ok(self.run(manual_path, track)?.report())
    }

    /// Track statistics without any manual input; no pairing hints apply
    pub fn stats(&self, track: &str) -> Result<DiagnosticReport> {
        let mut report = self.run_with_blocks(track, Vec::new())?.report();
        report.first_misalignment = None;
        report.hint = None;
        Ok(report)
    }

    /// Render the pairing preview; `all` lifts the configured row limit
    pub fn format_preview(&self, run: &PipelineRun, all: bool) -> String {
        let entries = &run.reconciliation.entries;
        let counts = &run.reconciliation.counts;
        let limit = if all {
            entries.len()
        } else {
            entries.len().min(self.config.output.preview_limit)
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "blocks={} segments={} styled={}",
            counts.manual_block_count, counts.kept_count, counts.styled_satisfied_count
        );
        for (i, entry) in entries.iter().take(limit).enumerate() {
            let _ = writeln!(out, "{}", Self::format_entry_row(i + 1, entry));
        }
        if counts.surplus() > 0 || counts.shortfall() > 0 {
            let _ = writeln!(
                out,
                "[warn] mismatch: {} unused blocks, {} empty entries",
                counts.surplus(),
                counts.shortfall()
            );
        }
        out
    }

    /// Render a diagnostic report; `all` prints complete listings
    pub fn format_diagnosis(&self, report: &DiagnosticReport, all: bool) -> String {
        let sample = if all { usize::MAX } else { self.config.output.diagnose_sample };
        let counts = &report.counts;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "blocks={} kept={} ignored={} (effect={} styled={})",
            counts.manual_block_count,
            counts.kept_count,
            counts.ignored_count,
            report.effect_ignored_count,
            report.styled_ignored_count
        );
        let _ = writeln!(
            out,
            "text sources: styled={} manual={} empty={}",
            counts.styled_satisfied_count, counts.manual_satisfied_count, counts.empty_count
        );
        if let Some(m) = &report.first_misalignment {
            let _ = write!(
                out,
                "[info] first misalignment at #{} (blocks={} manual segments={})",
                m.index + 1,
                m.manual_blocks,
                m.manual_consumers
            );
            if let Some(ms) = m.segment_start_ms {
                let _ = write!(out, ": segment at {} has no block", SubtitleEntry::format_timestamp(ms));
            }
            if let Some(text) = &m.block_text {
                let _ = write!(out, ": block '{}' has no segment", one_line(text, SAMPLE_NAME_CHARS));
            }
            let _ = writeln!(out);
        }
        for (i, s) in report.kept.iter().take(sample).enumerate() {
            let _ = writeln!(out, "K {:03} {}", i + 1, Self::format_summary(s));
        }
        for s in report.ignored.iter().take(sample) {
            let _ = writeln!(out, "I {}", Self::format_summary(s));
        }
        if let Some(hint) = report.hint {
            let _ = writeln!(out, "[hint] {}", hint);
        }
        out
    }

    /// Render track statistics with tail samples
    pub fn format_stats(&self, track: &str, report: &DiagnosticReport) -> String {
        let n = self.config.output.tail_sample;
        let counts = &report.counts;

        let mut out = String::new();
        let _ = writeln!(out, "[stats] track='{}' raw_items={}", track, counts.raw_segment_count);
        let _ = writeln!(
            out,
            "[stats] kept={} ignored_effect={} ignored_styled={}",
            counts.kept_count, report.effect_ignored_count, report.styled_ignored_count
        );
        let _ = writeln!(
            out,
            "[stats] styled_raw={} denylist_hits_raw={}",
            report.raw_styled_total, report.raw_denylist_hits
        );

        let effect = |s: &&SegmentSummary| s.reason.as_ref().is_some_and(|r| r.is_effect());
        let sections = [
            ("kept", tail(report.kept.iter().collect(), n)),
            ("ignored effect", tail(report.ignored.iter().filter(effect).collect(), n)),
            ("ignored styled", tail(report.ignored.iter().filter(|s| !effect(s)).collect(), n)),
        ];
        for (label, rows) in sections {
            if rows.is_empty() {
                continue;
            }
            let _ = writeln!(out, "[tail {}] last {}:", label, rows.len());
            for s in rows {
                let _ = writeln!(out, "  {}", Self::format_summary(s));
            }
        }
        out
    }

    fn format_entry_row(index: usize, entry: &ReconciledEntry) -> String {
        format!(
            "{:3} {} -> {} ({:.2}s) | {} || {}",
            index,
            SubtitleEntry::format_timestamp(secs_to_ms(entry.start_secs)),
            SubtitleEntry::format_timestamp(secs_to_ms(entry.end_secs)),
            entry.end_secs - entry.start_secs,
            one_line(&entry.text, PREVIEW_TEXT_CHARS),
            entry.segment_name
        )
    }

    fn format_summary(s: &SegmentSummary) -> String {
        let reason = match &s.reason {
            Some(r) => format!("{:<8} ", r.label()),
            None => String::new(),
        };
        format!(
            "{}{} -> {} {:.2}s | {}",
            reason,
            SubtitleEntry::format_timestamp(secs_to_ms(s.start_secs)),
            SubtitleEntry::format_timestamp(secs_to_ms(s.end_secs)),
            s.duration_secs,
            one_line(&s.name, SAMPLE_NAME_CHARS)
        )
    }
}

impl<S: TimelineSource + StyledTextSink> Controller<S> {
    /// Write manual blocks, in order, into the styled segments of a track
    pub fn apply(&mut self, manual_path: &Path, track: &str) -> Result<ApplySummary> {
        let blocks = self.load_manual(manual_path)?;
        let styled_segments = self.load_track(track)?.iter().filter(|s| s.is_styled()).count();
        if styled_segments == 0 {
            warn!("No styled segments found on track '{}'", track);
        }

        let paired = blocks.len().min(styled_segments);
        let mut applied = 0;
        for (i, block) in blocks.iter().take(paired).enumerate() {
            match self.source.set_styled_text(track, i, &block.text()) {
                Ok(()) => applied += 1,
                Err(e) => warn!("Could not apply block {}: {}", i + 1, e),
            }
        }
        self.source.commit()?;

        info!("Applied {}/{} blocks to styled segments", applied, paired);
        Ok(ApplySummary {
            paired,
            applied,
            styled_segments,
            manual_blocks: blocks.len(),
        })
    }
}

/// Check that an output path can be written before doing any work
pub fn ensure_output_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => FileManager::ensure_dir(parent),
        None => Ok(()),
    }
}

fn tail<T>(items: Vec<T>, n: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(n);
    items.into_iter().skip(skip).collect()
}

// Single-line, char-bounded rendering of multi-line text
fn one_line(text: &str, max_chars: usize) -> String {
    text.replace('\n', " / ").chars().take(max_chars).collect()
}
