/*!
 * # subweave - manual subtitle blocks woven onto an editing timeline
 *
 * A Rust library for turning hand-written subtitle text into SRT timed by the
 * text segments of a video editing timeline.
 *
 * ## Features
 *
 * - Parse `>`-prefixed manual subtitle blocks
 * - Filter transition and effect segments out of a track:
 *   - built-in multi-language denylist plus user patterns
 *   - short generic-named segment heuristic
 * - Pair segments with text, preferring readable styled text when enabled
 * - Explain block/segment count mismatches
 * - Write SRT, or write blocks back into styled segments
 * - Collect blocks from the clipboard while subtitling
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timeline`: segment model and the host timeline traits:
 *   - `timeline::json_export`: timeline export file source
 *   - `timeline::memory`: in-memory source
 * - `classifier`: keep/ignore decisions for segments
 * - `manual_blocks`: manual block parsing and rendering
 * - `rich_text`: styled segment text extraction
 * - `reconciler`: segment/text pairing
 * - `diagnostics`: mismatch reports and track statistics
 * - `subtitle_processor`: SRT rendering and parsing
 * - `clipboard_watch`: clipboard polling into a manual file
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod classifier;
pub mod clipboard_watch;
pub mod diagnostics;
pub mod errors;
pub mod file_utils;
pub mod manual_blocks;
pub mod reconciler;
pub mod rich_text;
pub mod subtitle_processor;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use classifier::{FilterConfig, FilterDecision, IgnoreReason, SegmentClassifier};
pub use errors::{AppError, SubtitleError, TimelineError};
pub use manual_blocks::ManualBlock;
pub use reconciler::{DiagnosticCounts, ReconciledEntry, Reconciler};
pub use subtitle_processor::{SrtWriter, SubtitleCollection, SubtitleEntry};
pub use timeline::{Segment, SegmentKind, StyledTextSink, TimelineSource};
