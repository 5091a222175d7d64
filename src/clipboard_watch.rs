/*!
 * Clipboard watcher feeding the manual block file.
 *
 * Polls the system clipboard on an interval and appends every new snapshot
 * to the manual file as a `>` block. The first non-empty snapshot only primes
 * the watcher, so whatever was on the clipboard before the session starts is
 * not captured. Ctrl+C stops the loop.
 *
 * Clipboard bytes are decoded with a preferred encoding first, then with
 * UTF-8, UTF-16LE, Shift_JIS and Mac Roman in turn, and only then lossily.
 */

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use encoding_rs::{Encoding, MACINTOSH, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8};
use log::{debug, info, warn};
use tokio::process::Command;

use crate::app_config::ClipboardCommand;
use crate::file_utils::FileManager;
use crate::manual_blocks;

/// Characters of a block shown in log lines
const PREVIEW_CHARS: usize = 60;

/// Anything that can hand over the current clipboard text
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    /// Read the current clipboard contents
    async fn read(&self) -> Result<String>;
}

/// Clipboard read through an external program (pbpaste, wl-paste, xclip)
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
    decoder: ClipboardDecoder,
}

impl CommandClipboard {
    pub fn new(command: &ClipboardCommand, decoder: ClipboardDecoder) -> Self {
        Self {
            program: command.program.clone(),
            args: command.args.clone(),
            decoder,
        }
    }

    /// Pick a reader for the current platform and display server
    pub fn detect(decoder: ClipboardDecoder) -> Self {
        let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
            ("pbpaste", &[])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            ("wl-paste", &["--no-newline"])
        } else {
            ("xclip", &["-selection", "clipboard", "-o"])
        };
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            decoder,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl ClipboardSource for CommandClipboard {
    async fn read(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .with_context(|| format!("Failed to run clipboard command '{}'", self.program))?;

        if !output.status.success() {
            return Err(anyhow!(
                "Clipboard command '{}' exited with {}",
                self.program,
                output.status
            ));
        }
        Ok(self.decoder.decode(&output.stdout))
    }
}

/// Look up an encoding by WHATWG label or common codec name
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes()).or_else(|| match label.to_ascii_lowercase().as_str() {
        "utf-16-le" | "utf_16_le" => Some(UTF_16LE),
        "utf-16-be" | "utf_16_be" => Some(UTF_16BE),
        "mac_roman" | "mac-roman" | "macroman" => Some(MACINTOSH),
        "sjis" | "shift-jis" => Some(SHIFT_JIS),
        _ => None,
    })
}

fn fallback_encodings() -> [&'static Encoding; 4] {
    [UTF_8, UTF_16LE, SHIFT_JIS, MACINTOSH]
}

/// Turns raw clipboard bytes into text
#[derive(Debug, Clone, Copy)]
pub struct ClipboardDecoder {
    preferred: &'static Encoding,
}

impl Default for ClipboardDecoder {
    fn default() -> Self {
        Self { preferred: UTF_8 }
    }
}

impl ClipboardDecoder {
    pub fn new(label: &str) -> Result<Self> {
        let preferred = resolve_encoding(label).ok_or_else(|| anyhow!("Unknown clipboard encoding '{}'", label))?;
        Ok(Self { preferred })
    }

    pub fn preferred(&self) -> &'static Encoding {
        self.preferred
    }

    /// Decode with the preferred encoding, then the fallbacks, then lossily
    pub fn decode(&self, raw: &[u8]) -> String {
        if let Some(text) = strict_decode(self.preferred, raw) {
            return text;
        }
        for fallback in fallback_encodings() {
            if fallback == self.preferred {
                continue;
            }
            // Almost any even-length input is valid UTF-16
            if fallback == UTF_16LE && !looks_like_utf16le(raw) {
                continue;
            }
            if let Some(text) = strict_decode(fallback, raw) {
                info!("Clipboard decoded with fallback encoding {}", fallback.name());
                return text;
            }
        }
        warn!(
            "Clipboard contents are not valid {}; invalid bytes replaced",
            self.preferred.name()
        );
        let (text, _) = self.preferred.decode_without_bom_handling(raw);
        text.into_owned()
    }
}

fn strict_decode(encoding: &'static Encoding, raw: &[u8]) -> Option<String> {
    let bytes = if encoding == UTF_8 {
        raw.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(raw)
    } else if encoding == UTF_16LE {
        raw.strip_prefix(&[0xFF, 0xFE][..]).unwrap_or(raw)
    } else {
        raw
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

// BOM, or a zero high byte from ASCII-range text
fn looks_like_utf16le(raw: &[u8]) -> bool {
    raw.len() % 2 == 0 && (raw.starts_with(&[0xFF, 0xFE]) || raw.iter().skip(1).step_by(2).any(|b| *b == 0))
}

/// What one poll did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Nothing new on the clipboard
    Unchanged,
    /// First snapshot seen and remembered, not appended
    Primed(String),
    /// Block line to append
    Append(String),
}

/// Pure change detector for clipboard snapshots
#[derive(Debug, Default, Clone)]
pub struct ClipboardWatcher {
    primed: bool,
    last: String,
}

impl ClipboardWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one snapshot and decide what to do with it
    pub fn observe(&mut self, snapshot: &str) -> WatchEvent {
        if snapshot.trim().is_empty() {
            return WatchEvent::Unchanged;
        }
        if !self.primed {
            self.primed = true;
            self.last = snapshot.to_string();
            return WatchEvent::Primed(head_line(snapshot));
        }
        if snapshot == self.last {
            return WatchEvent::Unchanged;
        }
        self.last = snapshot.to_string();
        match manual_blocks::as_block(snapshot) {
            Some(block) => WatchEvent::Append(block),
            None => WatchEvent::Unchanged,
        }
    }
}

/// Poll loop writing new clipboard blocks to a manual file
pub struct ClipboardSession<S: ClipboardSource> {
    source: S,
    output: PathBuf,
    watcher: ClipboardWatcher,
    appended: usize,
}

impl<S: ClipboardSource> ClipboardSession<S> {
    pub fn new<P: AsRef<Path>>(source: S, output: P) -> Self {
        Self {
            source,
            output: output.as_ref().to_path_buf(),
            watcher: ClipboardWatcher::new(),
            appended: 0,
        }
    }

    /// Blocks appended so far
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Read the clipboard once and append if something new arrived
    pub async fn poll_once(&mut self) -> Result<WatchEvent> {
        let snapshot = match self.source.read().await {
            Ok(text) => text,
            Err(e) => {
                debug!("Clipboard read failed: {:#}", e);
                return Ok(WatchEvent::Unchanged);
            }
        };

        let event = self.watcher.observe(&snapshot);
        match &event {
            WatchEvent::Primed(head) => info!("Initial clipboard (not added): {}", head),
            WatchEvent::Append(block) => {
                FileManager::append_line(&self.output, block)?;
                self.appended += 1;
                info!("Added: {}", head_line(block));
            }
            WatchEvent::Unchanged => {}
        }
        Ok(event)
    }

    /// Poll every `interval` until `shutdown` resolves
    pub async fn run<F>(&mut self, interval: Duration, shutdown: F) -> Result<usize>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.poll_once().await?;
                }
            }
        }

        Ok(self.appended)
    }
}

fn head_line(text: &str) -> String {
    text.trim()
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}
