/*!
 * Manual subtitle block format.
 *
 * A manual file is plain UTF-8 text where every line whose first
 * non-whitespace character is `>` opens a new block:
 *
 * ```text
 * >First subtitle
 * >Second subtitle
 * continued on a second line
 * ```
 *
 * Lines before the first marker are discarded, and blocks with no visible
 * text are dropped.
 */

use std::fmt;

/// Character that opens a block
pub const BLOCK_MARKER: char = '>';

/// One user-authored subtitle unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualBlock {
    // @field: Lines in authoring order, the marker already stripped from the first
    pub lines: Vec<String>,
}

impl ManualBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Display text: lines joined with newlines, outer whitespace trimmed
    pub fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

impl fmt::Display for ManualBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", BLOCK_MARKER, self.text())
    }
}

/// Parse a manual buffer into blocks
pub fn parse(buffer: &str) -> Vec<ManualBlock> {
    let mut blocks: Vec<ManualBlock> = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for raw in buffer.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = line.trim_start().strip_prefix(BLOCK_MARKER) {
            if let Some(lines) = current.take() {
                blocks.push(ManualBlock::new(lines));
            }
            current = Some(vec![rest.trim_start().to_string()]);
        } else if let Some(lines) = current.as_mut() {
            lines.push(line.to_string());
        }
    }
    if let Some(lines) = current {
        blocks.push(ManualBlock::new(lines));
    }

    blocks.retain(|b| !b.is_blank());
    blocks
}

/// Serialize blocks back to the manual format
pub fn to_manual_text(blocks: &[ManualBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&block.to_string());
        out.push('\n');
    }
    out
}

/// Turn one clipboard snapshot into a block line ready to append
pub fn as_block(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with(BLOCK_MARKER) {
        Some(trimmed.to_string())
    } else {
        Some(format!("{}{}", BLOCK_MARKER, trimmed))
    }
}
