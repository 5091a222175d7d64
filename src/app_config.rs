/*!
 * Application configuration.
 *
 * Loads, validates and creates the JSON configuration file. Command line
 * flags are applied on top of the loaded values by the binary.
 */

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::classifier::{default_denylist, FilterConfig, DEFAULT_MIN_DURATION_SECS};
use crate::clipboard_watch::resolve_encoding;
use crate::file_utils::FileManager;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Segment filtering
    #[serde(default)]
    pub filter: FilterSettings,

    /// Pairing and report output
    #[serde(default)]
    pub output: OutputSettings,

    /// Clipboard watcher
    #[serde(default)]
    pub watch: WatchSettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Effect and transition filtering
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FilterSettings {
    /// Drop transition/effect segments
    #[serde(default = "default_true")]
    pub ignore_effects: bool,

    /// Segments at or below this length (seconds) with generic names are dropped
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: f64,

    /// Built-in transition names, matched case-insensitively as substrings
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Extra substrings to ignore
    #[serde(default)]
    pub extra_ignore_patterns: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            ignore_effects: true,
            min_duration_secs: default_min_duration_secs(),
            denylist: default_denylist(),
            extra_ignore_patterns: Vec::new(),
        }
    }
}

/// Output and listing settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputSettings {
    /// Use readable styled text and keep styled segments in the sequence
    #[serde(default)]
    pub include_styled_text: bool,

    /// Rows shown by `preview` without --all
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    /// Rows per list shown by `diagnose` without --all
    #[serde(default = "default_diagnose_sample")]
    pub diagnose_sample: usize,

    /// Rows per list shown by `stats`
    #[serde(default = "default_tail_sample")]
    pub tail_sample: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            include_styled_text: false,
            preview_limit: default_preview_limit(),
            diagnose_sample: default_diagnose_sample(),
            tail_sample: default_tail_sample(),
        }
    }
}

/// External command used to read the clipboard
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClipboardCommand {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

/// Clipboard watcher settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WatchSettings {
    /// Polling interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Clipboard reader override; auto-detected when absent
    #[serde(default)]
    pub clipboard_command: Option<ClipboardCommand>,

    /// Preferred clipboard encoding label (e.g. "utf-8", "shift_jis")
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            clipboard_command: None,
            encoding: default_encoding(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_duration_secs() -> f64 {
    DEFAULT_MIN_DURATION_SECS
}

fn default_preview_limit() -> usize {
    30
}

fn default_diagnose_sample() -> usize {
    10
}

fn default_tail_sample() -> usize {
    5
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl Config {
    /// Load the configuration file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let min = self.filter.min_duration_secs;
        if !min.is_finite() || min < 0.0 {
            return Err(anyhow!("min_duration_secs must be a non-negative number, got {}", min));
        }
        if self.watch.interval_ms == 0 {
            return Err(anyhow!("watch.interval_ms must be greater than zero"));
        }
        if self.output.preview_limit == 0 {
            return Err(anyhow!("output.preview_limit must be greater than zero"));
        }
        if resolve_encoding(&self.watch.encoding).is_none() {
            return Err(anyhow!("watch.encoding '{}' is not a known encoding", self.watch.encoding));
        }
        if let Some(cmd) = &self.watch.clipboard_command {
            if cmd.program.trim().is_empty() {
                return Err(anyhow!("watch.clipboard_command.program must not be empty"));
            }
        }
        Ok(())
    }

    /// Apply `watch` command flags and re-validate
    pub fn override_watch(&mut self, interval_secs: Option<f64>, encoding: Option<String>) -> Result<()> {
        if let Some(secs) = interval_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(anyhow!("--interval must be a positive number of seconds, got {}", secs));
            }
            self.watch.interval_ms = ((secs * 1000.0).round() as u64).max(1);
        }
        if let Some(label) = encoding {
            self.watch.encoding = label;
        }
        self.validate().context("Configuration validation failed")
    }

    /// Classifier settings derived from this configuration
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            ignore_effects: self.filter.ignore_effects,
            denylist: self.filter.denylist.clone(),
            extra_ignore_patterns: self.filter.extra_ignore_patterns.clone(),
            min_duration_secs: self.filter.min_duration_secs,
            include_styled_text: self.output.include_styled_text,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            filter: FilterSettings::default(),
            output: OutputSettings::default(),
            watch: WatchSettings::default(),
            log_level: LogLevel::default(),
        }
    }
}
