/*!
 * Segment classification.
 *
 * Separates subtitle-bearing segments from transition and effect noise. A
 * decision depends only on the segment's own name, duration and kind plus the
 * filter configuration, never on its neighbours.
 */

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::timeline::Segment;

/// Transition names as they appear in English and Japanese editor installs
pub const DEFAULT_DENYLIST: &[&str] = &[
    "カラーディップ",
    "クロスディゾルブ",
    "ディゾルブ",
    "ディップ",
    "Transition",
    "Dip",
    "Dissolve",
    "Cross Dissolve",
];

/// Default short-segment threshold in seconds
pub const DEFAULT_MIN_DURATION_SECS: f64 = 0.6;

/// Names with fewer distinct characters than this count as generic
const GENERIC_NAME_DISTINCT_CHARS: usize = 6;

/// Why a segment was left out of the subtitle sequence
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    /// Name contains a denylisted pattern
    Denylisted { pattern: String },
    /// Very short segment with a generic name
    ShortDuration { duration_secs: f64 },
    /// Styled segment while styled text is not included
    StyledExcluded,
}

impl IgnoreReason {
    /// True for the effect/transition rules (as opposed to styled exclusion)
    pub fn is_effect(&self) -> bool {
        !matches!(self, Self::StyledExcluded)
    }

    /// Short label for listings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Denylisted { .. } | Self::ShortDuration { .. } => "effect",
            Self::StyledExcluded => "styled",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denylisted { pattern } => write!(f, "name matches '{}'", pattern),
            Self::ShortDuration { duration_secs } => write!(f, "short generic segment ({:.2}s)", duration_secs),
            Self::StyledExcluded => write!(f, "styled text excluded"),
        }
    }
}

/// Outcome of classifying one segment
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDecision {
    Kept,
    Ignored(IgnoreReason),
}

impl FilterDecision {
    pub fn is_kept(&self) -> bool {
        matches!(self, Self::Kept)
    }
}

/// Settings the classifier consults
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Apply the denylist and duration rules; false keeps every effect-like segment
    pub ignore_effects: bool,

    /// Built-in transition names
    pub denylist: Vec<String>,

    /// User-supplied extra patterns
    pub extra_ignore_patterns: Vec<String>,

    /// Segments at or below this length may be noise
    pub min_duration_secs: f64,

    /// Keep styled segments in the sequence
    pub include_styled_text: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_effects: true,
            denylist: default_denylist(),
            extra_ignore_patterns: Vec::new(),
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            include_styled_text: false,
        }
    }
}

/// The built-in denylist as owned strings
pub fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect()
}

/// Compiled form of a `FilterConfig`: lowercase, de-duplicated, non-empty patterns
#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    patterns: Vec<String>,
    ignore_effects: bool,
    min_duration_secs: f64,
    include_styled_text: bool,
}

impl SegmentClassifier {
    pub fn new(config: &FilterConfig) -> Self {
        let mut seen = HashSet::new();
        let patterns = config
            .denylist
            .iter()
            .chain(config.extra_ignore_patterns.iter())
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty() && seen.insert(p.clone()))
            .collect();

        Self {
            patterns,
            ignore_effects: config.ignore_effects,
            min_duration_secs: config.min_duration_secs,
            include_styled_text: config.include_styled_text,
        }
    }

    /// Classify a single segment
    pub fn classify(&self, segment: &Segment) -> FilterDecision {
        if segment.is_styled() && !self.include_styled_text {
            return FilterDecision::Ignored(IgnoreReason::StyledExcluded);
        }
        if !self.ignore_effects {
            return FilterDecision::Kept;
        }

        let lname = segment.name.to_lowercase();
        if let Some(pattern) = self.matching_pattern(&lname) {
            return FilterDecision::Ignored(IgnoreReason::Denylisted {
                pattern: pattern.to_string(),
            });
        }

        let duration_secs = segment.duration_secs();
        if duration_secs <= self.min_duration_secs && is_generic_name(&lname) {
            return FilterDecision::Ignored(IgnoreReason::ShortDuration { duration_secs });
        }

        FilterDecision::Kept
    }

    /// First pattern contained in an already lowercased name
    pub fn matching_pattern(&self, lowercase_name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| lowercase_name.contains(p.as_str()))
            .map(|p| p.as_str())
    }

    /// Split segments into kept and ignored, preserving order within each
    pub fn partition(&self, segments: &[Segment]) -> Classification {
        let mut classification = Classification::default();
        for segment in segments {
            match self.classify(segment) {
                FilterDecision::Kept => classification.kept.push(segment.clone()),
                FilterDecision::Ignored(reason) => {
                    debug!(
                        "Ignoring segment '{}' ({:.3}s-{:.3}s): {}",
                        segment.name, segment.start_secs, segment.end_secs, reason
                    );
                    classification.ignored.push((segment.clone(), reason));
                }
            }
        }
        classification
    }
}

/// Result of classifying a whole track
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Segments that stay in the subtitle sequence
    pub kept: Vec<Segment>,
    /// Segments left out, with the rule that removed them
    pub ignored: Vec<(Segment, IgnoreReason)>,
}

impl Classification {
    pub fn raw_count(&self) -> usize {
        self.kept.len() + self.ignored.len()
    }

    pub fn effect_ignored(&self) -> impl Iterator<Item = &(Segment, IgnoreReason)> {
        self.ignored.iter().filter(|(_, r)| r.is_effect())
    }

    pub fn styled_ignored(&self) -> impl Iterator<Item = &(Segment, IgnoreReason)> {
        self.ignored.iter().filter(|(_, r)| !r.is_effect())
    }
}

/// Classify one segment against a configuration
pub fn classify(segment: &Segment, config: &FilterConfig) -> FilterDecision {
    SegmentClassifier::new(config).classify(segment)
}

// Transition tails tend to carry short, repetitive names
fn is_generic_name(lowercase_name: &str) -> bool {
    let distinct: HashSet<char> = lowercase_name.chars().collect();
    distinct.len() < GENERIC_NAME_DISTINCT_CHARS
}
