//! Response parsing: free text to raw mappings.
//!
//! Generated answers are unreliable, so extraction is a chain of
//! strategies tried in order. The first one that returns `Ok` wins, even
//! when it found nothing. Strategies that fail are recorded so the caller
//! can log why a fallthrough happened.
//!
//! Standard chain:
//! 1. [`JsonBlockStrategy`]: first `[` to last `]`, decoded as a JSON array
//! 2. [`LooseTextStrategy`]: list blocks with `Name: ...` style labels

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::signal::{
    RawMapping, SignalField, DEFAULT_FUNDING_STAGE, DEFAULT_SCORE, DEFAULT_SECTOR,
    DEFAULT_SIGNAL_TYPE, DEFAULT_SOURCE_LINK,
};

/// Why a strategy could not produce mappings
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("no bracketed block found in response")]
    NoStructuredBlock,

    #[error("bracketed block is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("bracketed block decoded to a non-array value")]
    NotAnArray,
}

/// Converts response text into raw mappings
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract mappings, or explain why this strategy does not apply
    fn extract(&self, text: &str) -> Result<Vec<RawMapping>, ParseFailure>;
}

/// Decodes the widest `[ ... ]` span of the text as a JSON array.
///
/// Array elements that are not objects are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBlockStrategy;

impl JsonBlockStrategy {
    /// First `[` through the last `]`, if they are in that order
    pub fn find_block(text: &str) -> Option<&str> {
        let start = text.find('[')?;
        let end = text.rfind(']')?;
        if end < start {
            return None;
        }
        text.get(start..=end)
    }
}

impl ExtractionStrategy for JsonBlockStrategy {
    fn name(&self) -> &'static str {
        "json_block"
    }

    fn extract(&self, text: &str) -> Result<Vec<RawMapping>, ParseFailure> {
        let block = Self::find_block(text).ok_or(ParseFailure::NoStructuredBlock)?;

        match serde_json::from_str::<Value>(block)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(mapping) => Some(mapping),
                    _ => None,
                })
                .collect()),
            _ => Err(ParseFailure::NotAnArray),
        }
    }
}

// Entry boundaries: a newline followed by "12.", a bullet, or a hyphen
static ENTRY_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\d+\.|\n•|\n-").unwrap());

static NAME_LABEL: LazyLock<Regex> = LazyLock::new(|| label_pattern("Name"));
static DESCRIPTION_LABEL: LazyLock<Regex> = LazyLock::new(|| label_pattern("Description"));
static REASON_LABEL: LazyLock<Regex> = LazyLock::new(|| label_pattern("Reason"));
static SOURCE_LABEL: LazyLock<Regex> = LazyLock::new(|| label_pattern("Source"));

fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){}[:\s]+([^\n]+)", label)).unwrap()
}

/// Placeholder description for loose entries without one
pub const LOOSE_DESCRIPTION: &str = "No description";

/// Placeholder growth reason for loose entries without one
pub const LOOSE_GROWTH_REASON: &str = "Growth potential detected";

/// Label-based extraction from numbered or bulleted prose.
///
/// A block becomes a mapping only when it carries a `Name` label. Category
/// fields and the score are not present in this format and get fixed
/// placeholder values. Never fails; an empty result is still `Ok`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LooseTextStrategy;

impl LooseTextStrategy {
    fn extract_block(block: &str) -> Option<RawMapping> {
        let name = capture(&NAME_LABEL, block)?;

        let mut mapping = RawMapping::new();
        let mut put = |field: SignalField, value: &str| {
            mapping.insert(field.key().to_string(), Value::String(value.to_string()));
        };

        put(SignalField::Name, name);
        put(
            SignalField::Description,
            capture(&DESCRIPTION_LABEL, block).unwrap_or(LOOSE_DESCRIPTION),
        );
        put(
            SignalField::GrowthReason,
            capture(&REASON_LABEL, block).unwrap_or(LOOSE_GROWTH_REASON),
        );
        put(
            SignalField::SourceLink,
            capture(&SOURCE_LABEL, block).unwrap_or(DEFAULT_SOURCE_LINK),
        );
        put(SignalField::Sector, DEFAULT_SECTOR);
        put(SignalField::FundingStage, DEFAULT_FUNDING_STAGE);
        put(SignalField::SignalType, DEFAULT_SIGNAL_TYPE);

        mapping.insert("score".to_string(), Value::from(DEFAULT_SCORE));
        Some(mapping)
    }
}

fn capture<'t>(pattern: &Regex, block: &'t str) -> Option<&'t str> {
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

impl ExtractionStrategy for LooseTextStrategy {
    fn name(&self) -> &'static str {
        "loose_text"
    }

    fn extract(&self, text: &str) -> Result<Vec<RawMapping>, ParseFailure> {
        Ok(ENTRY_BOUNDARY
            .split(text)
            .filter(|block| !block.trim().is_empty())
            .filter_map(Self::extract_block)
            .collect())
    }
}

/// Result of running the strategy chain
#[derive(Debug, Default)]
pub struct ParsedResponse {
    /// Extracted mappings (possibly empty)
    pub mappings: Vec<RawMapping>,

    /// Strategy that produced the mappings, `None` if every strategy failed
    pub strategy: Option<&'static str>,

    /// Strategies that failed before the winning one, in order
    pub fallthroughs: Vec<(&'static str, ParseFailure)>,
}

impl ParsedResponse {
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Log each failed strategy at debug level
    pub fn log_fallthroughs(&self) {
        for (strategy, failure) in &self.fallthroughs {
            debug!(strategy, error = %failure, "Extraction strategy fell through");
        }
    }
}

/// Ordered chain of extraction strategies
pub struct ResponseParser {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    /// Standard chain: JSON block, then loose text
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(JsonBlockStrategy),
            Box::new(LooseTextStrategy),
        ])
    }

    /// Custom chain
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain. Never fails; worst case is an empty result.
    pub fn parse(&self, text: &str) -> ParsedResponse {
        let mut fallthroughs = Vec::new();

        for strategy in &self.strategies {
            match strategy.extract(text) {
                Ok(mappings) => {
                    return ParsedResponse {
                        mappings,
                        strategy: Some(strategy.name()),
                        fallthroughs,
                    };
                }
                Err(failure) => fallthroughs.push((strategy.name(), failure)),
            }
        }

        ParsedResponse {
            mappings: Vec::new(),
            strategy: None,
            fallthroughs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_block_spans_first_to_last_bracket() {
        let text = "a [1] b [2] c";
        assert_eq!(JsonBlockStrategy::find_block(text), Some("[1] b [2]"));
        assert_eq!(JsonBlockStrategy::find_block("] before ["), None);
        assert_eq!(JsonBlockStrategy::find_block("no brackets"), None);
    }

    #[test]
    fn test_json_block_drops_non_objects() {
        let text = r#"[{"name": "A"}, 3, "x", null, {"name": "B"}]"#;
        let mappings = JsonBlockStrategy.extract(text).unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[1]["name"], "B");
    }

    #[test]
    fn test_json_block_errors() {
        assert!(matches!(
            JsonBlockStrategy.extract("nothing here"),
            Err(ParseFailure::NoStructuredBlock)
        ));
        assert!(matches!(
            JsonBlockStrategy.extract("[not json]"),
            Err(ParseFailure::Decode(_))
        ));
    }

    #[test]
    fn test_loose_block_requires_name() {
        let text = "1. Description: widgets only\n2. Name: Beta\nReason: hiring";
        let mappings = LooseTextStrategy.extract(text).unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0]["name"], "Beta");
        assert_eq!(mappings[0]["growth_reason"], "hiring");
        assert_eq!(mappings[0]["description"], LOOSE_DESCRIPTION);
    }

    #[test]
    fn test_loose_labels_are_case_insensitive() {
        let text = "intro\n- NAME: Gamma\n  source: https://gamma.io\n";
        let mappings = LooseTextStrategy.extract(text).unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0]["name"], "Gamma");
        assert_eq!(mappings[0]["source_link"], "https://gamma.io");
        assert_eq!(mappings[0]["score"], 75);
    }

    #[test]
    fn test_chain_records_fallthrough() {
        let parsed = ResponseParser::new().parse("1. Name: Acme");
        assert_eq!(parsed.strategy, Some("loose_text"));
        assert_eq!(parsed.fallthroughs.len(), 1);
        assert_eq!(parsed.fallthroughs[0].0, "json_block");
        assert_eq!(parsed.mappings.len(), 1);
    }

    #[test]
    fn test_empty_array_is_accepted() {
        let parsed = ResponseParser::new().parse("[]\n1. Name: Ignored");
        assert_eq!(parsed.strategy, Some("json_block"));
        assert!(parsed.is_empty());
        assert!(parsed.fallthroughs.is_empty());
    }

    #[test]
    fn test_chain_with_no_strategies() {
        let parsed = ResponseParser::with_strategies(Vec::new()).parse("[1]");
        assert!(parsed.strategy.is_none());
        assert!(parsed.is_empty());
    }
}
