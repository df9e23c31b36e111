//! Core pipeline logic.
//!
//! This module contains:
//! - Parser: response text to raw mappings
//! - Formatter: raw mappings to ranked records
//! - Scorer: heuristic growth score
//! - Filter: record filtering
//! - Orchestrator: one scan, with fallback

pub mod filter;
pub mod formatter;
pub mod orchestrator;
pub mod parser;
pub mod scorer;

// Re-export commonly used types
pub use filter::{filter_signals, unique_values, SignalFilter, NO_FILTER};
pub use formatter::{format_mappings, format_signals, format_signals_at, validate_entry};
pub use orchestrator::{
    FallbackReason, Orchestrator, ScanReport, ScanSettings, ScanSource, SCAN_PROMPT, SYSTEM_PROMPT,
};
pub use parser::{
    ExtractionStrategy, JsonBlockStrategy, LooseTextStrategy, ParseFailure, ParsedResponse,
    ResponseParser,
};
pub use scorer::{clamp_score, growth_score, Rule, ScoringRules, STANDARD_RULES};
