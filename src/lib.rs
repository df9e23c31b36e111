//! signalminer - Early-stage startup growth-signal miner
//!
//! Asks a text-generation API for promising early-stage startups, coerces
//! the free-form answer into typed records, scores them, and serves them
//! ranked and filterable.
//!
//! # Architecture
//!
//! The system is a fetch → parse → score → present pipeline:
//! - One request per scan, through an injected [`adapters::TextGenerator`]
//! - Two-tier parsing: JSON block first, labelled prose second
//! - Every field defaulted, every record scored and timestamped
//! - A curated fallback catalog whenever live data is unavailable
//!
//! # Modules
//!
//! - `adapters`: External text-generation services (Perplexity)
//! - `core`: Parser, Formatter, Scorer, Filter, Orchestrator
//! - `domain`: Data structures (SignalRecord, fallback catalog, summaries)
//! - `store`: Optional SQLite persistence
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Scan and show high scorers
//! signalminer scan --min-score 80
//!
//! # Replay a saved response
//! signalminer parse --input response.txt
//!
//! # Aggregates over stored scans
//! signalminer trends --days 30
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod store;

// Re-export main types at crate root for convenience
pub use adapters::{AdapterError, PerplexityClient, TextGenerator};
pub use crate::core::{
    filter_signals, format_signals, growth_score, Orchestrator, ResponseParser, ScanReport,
    ScanSource, SignalFilter,
};
pub use domain::{RawMapping, SignalField, SignalRecord, SignalSummary};
pub use store::{SignalStore, TrendReport};
