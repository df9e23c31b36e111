//! Domain types for the signal miner.
//!
//! This module contains the core data structures:
//! - Signal: typed records, raw mappings and field defaults
//! - Catalog: curated fallback signals
//! - Summary: aggregates over record sets

pub mod catalog;
pub mod signal;
pub mod summary;

// Re-export commonly used types
pub use catalog::{fallback_mappings, CatalogEntry, FALLBACK_CATALOG};
pub use signal::{RawMapping, SignalField, SignalRecord, DEFAULT_SCORE, MAX_SCORE};
pub use summary::{SignalSummary, HIGH_SCORE_THRESHOLD};
