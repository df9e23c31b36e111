//! Validation and formatting: raw mappings to ranked signal records.
//!
//! This is the only boundary between untyped extraction output and
//! [`SignalRecord`]. Every text field is defaulted, the score is taken from
//! the source or computed, the capture timestamp is stamped, and the result
//! is stably sorted by score, highest first.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::signal::{RawMapping, SignalField, SignalRecord};

use super::scorer::{clamp_score, growth_score};

/// Format entries captured now
pub fn format_signals<I>(entries: I) -> Vec<SignalRecord>
where
    I: IntoIterator<Item = Value>,
{
    format_signals_at(entries, Utc::now())
}

/// Format raw mappings captured now
pub fn format_mappings(mappings: Vec<RawMapping>) -> Vec<SignalRecord> {
    format_signals(mappings.into_iter().map(Value::Object))
}

/// Format entries with an explicit capture time.
///
/// Entries that are not JSON objects are skipped. All records of one call
/// share the same timestamp.
pub fn format_signals_at<I>(entries: I, captured_at: DateTime<Utc>) -> Vec<SignalRecord>
where
    I: IntoIterator<Item = Value>,
{
    let mut records: Vec<SignalRecord> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(mapping) => Some(validate_entry(&mapping, captured_at)),
            _ => None,
        })
        .collect();

    // sort_by is stable: equal scores keep extraction order
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records
}

/// Build one record from a mapping
pub fn validate_entry(mapping: &RawMapping, captured_at: DateTime<Utc>) -> SignalRecord {
    let text = |field: SignalField| text_field(mapping, field);

    let sector = text(SignalField::Sector);
    let funding_stage = text(SignalField::FundingStage);
    let signal_type = text(SignalField::SignalType);

    let score = mapping
        .get("score")
        .and_then(source_score)
        .unwrap_or_else(|| growth_score(&funding_stage, &signal_type, &sector));

    SignalRecord {
        name: text(SignalField::Name),
        description: text(SignalField::Description),
        growth_reason: text(SignalField::GrowthReason),
        source_link: text(SignalField::SourceLink),
        sector,
        funding_stage,
        signal_type,
        score,
        timestamp: captured_at,
    }
}

/// Source value as text, or the field default when absent or blank.
///
/// Numbers and booleans are rendered as text; nulls, arrays and objects
/// count as absent.
fn text_field(mapping: &RawMapping, field: SignalField) -> String {
    match mapping.get(field.key()) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => field.default_value().to_string(),
    }
}

/// Score supplied by the source, clamped into range.
///
/// Accepts integers, floats (rounded) and numeric strings. Anything else
/// means the source gave no usable score.
fn source_score(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(clamp_score),
        Value::String(s) => {
            let s = s.trim();
            let parsed = s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
            });
            parsed.map(clamp_score)
        }
        _ => None,
    }
}
