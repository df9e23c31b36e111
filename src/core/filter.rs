//! Record filtering and filter-choice helpers.
//!
//! Filtering never mutates its input: it returns a new sequence holding
//! copies of the surviving records, in their original order.

use std::collections::BTreeSet;

use crate::domain::signal::{SignalField, SignalRecord};

/// Criterion value that disables a category filter
pub const NO_FILTER: &str = "All";

/// Composable record filter (all criteria are ANDed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalFilter {
    pub sector: Option<String>,
    pub funding_stage: Option<String>,
    pub signal_type: Option<String>,
    pub min_score: u8,
}

impl SignalFilter {
    /// A filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_funding_stage(mut self, funding_stage: impl Into<String>) -> Self {
        self.funding_stage = Some(funding_stage.into());
        self
    }

    pub fn with_signal_type(mut self, signal_type: impl Into<String>) -> Self {
        self.signal_type = Some(signal_type.into());
        self
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    /// True when no criterion would reject anything
    pub fn is_noop(&self) -> bool {
        active(&self.sector).is_none()
            && active(&self.funding_stage).is_none()
            && active(&self.signal_type).is_none()
            && self.min_score == 0
    }

    /// Check one record against every criterion
    pub fn matches(&self, record: &SignalRecord) -> bool {
        category_matches(&self.sector, &record.sector)
            && category_matches(&self.funding_stage, &record.funding_stage)
            && category_matches(&self.signal_type, &record.signal_type)
            && record.score >= self.min_score
    }

    /// Surviving records, in input order
    pub fn apply(&self, records: &[SignalRecord]) -> Vec<SignalRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// Positional form of [`SignalFilter::apply`]
pub fn filter_signals(
    records: &[SignalRecord],
    sector: Option<&str>,
    funding_stage: Option<&str>,
    signal_type: Option<&str>,
    min_score: u8,
) -> Vec<SignalRecord> {
    SignalFilter {
        sector: sector.map(str::to_string),
        funding_stage: funding_stage.map(str::to_string),
        signal_type: signal_type.map(str::to_string),
        min_score,
    }
    .apply(records)
}

/// Sorted distinct non-empty values of a field, for building filter choices
pub fn unique_values(records: &[SignalRecord], field: SignalField) -> Vec<String> {
    records
        .iter()
        .map(|record| record.field(field))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn active(criterion: &Option<String>) -> Option<&str> {
    criterion
        .as_deref()
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(NO_FILTER))
}

fn category_matches(criterion: &Option<String>, value: &str) -> bool {
    match active(criterion) {
        Some(wanted) => wanted.to_lowercase() == value.to_lowercase(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(name: &str, sector: &str, stage: &str, signal: &str, score: u8) -> SignalRecord {
        SignalRecord {
            name: name.to_string(),
            description: String::new(),
            growth_reason: String::new(),
            source_link: String::new(),
            sector: sector.to_string(),
            funding_stage: stage.to_string(),
            signal_type: signal.to_string(),
            score,
            timestamp: Utc::now(),
        }
    }

    fn sample() -> Vec<SignalRecord> {
        vec![
            record("a", "Fintech", "Seed", "Funding", 90),
            record("b", "Retail", "Seed", "Partnership", 80),
            record("c", "fintech", "Series A", "Funding", 60),
        ]
    }

    #[test]
    fn test_case_insensitive_exact_match() {
        let records = sample();
        let names: Vec<_> = SignalFilter::new()
            .with_sector("FINTECH")
            .apply(&records)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);

        // Exact, not substring
        assert!(SignalFilter::new().with_sector("Fin").apply(&records).is_empty());
    }

    #[test]
    fn test_sentinel_disables_criterion() {
        let records = sample();
        let filter = SignalFilter::new().with_sector(NO_FILTER).with_signal_type("");
        assert!(filter.is_noop());
        assert_eq!(filter.apply(&records), records);
    }

    #[test]
    fn test_sentinel_ignores_case() {
        let records = sample();
        let filter = SignalFilter::new()
            .with_sector("all")
            .with_funding_stage("ALL");
        assert!(filter.is_noop());
        assert_eq!(filter.apply(&records), records);
    }

    #[test]
    fn test_criteria_compose() {
        let records = sample();
        let result = filter_signals(&records, Some("fintech"), None, Some("funding"), 70);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "a");
    }

    #[test]
    fn test_unique_values() {
        let records = sample();
        assert_eq!(
            unique_values(&records, SignalField::FundingStage),
            vec!["Seed", "Series A"]
        );
        assert_eq!(
            unique_values(&records, SignalField::Sector),
            vec!["Fintech", "Retail", "fintech"]
        );
    }
}
