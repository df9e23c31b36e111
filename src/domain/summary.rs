//! Aggregate statistics over a set of signal records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::signal::SignalRecord;

/// Records at or above this score count as high-scoring
pub const HIGH_SCORE_THRESHOLD: u8 = 80;

/// Score bands used for the distribution histogram (inclusive bounds)
const SCORE_BANDS: [(u8, u8); 5] = [(0, 59), (60, 69), (70, 79), (80, 89), (90, 100)];

/// Counts and distributions over a record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub total: usize,
    pub average_score: f64,
    pub high_score_count: usize,
    pub by_sector: BTreeMap<String, usize>,
    pub by_signal_type: BTreeMap<String, usize>,
    pub by_funding_stage: BTreeMap<String, usize>,
    /// Band label ("80-89") to count; every band is present
    pub score_bands: BTreeMap<String, usize>,
}

impl SignalSummary {
    pub fn from_records(records: &[SignalRecord]) -> Self {
        let total = records.len();
        let score_sum: u64 = records.iter().map(|r| u64::from(r.score)).sum();
        let average_score = if total == 0 {
            0.0
        } else {
            score_sum as f64 / total as f64
        };

        let mut by_sector = BTreeMap::new();
        let mut by_signal_type = BTreeMap::new();
        let mut by_funding_stage = BTreeMap::new();
        let mut score_bands: BTreeMap<String, usize> = SCORE_BANDS
            .iter()
            .map(|&(lo, hi)| (band_label(lo, hi), 0))
            .collect();

        for record in records {
            *by_sector.entry(record.sector.clone()).or_insert(0) += 1;
            *by_signal_type.entry(record.signal_type.clone()).or_insert(0) += 1;
            *by_funding_stage
                .entry(record.funding_stage.clone())
                .or_insert(0) += 1;

            if let Some(&(lo, hi)) = SCORE_BANDS
                .iter()
                .find(|(lo, hi)| (*lo..=*hi).contains(&record.score))
            {
                *score_bands.entry(band_label(lo, hi)).or_insert(0) += 1;
            }
        }

        Self {
            total,
            average_score,
            high_score_count: records
                .iter()
                .filter(|r| r.score >= HIGH_SCORE_THRESHOLD)
                .count(),
            by_sector,
            by_signal_type,
            by_funding_stage,
            score_bands,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn band_label(lo: u8, hi: u8) -> String {
    format!("{}-{}", lo, hi)
}
