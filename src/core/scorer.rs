//! Heuristic growth scoring.
//!
//! A score starts at a base value and picks up at most one bonus per
//! category (funding stage, signal type, sector). Within a category the
//! rules are checked in order and the first case-insensitive substring
//! match wins. The result is clamped to 0..=100.

use crate::domain::MAX_SCORE;

/// One bonus rule: any needle found in the value awards the weight
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub needles: &'static [&'static str],
    pub weight: i32,
}

/// A complete rule set
#[derive(Debug, Clone, Copy)]
pub struct ScoringRules {
    pub base: i32,
    pub funding_stage: &'static [Rule],
    pub signal_type: &'static [Rule],
    pub sector: &'static [Rule],
}

const FUNDING_STAGE_RULES: &[Rule] = &[
    Rule { needles: &["seed"], weight: 10 },
    Rule { needles: &["series a"], weight: 15 },
    Rule { needles: &["series b"], weight: 20 },
];

const SIGNAL_TYPE_RULES: &[Rule] = &[
    Rule { needles: &["funding"], weight: 15 },
    Rule { needles: &["partnership"], weight: 12 },
    Rule { needles: &["acquisition"], weight: 20 },
];

const SECTOR_RULES: &[Rule] = &[
    Rule { needles: &["ai", "artificial intelligence"], weight: 8 },
    Rule { needles: &["cybersecurity"], weight: 10 },
    Rule { needles: &["healthcare"], weight: 7 },
];

/// The production rule set
pub const STANDARD_RULES: ScoringRules = ScoringRules {
    base: 50,
    funding_stage: FUNDING_STAGE_RULES,
    signal_type: SIGNAL_TYPE_RULES,
    sector: SECTOR_RULES,
};

impl Default for ScoringRules {
    fn default() -> Self {
        STANDARD_RULES
    }
}

impl ScoringRules {
    /// Score a record's category fields under these rules
    pub fn score(&self, funding_stage: &str, signal_type: &str, sector: &str) -> u8 {
        let total = i64::from(self.base)
            + first_match(self.funding_stage, funding_stage)
            + first_match(self.signal_type, signal_type)
            + first_match(self.sector, sector);
        clamp_score(total)
    }
}

/// Score with the standard rules
pub fn growth_score(funding_stage: &str, signal_type: &str, sector: &str) -> u8 {
    STANDARD_RULES.score(funding_stage, signal_type, sector)
}

/// Clamp any integer into the valid score range
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_SCORE)) as u8
}

fn first_match(rules: &[Rule], value: &str) -> i64 {
    let value = value.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| value.contains(needle)))
        .map(|rule| i64::from(rule.weight))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_score_without_matches() {
        assert_eq!(growth_score("Early Stage", "News", "Logistics"), 50);
        assert_eq!(growth_score("", "", ""), 50);
    }

    #[test]
    fn test_known_combination() {
        assert_eq!(growth_score("Series A", "Funding", "Cybersecurity"), 90);
        // Deterministic across calls
        for _ in 0..10 {
            assert_eq!(growth_score("Series A", "Funding", "Cybersecurity"), 90);
        }
    }

    #[test]
    fn test_first_match_wins_within_category() {
        // "seed" is checked before "series a"
        assert_eq!(growth_score("Seed / Series A", "", ""), 60);
        // "funding" is checked before "acquisition"
        assert_eq!(growth_score("", "Acquisition funding", ""), 65);
    }

    #[test]
    fn test_case_insensitive_substrings() {
        assert_eq!(growth_score("SERIES B extension", "", ""), 70);
        assert_eq!(growth_score("", "strategic PARTNERSHIP", ""), 62);
        assert_eq!(growth_score("", "", "Artificial Intelligence"), 58);
        assert_eq!(growth_score("", "", "Digital Healthcare"), 57);
    }

    #[test]
    fn test_ai_substring_is_loose() {
        // "retail" contains "ai"
        assert_eq!(growth_score("", "", "Retail"), 58);
    }

    #[test]
    fn test_natural_range() {
        assert_eq!(growth_score("Series B", "Acquisition", "Cybersecurity"), 100);
        assert_eq!(growth_score("Series B", "Acquisition", "AI"), 98);
    }

    #[test]
    fn test_clamping() {
        const BIG: &[Rule] = &[Rule { needles: &["x"], weight: 90 }];
        const NEGATIVE: &[Rule] = &[Rule { needles: &["x"], weight: -90 }];

        let high = ScoringRules {
            base: 50,
            funding_stage: BIG,
            signal_type: BIG,
            sector: BIG,
        };
        assert_eq!(high.score("x", "x", "x"), 100);

        let low = ScoringRules {
            base: 10,
            funding_stage: NEGATIVE,
            signal_type: NEGATIVE,
            sector: NEGATIVE,
        };
        assert_eq!(low.score("x", "x", "x"), 0);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5), 0);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(1_000), 100);
    }
}
