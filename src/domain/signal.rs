//! Signal records and the untyped mappings they are built from.
//!
//! A [`RawMapping`] is whatever the response parser managed to pull out of
//! free text: any subset of fields, any JSON value. The formatter is the only
//! place that turns one into a [`SignalRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Untyped key/value fields extracted from a response, before validation.
pub type RawMapping = serde_json::Map<String, serde_json::Value>;

pub const DEFAULT_NAME: &str = "Unknown Startup";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_GROWTH_REASON: &str = "Growth signals detected";
pub const DEFAULT_SOURCE_LINK: &str = "https://example.com";
pub const DEFAULT_SECTOR: &str = "Technology";
pub const DEFAULT_FUNDING_STAGE: &str = "Early Stage";
pub const DEFAULT_SIGNAL_TYPE: &str = "News";

/// Score assigned by the loose-text extractor, which never sees a real score.
pub const DEFAULT_SCORE: u8 = 75;

/// Upper bound of the score range (lower bound is 0)
pub const MAX_SCORE: u8 = 100;

/// A fully populated, scored and timestamped growth signal.
///
/// Field names are the interchange shape consumed by the CLI, JSON output
/// and the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Company name
    pub name: String,

    /// What the company does
    pub description: String,

    /// Why the company is expected to grow
    pub growth_reason: String,

    /// Where the signal was reported (not validated as a URL)
    pub source_link: String,

    /// Industry sector, free text
    pub sector: String,

    /// Funding stage, free text
    pub funding_stage: String,

    /// Kind of signal (funding, partnership, ...), free text
    pub signal_type: String,

    /// Growth score in 0..=100
    pub score: u8,

    /// When the record was formatted (not when the signal happened)
    pub timestamp: DateTime<Utc>,
}

impl SignalRecord {
    /// Read one of the text fields by name
    pub fn field(&self, field: SignalField) -> &str {
        match field {
            SignalField::Name => &self.name,
            SignalField::Description => &self.description,
            SignalField::GrowthReason => &self.growth_reason,
            SignalField::SourceLink => &self.source_link,
            SignalField::Sector => &self.sector,
            SignalField::FundingStage => &self.funding_stage,
            SignalField::SignalType => &self.signal_type,
        }
    }
}

/// The seven text fields of a [`SignalRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalField {
    Name,
    Description,
    GrowthReason,
    SourceLink,
    Sector,
    FundingStage,
    SignalType,
}

impl SignalField {
    /// All text fields, in interchange order
    pub const ALL: [SignalField; 7] = [
        SignalField::Name,
        SignalField::Description,
        SignalField::GrowthReason,
        SignalField::SourceLink,
        SignalField::Sector,
        SignalField::FundingStage,
        SignalField::SignalType,
    ];

    /// Key used in raw mappings and serialized records
    pub fn key(self) -> &'static str {
        match self {
            SignalField::Name => "name",
            SignalField::Description => "description",
            SignalField::GrowthReason => "growth_reason",
            SignalField::SourceLink => "source_link",
            SignalField::Sector => "sector",
            SignalField::FundingStage => "funding_stage",
            SignalField::SignalType => "signal_type",
        }
    }

    /// Value substituted when a mapping lacks this field
    pub fn default_value(self) -> &'static str {
        match self {
            SignalField::Name => DEFAULT_NAME,
            SignalField::Description => DEFAULT_DESCRIPTION,
            SignalField::GrowthReason => DEFAULT_GROWTH_REASON,
            SignalField::SourceLink => DEFAULT_SOURCE_LINK,
            SignalField::Sector => DEFAULT_SECTOR,
            SignalField::FundingStage => DEFAULT_FUNDING_STAGE,
            SignalField::SignalType => DEFAULT_SIGNAL_TYPE,
        }
    }
}

impl std::fmt::Display for SignalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
