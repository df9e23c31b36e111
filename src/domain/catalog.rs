//! Curated sample signals served when live retrieval is unavailable.
//!
//! The entries are complete and already scored, but they still go through
//! the formatter like any parsed response so they get the same defaulting,
//! timestamping and ordering.

use serde_json::Value;

use super::signal::{RawMapping, SignalField};

/// One hand-written catalog entry
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub growth_reason: &'static str,
    pub source_link: &'static str,
    pub sector: &'static str,
    pub funding_stage: &'static str,
    pub signal_type: &'static str,
    pub score: u8,
}

impl CatalogEntry {
    /// Convert to the untyped form the formatter consumes
    pub fn to_mapping(&self) -> RawMapping {
        let mut mapping = RawMapping::new();
        for field in SignalField::ALL {
            mapping.insert(
                field.key().to_string(),
                Value::String(self.text(field).to_string()),
            );
        }
        mapping.insert("score".to_string(), Value::from(self.score));
        mapping
    }

    fn text(&self, field: SignalField) -> &'static str {
        match field {
            SignalField::Name => self.name,
            SignalField::Description => self.description,
            SignalField::GrowthReason => self.growth_reason,
            SignalField::SourceLink => self.source_link,
            SignalField::Sector => self.sector,
            SignalField::FundingStage => self.funding_stage,
            SignalField::SignalType => self.signal_type,
        }
    }
}

pub const FALLBACK_CATALOG: [CatalogEntry; 10] = [
    CatalogEntry {
        name: "TechFlow Analytics",
        description: "AI-powered business intelligence platform for SMBs",
        growth_reason: "Recent Series A funding of $5M, growing customer base",
        source_link: "https://techcrunch.com/techflow-analytics",
        sector: "Business Intelligence",
        funding_stage: "Series A",
        signal_type: "Funding",
        score: 85,
    },
    CatalogEntry {
        name: "CloudSync Pro",
        description: "Enterprise-grade file synchronization solution",
        growth_reason: "Major partnership with Microsoft, expanding team",
        source_link: "https://venturebeat.com/cloudsync-pro",
        sector: "Cloud Computing",
        funding_stage: "Seed",
        signal_type: "Partnership",
        score: 78,
    },
    CatalogEntry {
        name: "DataVault Security",
        description: "Zero-trust cybersecurity platform for enterprises",
        growth_reason: "Increased demand post-cyber attacks, new product launch",
        source_link: "https://techcrunch.com/datavault-security",
        sector: "Cybersecurity",
        funding_stage: "Early Stage",
        signal_type: "Market Demand",
        score: 92,
    },
    CatalogEntry {
        name: "GreenTech Solutions",
        description: "Sustainability tracking software for manufacturing",
        growth_reason: "Regulatory compliance requirements, ESG focus",
        source_link: "https://greenbiz.com/greentech-solutions",
        sector: "Sustainability",
        funding_stage: "Seed",
        signal_type: "Regulatory",
        score: 80,
    },
    CatalogEntry {
        name: "HealthAI Connect",
        description: "AI-powered patient care coordination platform",
        growth_reason: "Healthcare digitization trends, pilot with major hospital",
        source_link: "https://healthcareitnews.com/healthai-connect",
        sector: "Healthcare",
        funding_stage: "Series A",
        signal_type: "Industry Trend",
        score: 88,
    },
    CatalogEntry {
        name: "EduTech Pro",
        description: "Personalized learning platform for K-12 education",
        growth_reason: "Remote learning adoption, government contracts",
        source_link: "https://edtechmagazine.com/edutech-pro",
        sector: "Education",
        funding_stage: "Early Stage",
        signal_type: "Government",
        score: 75,
    },
    CatalogEntry {
        name: "FinFlow Analytics",
        description: "Real-time financial data analysis for traders",
        growth_reason: "Market volatility, institutional interest",
        source_link: "https://fintechnews.com/finflow-analytics",
        sector: "Fintech",
        funding_stage: "Seed",
        signal_type: "Market Opportunity",
        score: 82,
    },
    CatalogEntry {
        name: "LogiChain Pro",
        description: "Supply chain optimization using blockchain",
        growth_reason: "Global supply chain disruptions, Fortune 500 pilots",
        source_link: "https://supplychaindive.com/logichain-pro",
        sector: "Logistics",
        funding_stage: "Series A",
        signal_type: "Market Disruption",
        score: 79,
    },
    CatalogEntry {
        name: "RetailAI Insights",
        description: "AI-powered retail analytics and customer insights",
        growth_reason: "E-commerce growth, major retail partnerships",
        source_link: "https://retailwire.com/retailai-insights",
        sector: "Retail",
        funding_stage: "Early Stage",
        signal_type: "Partnership",
        score: 76,
    },
    CatalogEntry {
        name: "EnergyGrid Optimizer",
        description: "Smart grid management and energy optimization",
        growth_reason: "Renewable energy transition, government incentives",
        source_link: "https://energynews.com/energygrid-optimizer",
        sector: "Energy",
        funding_stage: "Seed",
        signal_type: "Policy",
        score: 84,
    },
];

/// The catalog as raw mappings, in catalog order
pub fn fallback_mappings() -> Vec<RawMapping> {
    FALLBACK_CATALOG.iter().map(CatalogEntry::to_mapping).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entries_are_complete() {
        let mappings = fallback_mappings();
        assert_eq!(mappings.len(), 10);

        for mapping in &mappings {
            for field in SignalField::ALL {
                let value = mapping.get(field.key()).and_then(Value::as_str).unwrap();
                assert!(!value.is_empty());
            }
            assert!(mapping["score"].as_u64().unwrap() <= 100);
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = FALLBACK_CATALOG.iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FALLBACK_CATALOG.len());
    }
}
