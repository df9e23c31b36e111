//! Scan orchestration.
//!
//! Owns the single external request per scan and makes the one decision
//! that matters: use what came back, or substitute the fallback catalog.
//! A scan never fails; every error path ends in a fully valid result.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{AdapterError, PerplexityClient, TextGenerator};
use crate::config::ResolvedConfig;
use crate::domain::{fallback_mappings, SignalRecord};

use super::formatter::format_mappings;
use super::parser::ResponseParser;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const SCAN_PROMPT: &str = "Give me 10 early-stage SaaS startups that are likely to experience significant growth based on recent public signals.

For each startup, provide the following information in JSON format:
- name: Company name
- description: Brief description of what they do
- growth_reason: Specific reason why they show growth potential (funding, partnerships, market trends, etc.)
- source_link: URL or source of the signal
- sector: Industry sector
- funding_stage: Current funding stage
- signal_type: Type of signal (funding, partnership, acquisition, market demand, etc.)

Focus on startups that have shown recent activity like:
- Recent funding rounds
- Strategic partnerships
- Product launches
- Market expansion
- Regulatory changes affecting their sector
- Industry trends favoring their solution

Return the data as a JSON array with these exact field names.";

/// Scan behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSettings {
    /// Serve the fallback catalog when a response parses to zero records
    pub fallback_on_empty: bool,
}

/// Why a scan served the fallback catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No client configured
    ClientUnavailable,
    /// The request or its response failed
    RequestFailed(String),
    /// The response parsed to nothing and `fallback_on_empty` is set
    NoRecordsParsed,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::ClientUnavailable => write!(f, "no client configured"),
            FallbackReason::RequestFailed(e) => write!(f, "request failed: {}", e),
            FallbackReason::NoRecordsParsed => write!(f, "response contained no records"),
        }
    }
}

/// Where a scan's records came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSource {
    /// Parsed from a live response by the named strategy
    Live { strategy: Option<&'static str> },
    /// Substituted fallback catalog
    Fallback(FallbackReason),
}

/// Records of one scan plus their provenance
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub records: Vec<SignalRecord>,
    pub source: ScanSource,
}

impl ScanReport {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ScanSource::Fallback(_))
    }
}

/// Main scan orchestrator
pub struct Orchestrator {
    client: Option<Arc<dyn TextGenerator>>,
    parser: ResponseParser,
    settings: ScanSettings,
}

impl Orchestrator {
    /// Create an orchestrator around an optional client
    pub fn new(client: Option<Arc<dyn TextGenerator>>) -> Self {
        Self::with_settings(client, ScanSettings::default())
    }

    pub fn with_settings(client: Option<Arc<dyn TextGenerator>>, settings: ScanSettings) -> Self {
        if client.is_none() {
            info!("No text-generation client configured, scans will serve the fallback catalog");
        }

        Self {
            client,
            parser: ResponseParser::new(),
            settings,
        }
    }

    /// Fallback-only orchestrator
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Build the Perplexity client from configuration.
    ///
    /// A missing key or a client that cannot be built leaves the
    /// orchestrator in fallback-only mode.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let client: Option<Arc<dyn TextGenerator>> =
            match PerplexityClient::new(config.api.clone()) {
                Ok(client) => Some(Arc::new(client)),
                Err(AdapterError::MissingApiKey) => None,
                Err(e) => {
                    warn!(error = %e, "Failed to initialize Perplexity client");
                    None
                }
            };

        Self::with_settings(client, config.scan)
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn settings(&self) -> ScanSettings {
        self.settings
    }

    /// Run one scan and return ranked records
    pub async fn scan(&self) -> Vec<SignalRecord> {
        self.scan_report().await.records
    }

    /// Run one scan and report where the records came from
    pub async fn scan_report(&self) -> ScanReport {
        self.run_scan(Uuid::new_v4()).await
    }

    #[instrument(skip(self, scan_id), fields(scan_id = %scan_id))]
    async fn run_scan(&self, scan_id: Uuid) -> ScanReport {
        let Some(client) = &self.client else {
            return fallback_report(scan_id, FallbackReason::ClientUnavailable);
        };

        info!(client = client.name(), "Scanning for startup signals");

        let response = match client.ask(SCAN_PROMPT, SYSTEM_PROMPT).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Scan request failed, serving fallback catalog");
                return fallback_report(scan_id, FallbackReason::RequestFailed(e.to_string()));
            }
        };

        info!(response_len = response.len(), "Received scan response");

        let (records, strategy) = self.process_response(&response);

        if records.is_empty() && self.settings.fallback_on_empty {
            warn!("Scan response contained no records, serving fallback catalog");
            return fallback_report(scan_id, FallbackReason::NoRecordsParsed);
        }

        info!(records = records.len(), "Scan complete");

        ScanReport {
            scan_id,
            records,
            source: ScanSource::Live { strategy },
        }
    }

    /// Parse and format a raw response.
    ///
    /// Returns the ranked records and the strategy that produced them.
    pub fn process_response(&self, response: &str) -> (Vec<SignalRecord>, Option<&'static str>) {
        let parsed = self.parser.parse(response);
        parsed.log_fallthroughs();

        (format_mappings(parsed.mappings), parsed.strategy)
    }

    /// The fallback catalog, formatted like any scan result
    pub fn fallback_records() -> Vec<SignalRecord> {
        format_mappings(fallback_mappings())
    }
}

fn fallback_report(scan_id: Uuid, reason: FallbackReason) -> ScanReport {
    debug!(%reason, "Using fallback catalog");
    ScanReport {
        scan_id,
        records: Orchestrator::fallback_records(),
        source: ScanSource::Fallback(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn ask(&self, _prompt: &str, _system_prompt: &str) -> Result<String, AdapterError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_prompt_requests_exact_fields() {
        for field in crate::domain::SignalField::ALL {
            assert!(SCAN_PROMPT.contains(field.key()), "missing {}", field);
        }
        assert!(SCAN_PROMPT.contains("JSON array"));
    }

    #[tokio::test]
    async fn test_offline_scan_serves_catalog() {
        let report = Orchestrator::offline().scan_report().await;
        assert!(report.is_fallback());
        assert_eq!(report.source, ScanSource::Fallback(FallbackReason::ClientUnavailable));
        assert_eq!(report.records.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_parse_is_a_valid_result() {
        let orchestrator = Orchestrator::new(Some(Arc::new(Canned("[]"))));
        let report = orchestrator.scan_report().await;
        assert!(report.records.is_empty());
        assert_eq!(report.source, ScanSource::Live { strategy: Some("json_block") });
    }

    #[tokio::test]
    async fn test_empty_parse_can_fall_back() {
        let orchestrator = Orchestrator::with_settings(
            Some(Arc::new(Canned("nothing useful"))),
            ScanSettings {
                fallback_on_empty: true,
            },
        );
        let report = orchestrator.scan_report().await;
        assert_eq!(report.source, ScanSource::Fallback(FallbackReason::NoRecordsParsed));
        assert_eq!(report.records.len(), 10);
    }
}
