//! Command-line interface for signalminer.
//!
//! Provides commands for scanning, replaying saved responses, and reading
//! back stored scans.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::ResolvedConfig;
use crate::core::{
    format_mappings, unique_values, Orchestrator, ResponseParser, ScanReport, ScanSource,
    SignalFilter,
};
use crate::domain::{SignalField, SignalSummary};
use crate::store::SignalStore;

pub mod output;

/// signalminer - Early-stage startup growth signals
#[derive(Parser, Debug)]
#[command(name = "signalminer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan for startups and print the ranked results
    Scan {
        #[command(flatten)]
        filter: FilterArgs,

        /// Skip the API and serve the sample catalog
        #[arg(long)]
        offline: bool,

        /// Store the scan in the database
        #[arg(long)]
        store: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Parse a saved API response (file or stdin)
    Parse {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show stored signals, newest first
    History {
        /// Maximum number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show aggregates over recently stored signals
    Trends {
        /// Size of the trailing window in days
        #[arg(short, long, default_value = "30")]
        days: u32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the values available for each filter
    Filters {
        /// Skip the API and use the sample catalog
        #[arg(long)]
        offline: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Filter options shared by commands that print records
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this sector ("All" for any)
    #[arg(long)]
    pub sector: Option<String>,

    /// Only this funding stage ("All" for any)
    #[arg(long)]
    pub funding_stage: Option<String>,

    /// Only this signal type ("All" for any)
    #[arg(long)]
    pub signal_type: Option<String>,

    /// Minimum growth score
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: u8,
}

impl From<FilterArgs> for SignalFilter {
    fn from(args: FilterArgs) -> Self {
        SignalFilter {
            sector: args.sector,
            funding_stage: args.funding_stage,
            signal_type: args.signal_type,
            min_score: args.min_score,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Scan {
                filter,
                offline,
                store,
                json,
            } => scan(filter.into(), offline, store, json).await,
            Commands::Parse {
                input,
                filter,
                json,
            } => parse_response(input, filter.into(), json),
            Commands::History { limit, json } => show_history(limit, json),
            Commands::Trends { days, json } => show_trends(days, json),
            Commands::Filters { offline } => list_filters(offline).await,
            Commands::Config => show_config(),
        }
    }
}

fn orchestrator(offline: bool) -> Result<Orchestrator> {
    if offline {
        return Ok(Orchestrator::offline());
    }
    Ok(Orchestrator::from_config(crate::config::config()?))
}

/// Scan, optionally store, filter and print
async fn scan(filter: SignalFilter, offline: bool, store: bool, json: bool) -> Result<()> {
    let report = orchestrator(offline)?.scan_report().await;

    if let ScanSource::Fallback(reason) = &report.source {
        eprintln!("[Showing sample data: {}]", reason);
    }

    if let Some(database) = storage_target(crate::config::config(), offline, store)? {
        persist(&database, &report);
    }

    let records = filter.apply(&report.records);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_records(&records);
        output::print_summary(&SignalSummary::from_records(&records));
    }

    Ok(())
}

/// Database a scan should be stored in, if any.
///
/// An offline scan that was not asked to store runs without configuration,
/// so an unreadable config file only costs it the `storage.enabled` switch.
fn storage_target(
    config: Result<&ResolvedConfig>,
    offline: bool,
    store: bool,
) -> Result<Option<PathBuf>> {
    match config {
        Ok(config) if store || config.storage_enabled => Ok(Some(config.database.clone())),
        Ok(_) => Ok(None),
        Err(e) if offline && !store => {
            warn!(error = %e, "Ignoring unreadable configuration for offline scan");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Best-effort storage: failures are logged, never fatal
fn persist(database: &Path, report: &ScanReport) {
    let result = SignalStore::open(database)
        .and_then(|mut store| store.store_records(report.scan_id, &report.records));

    match result {
        Ok(stored) => info!(stored, database = %database.display(), "Stored scan results"),
        Err(e) => warn!(
            error = %e,
            database = %database.display(),
            "Failed to store scan results"
        ),
    }
}

/// Run a saved response through the parser and formatter
fn parse_response(input_file: Option<PathBuf>, filter: SignalFilter, json: bool) -> Result<()> {
    let input = if let Some(path) = input_file {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    };

    let parsed = ResponseParser::new().parse(&input);
    parsed.log_fallthroughs();
    let strategy = parsed.strategy.unwrap_or("none");
    let records = filter.apply(&format_mappings(parsed.mappings));

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_records(&records);
        eprintln!("\n[Parsed with strategy: {}]", strategy);
    }

    Ok(())
}

fn open_store() -> Result<SignalStore> {
    let config = crate::config::config()?;
    SignalStore::open(&config.database)
        .with_context(|| format!("Failed to open database: {}", config.database.display()))
}

/// Show stored records
fn show_history(limit: usize, json: bool) -> Result<()> {
    let records = open_store()?.recent(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No stored signals");
        return Ok(());
    }

    output::print_history(&records);
    Ok(())
}

/// Show aggregates over the trailing window
fn show_trends(days: u32, json: bool) -> Result<()> {
    let report = open_store()?.trends(days, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report {
        Some(report) => {
            println!("Trends over the last {} days", report.period_days);
            output::print_summary(&report.summary);
            output::print_distributions(&report.summary);
        }
        None => println!("No signals stored in the last {} days", days),
    }

    Ok(())
}

/// List filter choices from one scan
async fn list_filters(offline: bool) -> Result<()> {
    let records = orchestrator(offline)?.scan().await;

    for field in [
        SignalField::Sector,
        SignalField::FundingStage,
        SignalField::SignalType,
    ] {
        let values = unique_values(&records, field);
        println!("{}: {}", field, values.join(", "));
    }

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = crate::config::config()?;

    let config_file = match &config.config_file {
        Some(path) => path.display().to_string(),
        None => "(none)".to_string(),
    };

    println!("Config file: {}", config_file);
    println!("Home: {}", config.home.display());
    println!("Database: {}", config.database.display());
    println!("Storage enabled: {}", config.storage_enabled);
    println!("API key: {}", config.masked_api_key());
    println!("API endpoint: {}", config.api.base_url);
    println!("Model: {}", config.api.model);
    println!("Max tokens: {}", config.api.max_tokens);
    println!("Temperature: {}", config.api.temperature);
    println!("Timeout: {:?}", config.api.timeout);
    println!("Fallback on empty: {}", config.scan.fallback_on_empty);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_args_parse() {
        let cli = Cli::try_parse_from([
            "signalminer",
            "scan",
            "--sector",
            "Fintech",
            "--min-score",
            "80",
            "--offline",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan {
                filter, offline, ..
            } => {
                assert!(offline);
                let filter: SignalFilter = filter.into();
                assert_eq!(filter.sector.as_deref(), Some("Fintech"));
                assert_eq!(filter.min_score, 80);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn resolved(storage_enabled: bool) -> ResolvedConfig {
        let mut config = crate::config::resolve_config(None, PathBuf::from("/h"), |_| None);
        config.storage_enabled = storage_enabled;
        config
    }

    #[test]
    fn test_offline_scan_tolerates_broken_config() {
        let broken = || Err(anyhow::anyhow!("missing field `version`"));

        assert_eq!(storage_target(broken(), true, false).unwrap(), None);
        // Storing or going online still needs a readable config
        assert!(storage_target(broken(), true, true).is_err());
        assert!(storage_target(broken(), false, false).is_err());
    }

    #[test]
    fn test_storage_target_follows_flag_and_config() {
        let plain = resolved(false);
        let enabled = resolved(true);

        assert_eq!(storage_target(Ok(&plain), false, false).unwrap(), None);
        assert_eq!(
            storage_target(Ok(&plain), true, true).unwrap(),
            Some(PathBuf::from("/h/signals.db"))
        );
        assert_eq!(
            storage_target(Ok(&enabled), true, false).unwrap(),
            Some(PathBuf::from("/h/signals.db"))
        );
    }

    #[test]
    fn test_min_score_range_is_enforced() {
        assert!(Cli::try_parse_from(["signalminer", "scan", "--min-score", "101"]).is_err());
    }

    #[test]
    fn test_history_default_limit() {
        let cli = Cli::try_parse_from(["signalminer", "history"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: 20, json: false }));
    }
}
