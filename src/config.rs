//! Configuration for signalminer.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (PERPLEXITY_API_KEY, SIGNALMINER_HOME, SIGNALMINER_DB)
//! 2. Config file (.signalminer/config.yaml)
//! 3. Defaults (~/.signalminer)
//!
//! Config file discovery:
//! - Searches current directory and parents for .signalminer/config.yaml
//! - `storage.database` is relative to the project root (parent of .signalminer/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::PerplexitySettings;
use crate::core::ScanSettings;

pub const ENV_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const ENV_HOME: &str = "SIGNALMINER_HOME";
pub const ENV_DATABASE: &str = "SIGNALMINER_DB";

const CONFIG_DIR: &str = ".signalminer";
const CONFIG_FILE: &str = "config.yaml";
const DATABASE_FILE: &str = "signals.db";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Persist every scan
    pub enabled: Option<bool>,
    /// Database path (relative to the project root)
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanConfig {
    pub fallback_on_empty: Option<bool>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// SQLite database for stored scans
    pub database: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Text-generation client settings
    pub api: PerplexitySettings,
    /// Persist every scan
    pub storage_enabled: bool,
    /// Scan behaviour
    pub scan: ScanSettings,
}

impl ResolvedConfig {
    /// API key for display: first four characters, rest hidden
    pub fn masked_api_key(&self) -> String {
        match &self.api.api_key {
            Some(key) if key.chars().count() > 4 => {
                let prefix: String = key.chars().take(4).collect();
                format!("{}****", prefix)
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Combine an optional config file with environment lookups.
///
/// `env` is injected so resolution can be tested without touching the
/// process environment.
pub fn resolve_config<F>(
    config_file: Option<(PathBuf, ConfigFile)>,
    default_home: PathBuf,
    env: F,
) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let (config_path, file) = match config_file {
        Some((path, file)) => (Some(path), Some(file)),
        None => (None, None),
    };

    let home = env_nonempty(ENV_HOME)
        .map(PathBuf::from)
        .unwrap_or(default_home);

    // Project root is the parent of .signalminer/
    let base_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));

    let database = if let Some(db) = env_nonempty(ENV_DATABASE) {
        PathBuf::from(db)
    } else if let Some(db) = file.as_ref().and_then(|f| f.storage.database.as_deref()) {
        resolve_path(base_dir, db)
    } else {
        home.join(DATABASE_FILE)
    };

    let api_file = file.as_ref().map(|f| f.api.clone()).unwrap_or_default();
    let defaults = PerplexitySettings::default();
    let api = PerplexitySettings {
        api_key: env_nonempty(ENV_API_KEY).or(api_file.api_key),
        base_url: api_file.base_url.unwrap_or(defaults.base_url),
        model: api_file.model.unwrap_or(defaults.model),
        max_tokens: api_file.max_tokens.unwrap_or(defaults.max_tokens),
        temperature: api_file.temperature.unwrap_or(defaults.temperature),
        timeout: api_file
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
    };

    let storage_enabled = file
        .as_ref()
        .and_then(|f| f.storage.enabled)
        .unwrap_or(false);

    let scan = ScanSettings {
        fallback_on_empty: file
            .as_ref()
            .and_then(|f| f.scan.fallback_on_empty)
            .unwrap_or(false),
    };

    ResolvedConfig {
        home,
        database,
        config_file: config_path,
        api,
        storage_enabled,
        scan,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = match find_config_file(&cwd) {
        Some(path) => {
            let file = load_config_file(&path)?;
            Some((path, file))
        }
        None => None,
    };

    Ok(resolve_config(config_file, default_home, |key| {
        std::env::var(key).ok()
    }))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
