//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the user file only needs the keys it wants to override.
//! The resolved [`SiteConfig`] is passed explicitly to every component that
//! needs it. Nothing reads configuration from process-wide state.
//!
//! ## Configuration Options
//!
//! ```toml
//! [server]
//! url = "https://cms.example.com"  # Content repository base URL (required)
//! api_version = "v1.1"             # Delivery API version
//! channel_token = ""               # Publishing channel token
//! language = "en"                  # Locale requested for site and page items
//! timeout_secs = 30                # Global per-request timeout
//!
//! [site]
//! slug = "minimalmain"             # Slug of the singleton site item
//!
//! [processing]
//! max_processes = 4                # Max parallel lookups (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content repository connection.
    pub server: ServerConfig,
    /// Site item lookup.
    pub site: SiteSettings,
    /// Parallel lookup settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("server.url must be set".into()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "server.url must start with http:// or https://".into(),
            ));
        }
        if self.server.api_version.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.api_version must not be empty".into(),
            ));
        }
        if self.server.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.language must not be empty".into(),
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "server.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.site.slug.trim().is_empty() {
            return Err(ConfigError::Validation("site.slug must not be empty".into()));
        }
        Ok(())
    }
}

/// Content repository connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the content repository, e.g. `https://cms.example.com`.
    pub url: String,
    /// Delivery API version segment.
    pub api_version: String,
    /// Channel token sent with every request. Empty means none.
    pub channel_token: String,
    /// Locale requested for site and page items.
    pub language: String,
    /// Global timeout for a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_version: "v1.1".to_string(),
            channel_token: String::new(),
            language: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which item holds the site-wide navigation and branding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub slug: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            slug: "minimalmain".to_string(),
        }
    }
}

/// Parallel lookup settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of concurrent content lookups.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file falls back to the stock
/// defaults, which fail validation until `server.url` is set.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# minimal-site configuration
# ==========================
# Values shown below are the defaults, except server.url which has none.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content repository
# ---------------------------------------------------------------------------
[server]
# Base URL of the content repository (required).
url = "https://cms.example.com"

# Delivery API version used in item URLs:
#   {url}/content/published/api/{api_version}/items/...
api_version = "v1.1"

# Publishing channel token appended to every request. Leave empty if the
# channel does not require one.
channel_token = ""

# Locale requested for the site item and page items.
language = "en"

# Global timeout for one request, in seconds. Timed-out requests surface as
# ETIMEDOUT content errors; there are no retries.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Site item
# ---------------------------------------------------------------------------
[site]
# Slug of the singleton item holding navigation pages and header/footer logos.
slug = "minimalmain"

# ---------------------------------------------------------------------------
# Parallel lookups
# ---------------------------------------------------------------------------
[processing]
# Maximum concurrent content lookups (image renditions, pages during build).
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4
"##
}
