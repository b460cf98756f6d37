use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{FieldCatalog, FieldMarker};
use crate::classify::ExtensionPrecedence;
use crate::scanner::ScriptDenylist;
use crate::url_model::{CdnRewrite, UrlNormalizer};

/// Lookup service that turns a workshop id into a blob download URL.
pub const DEFAULT_WORKSHOP_API: &str =
    "https://www.steamworkshopdownloader.cc/json?url=https://steamcommunity.com/sharedfiles/filedetails/?id={id}";

/// Retry policy parameters (`[retry]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt, for HTTP 429 and network errors.
    pub max_retries: u32,
    /// Delay before the first retry, in seconds; doubles on each retry.
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_secs: 5.0,
            max_delay_secs: 60,
        }
    }
}

/// HTTP client settings (`[http]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound for one whole transfer.
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 300,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Blob scanning settings (`[scan]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Substrings that mark a captured "URL" as script code.
    pub denylist: Vec<String>,
    /// Replaces the built-in field catalog when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldMarker>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            denylist: ScriptDenylist::default().tokens().to_vec(),
            fields: None,
        }
    }
}

/// Global configuration loaded from `~/.config/ttsdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsdlConfig {
    /// Which signal names generic assets when several agree on a type.
    pub extension_precedence: ExtensionPrecedence,
    /// URL template for workshop lookups; `{id}` is replaced by the workshop id.
    pub workshop_api: String,
    /// Deprecated CDN prefixes and their replacements.
    pub cdn_rewrites: Vec<CdnRewrite>,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub scan: ScanConfig,
}

impl Default for TtsdlConfig {
    fn default() -> Self {
        Self {
            extension_precedence: ExtensionPrecedence::default(),
            workshop_api: DEFAULT_WORKSHOP_API.to_string(),
            cdn_rewrites: CdnRewrite::defaults(),
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl TtsdlConfig {
    pub fn catalog(&self) -> FieldCatalog {
        match &self.scan.fields {
            Some(fields) => FieldCatalog::new(fields.clone()),
            None => FieldCatalog::default(),
        }
    }

    pub fn normalizer(&self) -> UrlNormalizer {
        UrlNormalizer::new(self.cdn_rewrites.clone())
    }

    pub fn denylist(&self) -> ScriptDenylist {
        ScriptDenylist::new(self.scan.denylist.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ttsdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TtsdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TtsdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)
            .with_context(|| format!("write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: TtsdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
