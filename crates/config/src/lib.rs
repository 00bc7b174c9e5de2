//! Configuration loading, validation, and management for Math Relax.
//!
//! Loads configuration from `~/.mathrelax/config.toml` with environment
//! variable overrides and a local `apikey.txt` fallback. Validates all
//! settings at startup; a missing model credential is fatal there and
//! nowhere else.

use mathrelax_core::PersonaConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pseudo model name that asks the runtime to pick a model once at startup.
pub const AUTO_MODEL: &str = "auto";

/// The root configuration structure.
///
/// Maps directly to `~/.mathrelax/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model service API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// File holding the API key, read when no key is configured otherwise
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,

    /// Model service base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier, or "auto" to probe once at startup
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per reply (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Reply shown to the student when the model call fails
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Tutor persona
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Spreadsheet logging (absent = logging disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<SheetsConfig>,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from("apikey.txt")
}
fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_fallback_reply() -> String {
    "Yah, sinyalnya putus. Coba tanya lagi ya!".into()
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_key_file", &self.api_key_file)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("fallback_reply", &self.fallback_reply)
            .field("persona", &self.persona.tutor_name)
            .field("sheets", &self.sheets)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Google Sheets logging target.
#[derive(Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Whether rows are appended at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Target spreadsheet ID (from its URL)
    #[serde(default)]
    pub spreadsheet_id: String,

    /// A1 range rows are appended to
    #[serde(default = "default_sheet_range")]
    pub range: String,

    /// OAuth bearer token with the spreadsheets scope.
    ///
    /// Sent as-is and never refreshed. Google access tokens expire after
    /// about an hour; after that every append is rejected with 401 and only
    /// a debug-level log line records it. Supply a fresh token through
    /// `MATHRELAX_SHEETS_TOKEN` when restarting a long-running server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Sheets API base URL
    #[serde(default = "default_sheets_api_url")]
    pub api_url: String,

    /// Per-append timeout
    #[serde(default = "default_sheets_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sheet_range() -> String {
    "Sheet1!A:D".into()
}
fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com/v4".into()
}
fn default_sheets_timeout_secs() -> u64 {
    10
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("enabled", &self.enabled)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("access_token", &redact(&self.access_token))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spreadsheet_id: String::new(),
            range: default_sheet_range(),
            access_token: None,
            api_url: default_sheets_api_url(),
            timeout_secs: default_sheets_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Sessions kept in memory before the oldest is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_sessions() -> usize {
    1_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.mathrelax/config.toml).
    ///
    /// Environment overrides:
    /// - `MATHRELAX_API_KEY`, `GOOGLE_API_KEY`, `GEMINI_API_KEY` (in that order)
    /// - `MATHRELAX_MODEL`
    /// - `MATHRELAX_SHEETS_TOKEN`
    ///
    /// When no key is found anywhere else, `api_key_file` is read.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply environment overrides and the key file, then validate again.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if self.api_key.is_none() {
            self.api_key = ["MATHRELAX_API_KEY", "GOOGLE_API_KEY", "GEMINI_API_KEY"]
                .into_iter()
                .filter_map(|name| var(name))
                .find(|k| !k.trim().is_empty());
        }

        if self.api_key.is_none() {
            self.api_key = read_key_file(&self.api_key_file)?;
        }

        if let Some(model) = var("MATHRELAX_MODEL") {
            self.model = model;
        }

        if let Some(token) = var("MATHRELAX_SHEETS_TOKEN") {
            if let Some(sheets) = self.sheets.as_mut() {
                sheets.access_token = Some(token);
            }
        }

        self.validate()
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mathrelax")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.fallback_reply.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fallback_reply must not be empty".into(),
            ));
        }

        if let Some(sheets) = &self.sheets {
            if sheets.enabled && sheets.spreadsheet_id.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "sheets.spreadsheet_id is required when sheets logging is enabled".into(),
                ));
            }
        }

        Ok(())
    }

    /// The model API key, or the fatal startup error when there is none.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                key_file: self.api_key_file.clone(),
            })
    }

    /// Whether the model should be picked by probing the model list.
    pub fn auto_model(&self) -> bool {
        self.model.eq_ignore_ascii_case(AUTO_MODEL)
    }

    /// Sheets settings, only when logging is enabled.
    pub fn active_sheets(&self) -> Option<&SheetsConfig> {
        self.sheets.as_ref().filter(|s| s.enabled)
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self {
            sheets: Some(SheetsConfig {
                enabled: false,
                ..SheetsConfig::default()
            }),
            ..Self::default()
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_file: default_api_key_file(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            fallback_reply: default_fallback_reply(),
            persona: PersonaConfig::default(),
            sheets: None,
            gateway: GatewayConfig::default(),
        }
    }
}

/// Read a key file; a missing file means "no key", an unreadable one is an error.
fn read_key_file(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let key = content.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error(
        "No API key configured: set api_key in config.toml, export GOOGLE_API_KEY, or write the key to {}",
        .key_file.display()
    )]
    MissingApiKey { key_file: PathBuf },
}
