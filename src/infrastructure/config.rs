use crate::domain::error::TranslateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_paging")]
    pub paging: bool,
    #[serde(default = "default_pager_command")]
    pub pager_command: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub clear_screen: bool,
    #[serde(default = "default_enable_emoji")]
    pub enable_emoji: bool,
    /// Quiet period before a live-mode edit is translated.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
    #[serde(default = "default_cache")]
    pub cache: bool,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_document_temperature")]
    pub document_temperature: f32,
    #[serde(default = "default_document_thinking_budget")]
    pub document_thinking_budget: u32,
}

impl GeminiConfig {
    /// Configured key first, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| {
                API_KEY_ENV_VARS.iter().find_map(|name| {
                    std::env::var(name)
                        .ok()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                })
            })
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            document_temperature: default_document_temperature(),
            document_thinking_budget: default_document_thinking_budget(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paging: true,
            pager_command: default_pager_command(),
            theme: default_theme(),
            clear_screen: false,
            enable_emoji: true,
            debounce_ms: default_debounce_ms(),
            max_document_bytes: default_max_document_bytes(),
            cache: true,
            logging: Logging::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

// Defaults
fn default_paging() -> bool {
    true
}
fn default_pager_command() -> String {
    // Windows 使用 more，Unix 系统使用 less
    if cfg!(target_os = "windows") {
        "more".to_string()
    } else {
        "less -RF".to_string()
    }
}
fn default_theme() -> String {
    "temp".to_string()
}
fn default_enable_emoji() -> bool {
    true
}
fn default_debounce_ms() -> u64 {
    1000
}
fn default_max_document_bytes() -> u64 {
    10 * 1024 * 1024
}
fn default_cache() -> bool {
    true
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_document_temperature() -> f32 {
    0.1
}
fn default_document_thinking_budget() -> u32 {
    1000
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dolmetscher").join("config.toml"))
}

/// Get cache database path (uses config directory by default)
pub fn get_database_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dolmetscher")
        .join("cache.db")
}

pub fn parse_config(content: &str) -> Result<Config, TranslateError> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn load_config() -> Result<Config, TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| TranslateError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| TranslateError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(TranslateError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.paging);
        assert!(config.cache);
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.max_document_bytes, 10 * 1024 * 1024);
        assert_eq!(config.logging.level, "WARN");
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = parse_config(
            r#"
paging = false
debounce_ms = 250

[logging]
level = "DEBUG"
path = "/tmp/dol.log"

[gemini]
api_key = "abc"
model = "gemini-2.5-flash"
"#,
        )
        .unwrap();

        assert!(!config.paging);
        assert_eq!(config.debounce_ms, 250);
        assert!(config.logging.enable);
        assert_eq!(config.logging.level, "DEBUG");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.document_thinking_budget, 1000);
        assert_eq!(config.gemini.resolve_api_key().as_deref(), Some("abc"));
    }

    #[test]
    fn sample_config_round_trips() {
        let sample = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed = parse_config(&sample).unwrap();
        assert_eq!(parsed.pager_command, default_pager_command());
        assert_eq!(parsed.gemini.timeout_secs, 120);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            parse_config("paging = ["),
            Err(TranslateError::Toml(_))
        ));
    }
}
