//! Application configuration for Sales Insights.
//!
//! User config lives at `~/.salesinsights/salesinsights.toml`.
//! CLI flags override config file values, which override defaults.
//! Credentials never live in the file: each service section names the
//! environment variable that holds its key.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesInsightsError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "salesinsights.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".salesinsights";

// ---------------------------------------------------------------------------
// Config structs (matching salesinsights.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Web search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Text-generation settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name of the env var holding the search API key.
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    /// Search endpoint URL.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Search topic sent with every query.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Result cap per query.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Pause in ms between consecutive queries.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_key_env(),
            endpoint: default_search_endpoint(),
            topic: default_topic(),
            max_results: default_max_results(),
            pause_ms: default_pause_ms(),
        }
    }
}

fn default_search_key_env() -> String {
    "TAVILY_API_KEY".into()
}
fn default_search_endpoint() -> String {
    "https://api.tavily.com/search".into()
}
fn default_topic() -> String {
    "general".into()
}
fn default_max_results() -> u32 {
    4
}
fn default_pause_ms() -> u64 {
    500
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Name of the env var holding the text-generation API key.
    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model used for every report.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_llm_key_env(),
            base_url: default_llm_base_url(),
            model: default_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_key_env() -> String {
    "GROQ_API_KEY".into()
}
fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "openai/gpt-oss-20b".into()
}
fn default_llm_timeout() -> u64 {
    120
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory export files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.salesinsights/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SalesInsightsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.salesinsights/salesinsights.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SalesInsightsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SalesInsightsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SalesInsightsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SalesInsightsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SalesInsightsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that both service API key env vars are set and non-empty.
pub fn validate_api_keys(config: &AppConfig) -> Result<()> {
    require_env(&config.search.api_key_env, "Search")?;
    require_env(&config.llm.api_key_env, "Text-generation")?;
    Ok(())
}

fn require_env(var_name: &str, service: &str) -> Result<()> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(SalesInsightsError::config(format!(
            "{service} API key not found. Set the {var_name} environment variable \
             (a .env file in the working directory is also read)."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("TAVILY_API_KEY"));
        assert!(toml_str.contains("GROQ_API_KEY"));
        assert!(toml_str.contains("openai/gpt-oss-20b"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.max_results, 4);
        assert_eq!(parsed.search.topic, "general");
        assert_eq!(parsed.search.pause_ms, 500);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[search]
pause_ms = 0

[export]
output_dir = "/tmp/reports"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.search.pause_ms, 0);
        assert_eq!(config.search.max_results, 4);
        assert_eq!(config.llm.model, "openai/gpt-oss-20b");
        assert_eq!(config.export.output_dir, "/tmp/reports");
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use unique env var names to avoid interfering with other tests
        config.search.api_key_env = "SI_TEST_NONEXISTENT_SEARCH_KEY_12345".into();
        config.llm.api_key_env = "SI_TEST_NONEXISTENT_LLM_KEY_12345".into();
        let result = validate_api_keys(&config);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Search API key not found"));
        assert!(msg.contains("SI_TEST_NONEXISTENT_SEARCH_KEY_12345"));
    }
}
