use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Model variant to use when not specified ("gemini" or "ollama")
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Gemini (hosted) backend configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Ollama (local) backend configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Request timeout in seconds, applied to page fetches and LLM calls
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Path of the JSON file holding the prompt collection
    #[serde(default = "default_prompts_path")]
    pub prompts_path: String,
}

/// Configuration for the hosted Gemini backend
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// API key for authentication (can also be set via GEMINI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for the local Ollama backend
#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    /// Model identifier (e.g., "llama3")
    #[serde(default = "default_ollama_model")]
    pub model: String,
    /// Base URL of the local inference server
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            base_url: default_ollama_base_url(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
            timeout: default_timeout(),
            prompts_path: default_prompts_path(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_prompts_path() -> String {
    "prompts.json".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPES__GEMINI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Environment variables with RECIPES_ prefix
        // Use double underscore for nested: RECIPES__OLLAMA__BASE_URL
        .add_source(
            Environment::with_prefix("RECIPES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
