use thiserror::Error;

/// Errors that can occur during recipe extraction operations
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Failed to fetch the webpage or got a non-success status
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The fetched document has no <body> element
    #[error("Fetched document has no <body> element")]
    NoBody,

    /// An unknown model variant was requested
    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    /// The LLM backend reported a failure
    #[error("LLM backend error: {0}")]
    Backend(String),

    /// The LLM output could not be parsed as a recipe
    #[error("Failed to parse LLM output as a recipe: {0}")]
    SchemaParse(#[from] serde_json::Error),

    /// Prompt store file could not be read or written
    #[error("Prompt store error: {0}")]
    PromptStore(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
