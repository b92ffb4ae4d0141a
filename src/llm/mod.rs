mod gemini;
mod ollama;
pub mod schema;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform envelope every backend returns.
///
/// `response` holds the raw generated text (expected to be JSON when a schema
/// was supplied); on backend failure `error` is set and `response` is empty.
/// Backend failures never propagate as `Err` past the client boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LlmResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            response: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Unified trait for all LLM backends
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the backend name (e.g., "gemini", "ollama")
    fn backend_name(&self) -> &str;

    /// Replace the working system prompt
    fn set_prompt(&mut self, prompt: &str);

    /// The working system prompt currently applied to outgoing requests
    fn prompt(&self) -> &str;

    /// Generate content for `text`, optionally constrained to a JSON schema
    async fn generate(&self, text: &str, schema: Option<&Value>) -> LlmResponse;
}

/// Concatenation rule shared by all backends, so prompt text authored for one
/// backend behaves predictably when the user switches to another.
pub(crate) fn compose_prompt(system_prompt: &str, text: &str) -> String {
    format!("{}\n{}", system_prompt, text)
}
