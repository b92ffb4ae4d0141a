use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::OllamaConfig;
use crate::llm::{compose_prompt, LlmClient, LlmResponse};

/// Client for a local Ollama inference server.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    prompt: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration.
    pub fn new(config: &OllamaConfig, timeout: Duration) -> Self {
        OllamaClient {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            prompt: String::new(),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaClient {
            client: Client::new(),
            base_url,
            model,
            prompt: String::new(),
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn backend_name(&self) -> &str {
        "ollama"
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    async fn generate(&self, text: &str, schema: Option<&Value>) -> LlmResponse {
        // Non-streaming generate endpoint; the schema (if any) rides along as
        // the "format" constraint understood by the server.
        let mut payload = json!({
            "model": self.model,
            "prompt": compose_prompt(&self.prompt, text),
            "stream": false
        });
        if let Some(schema) = schema {
            payload["format"] = schema.clone();
        }

        let response = match self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to reach Ollama server: {}", e);
                return LlmResponse::failure(format!("Failed to talk with Ollama server: {}", e));
            }
        };

        if !response.status().is_success() {
            return LlmResponse::failure(format!(
                "Failed to talk with Ollama server: status {}",
                response.status()
            ));
        }

        match response.json::<Value>().await {
            Ok(body) => {
                debug!("Ollama response: {:?}", body);
                LlmResponse::text(body["response"].as_str().unwrap_or_default())
            }
            Err(e) => LlmResponse::failure(format!("Invalid response from Ollama server: {}", e)),
        }
    }
}
