use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::llm::{compose_prompt, LlmClient, LlmResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the hosted Gemini backend.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    prompt: String,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration.
    ///
    /// The API key is taken from config, falling back to the GEMINI_API_KEY
    /// environment variable. A missing key is not an error here; the provider
    /// call itself will fail and surface as an error envelope.
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Self {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_default();

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        GeminiClient {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
            base_url,
            model: config.model.clone(),
            prompt: String::new(),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GeminiClient {
            client: Client::new(),
            api_key,
            base_url,
            model,
            prompt: String::new(),
        }
    }

    async fn request(
        &self,
        text: &str,
        schema: Option<&Value>,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": compose_prompt(&self.prompt, text) }]
            }]
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            });
        }

        let response_body: Value = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        debug!("Gemini response: {:?}", response_body);

        // Check for API error response
        if let Some(error) = response_body.get("error") {
            let error_code = error["code"].as_i64().unwrap_or(0);
            let error_message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(format!("Gemini API error ({}): {}", error_code, error_message).into());
        }

        let generated = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Gemini response")?
            .to_string();

        Ok(generated)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn backend_name(&self) -> &str {
        "gemini"
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    async fn generate(&self, text: &str, schema: Option<&Value>) -> LlmResponse {
        match self.request(text, schema).await {
            Ok(generated) => LlmResponse::text(generated),
            Err(e) => {
                error!("Error generating content with Gemini: {}", e);
                LlmResponse::failure("Failed to generate content with Gemini")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_client(base_url: String) -> GeminiClient {
        GeminiClient::with_base_url(
            "fake_api_key".to_string(),
            base_url,
            "gemini-2.0-flash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_schema() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "fake_api_key".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({
                    "contents": [{
                        "role": "user",
                        "parts": [{ "text": "Extract the recipe.\nTitle: Soup" }]
                    }]
                })),
                Matcher::PartialJson(serde_json::json!({
                    "generationConfig": { "responseMimeType": "application/json" }
                })),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{ "text": "{\"title\":\"Soup\",\"ingredients\":[],\"steps\":[]}" }]
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let mut client = test_client(server.url());
        client.set_prompt("Extract the recipe.");

        let schema = crate::llm::schema::gemini_schema();
        let result = client.generate("Title: Soup", Some(&schema)).await;

        assert!(!result.is_failure());
        assert!(result.response.contains("Soup"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_api_error_becomes_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 400, "message": "API key not valid"}}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.generate("some text", None).await;

        assert!(result.is_failure());
        assert!(result.response.is_empty());
    }

    #[tokio::test]
    async fn test_generate_network_error_becomes_envelope() {
        // Nothing listens on this port
        let client = test_client("http://127.0.0.1:9".to_string());
        let result = client.generate("some text", None).await;

        assert!(result.is_failure());
        assert!(result.response.is_empty());
        assert!(!result.error.as_deref().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_generate_without_schema_omits_generation_config() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::JsonString(
                serde_json::json!({
                    "contents": [{
                        "role": "user",
                        "parts": [{ "text": "\nplain text" }]
                    }]
                })
                .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.generate("plain text", None).await;

        assert_eq!(result.response, "ok");
        mock.assert_async().await;
    }
}
