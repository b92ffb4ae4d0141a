use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::llm::schema::{gemini_schema, ollama_schema};
use crate::llm::{GeminiClient, LlmClient, LlmResponse, OllamaClient};
use crate::page::PageFetcher;
use crate::prompts::PromptStore;

/// Tag selecting which LLM backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelType {
    /// Hosted Gemini backend
    #[default]
    Gemini,
    /// Local Ollama backend
    Ollama,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Gemini => "gemini",
            ModelType::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(ModelType::Gemini),
            "ollama" => Ok(ModelType::Ollama),
            other => Err(ExtractError::UnsupportedModel(other.to_string())),
        }
    }
}

/// The orchestrator: holds the active LLM client and drives the
/// URL → page text → structured-JSON flow.
///
/// Construct one per application; there is no ambient global instance.
pub struct RecipeExtractor {
    config: AppConfig,
    store: PromptStore,
    fetcher: PageFetcher,
    model_type: ModelType,
    client: Box<dyn LlmClient>,
}

impl RecipeExtractor {
    /// Build an extractor from configuration, with the prompt store's
    /// current prompt applied to the default model variant.
    pub async fn new(config: AppConfig) -> Result<Self, ExtractError> {
        let model_type = config.default_model.parse()?;
        let store = PromptStore::new(&config.prompts_path);
        let timeout = Duration::from_secs(config.timeout);
        let fetcher = PageFetcher::new(Some(timeout));

        let mut client = build_client(model_type, &config);
        let current = store.get_current().await;
        client.set_prompt(&current.prompt);

        Ok(RecipeExtractor {
            config,
            store,
            fetcher,
            model_type,
            client,
        })
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// The prompt collection backing this extractor.
    pub fn prompts(&self) -> &PromptStore {
        &self.store
    }

    /// The working system prompt the active client will send.
    pub fn current_prompt(&self) -> &str {
        self.client.prompt()
    }

    /// Switch the active backend.
    ///
    /// A fresh client is constructed and the store's current prompt is
    /// replayed onto it; prompt text never carries over implicitly between
    /// client instances.
    pub async fn set_model_type(&mut self, model_type: ModelType) {
        self.model_type = model_type;
        self.client = build_client(model_type, &self.config);
        let current = self.store.get_current().await;
        self.client.set_prompt(&current.prompt);
    }

    /// Switch the active backend by name ("gemini" or "ollama").
    pub async fn set_model(&mut self, name: &str) -> Result<(), ExtractError> {
        let model_type = name.parse()?;
        self.set_model_type(model_type).await;
        Ok(())
    }

    /// Replace the active client's working prompt verbatim, without touching
    /// the store.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.client.set_prompt(prompt);
    }

    /// Mark the stored prompt named `name` as current and apply it to the
    /// active client. Returns false when no such prompt exists.
    pub async fn select_prompt(&mut self, name: &str) -> bool {
        if !self.store.set_current(name).await {
            return false;
        }
        let current = self.store.get_current().await;
        self.client.set_prompt(&current.prompt);
        true
    }

    /// Ask the active backend to extract a recipe from raw text.
    ///
    /// Backend failures live inside the returned envelope; this never errors.
    /// The envelope's `response` field is untrusted text, parse it with
    /// [`crate::Recipe::from_llm_json`].
    pub async fn extract_recipe(&self, text: &str) -> LlmResponse {
        debug!("Extracting recipe using {}", self.model_type);
        let schema = schema_for(self.model_type);
        self.client.generate(text, Some(&schema)).await
    }

    /// The full pipeline: fetch the page, strip it to body text, then run
    /// the extraction. The generate stage never starts when the fetch fails.
    pub async fn extract_from_url(&self, url: &str) -> Result<LlmResponse, ExtractError> {
        let text = self.fetcher.fetch_text(url).await?;
        Ok(self.extract_recipe(&text).await)
    }
}

fn build_client(model_type: ModelType, config: &AppConfig) -> Box<dyn LlmClient> {
    let timeout = Duration::from_secs(config.timeout);
    match model_type {
        ModelType::Gemini => Box::new(GeminiClient::new(&config.gemini, timeout)),
        ModelType::Ollama => Box::new(OllamaClient::new(&config.ollama, timeout)),
    }
}

/// The schema representation bound to each backend variant. Both derive from
/// the same canonical definition in [`crate::llm::schema`].
fn schema_for(model_type: ModelType) -> Value {
    match model_type {
        ModelType::Gemini => gemini_schema(),
        ModelType::Ollama => ollama_schema(),
    }
}
