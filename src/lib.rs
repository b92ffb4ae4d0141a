//! Extract structured recipe data from webpages using pluggable LLM backends.
//!
//! The pipeline fetches a recipe webpage, strips it to the visible body text,
//! and asks an LLM backend (hosted Gemini or a local Ollama server) to return
//! the recipe as schema-constrained JSON.
//!
//! # Example
//!
//! ```no_run
//! use recipe_extractor::{AppConfig, Recipe, RecipeExtractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let extractor = RecipeExtractor::new(config).await?;
//!
//!     let response = extractor
//!         .extract_from_url("https://example.com/recipe")
//!         .await?;
//!     let recipe = Recipe::from_llm_json(&response.response)?;
//!     println!("{}", recipe.title);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod model;
pub mod page;
pub mod prompts;

pub use config::AppConfig;
pub use error::ExtractError;
pub use extractor::{ModelType, RecipeExtractor};
pub use llm::{LlmClient, LlmResponse};
pub use model::Recipe;
pub use prompts::{Prompt, PromptStore};

/// Convenience function: fetch `url` and return the parsed recipe, using
/// configuration loaded from file and environment.
///
/// Backend failures carried in the response envelope are surfaced here as
/// [`ExtractError::Backend`]; malformed LLM output surfaces as
/// [`ExtractError::SchemaParse`].
pub async fn extract_recipe_from_url(url: &str) -> Result<Recipe, ExtractError> {
    let config = AppConfig::load()?;
    let extractor = RecipeExtractor::new(config).await?;

    let response = extractor.extract_from_url(url).await?;
    if let Some(error) = response.error {
        return Err(ExtractError::Backend(error));
    }

    Recipe::from_llm_json(&response.response)
}
