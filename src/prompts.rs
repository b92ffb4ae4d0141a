use std::path::{Path, PathBuf};

use log::{error, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Name of the prompt seeded when the backing file is missing or unreadable.
pub const DEFAULT_PROMPT_NAME: &str = "Default";

const DEFAULT_PROMPT_TEXT: &str = "You are a helpful assistant that extracts recipe information \
     from text. Please analyze the following text and extract the recipe details in a structured \
     format.";

/// A named, reusable system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    pub prompt: String,
}

/// On-disk layout of the prompts file.
#[derive(Debug, Serialize, Deserialize)]
struct PromptFile {
    prompts: Vec<Prompt>,
    #[serde(rename = "currentPrompt")]
    current_prompt: String,
}

impl PromptFile {
    fn seeded() -> Self {
        PromptFile {
            prompts: vec![Prompt {
                name: DEFAULT_PROMPT_NAME.to_string(),
                prompt: DEFAULT_PROMPT_TEXT.to_string(),
            }],
            current_prompt: DEFAULT_PROMPT_NAME.to_string(),
        }
    }
}

/// A named collection of system prompts persisted as a JSON document, with
/// one prompt marked current.
///
/// Every operation reloads the file first, so edits made by other processes
/// are picked up; mutations rewrite the whole file. There is no file locking
/// across processes, last writer wins.
pub struct PromptStore {
    path: PathBuf,
}

impl PromptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PromptStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored prompts, in file order.
    pub async fn list(&self) -> Vec<Prompt> {
        self.load().await.prompts
    }

    /// The prompt marked current, falling back to the first stored prompt
    /// when the current pointer matches nothing.
    pub async fn get_current(&self) -> Prompt {
        let file = self.load().await;
        file.prompts
            .iter()
            .find(|p| p.name == file.current_prompt)
            .cloned()
            // the store is never empty: load() seeds a default entry
            .unwrap_or_else(|| file.prompts.first().cloned().unwrap_or_else(default_prompt))
    }

    /// Mark the prompt named `name` as current.
    ///
    /// Returns false, leaving the store untouched, when no such prompt exists.
    pub async fn set_current(&self, name: &str) -> bool {
        let mut file = self.load().await;
        if !file.prompts.iter().any(|p| p.name == name) {
            return false;
        }
        file.current_prompt = name.to_string();
        self.save(&file).await;
        true
    }

    /// Add a new prompt. The name is the uniqueness key; adding a name that
    /// already exists returns false without mutating the store.
    pub async fn add(&self, name: &str, prompt: &str) -> bool {
        let mut file = self.load().await;
        if file.prompts.iter().any(|p| p.name == name) {
            return false;
        }
        file.prompts.push(Prompt {
            name: name.to_string(),
            prompt: prompt.to_string(),
        });
        self.save(&file).await;
        true
    }

    async fn load(&self) -> PromptFile {
        match fs::read_to_string(&self.path).await {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(file) => return file,
                Err(e) => warn!("Prompts file {} is unparsable: {}", self.path.display(), e),
            },
            Err(e) => warn!("Could not read prompts file {}: {}", self.path.display(), e),
        }

        // Seed with the default prompt and persist it immediately
        let seeded = PromptFile::seeded();
        self.save(&seeded).await;
        seeded
    }

    async fn save(&self, file: &PromptFile) {
        match serde_json::to_string_pretty(file) {
            Ok(data) => {
                if let Err(e) = fs::write(&self.path, data).await {
                    error!("Failed to save prompts to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => error!("Failed to serialize prompts: {}", e),
        }
    }
}

fn default_prompt() -> Prompt {
    Prompt {
        name: DEFAULT_PROMPT_NAME.to_string(),
        prompt: DEFAULT_PROMPT_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> PromptStore {
        PromptStore::new(dir.path().join("prompts.json"))
    }

    #[tokio::test]
    async fn test_missing_file_seeds_default() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let prompts = store.list().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, DEFAULT_PROMPT_NAME);

        // the seed must be persisted immediately
        assert!(store.path().exists());
        let current = store.get_current().await;
        assert_eq!(current.name, DEFAULT_PROMPT_NAME);
    }

    #[tokio::test]
    async fn test_unparsable_file_seeds_default() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json at all").unwrap();

        let prompts = store.list().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, DEFAULT_PROMPT_NAME);
    }

    #[tokio::test]
    async fn test_add_unique_then_duplicate() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.add("Terse", "Only output JSON.").await);
        let listed: Vec<_> = store
            .list()
            .await
            .into_iter()
            .filter(|p| p.name == "Terse")
            .collect();
        assert_eq!(listed.len(), 1);

        // duplicate name leaves the store unchanged
        assert!(!store.add("Terse", "Different text").await);
        let listed = store.list().await;
        let terse = listed.iter().find(|p| p.name == "Terse").unwrap();
        assert_eq!(terse.prompt, "Only output JSON.");
    }

    #[tokio::test]
    async fn test_set_current_existing_and_missing() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.add("Terse", "Only output JSON.").await;

        assert!(store.set_current("Terse").await);
        assert_eq!(store.get_current().await.name, "Terse");

        assert!(!store.set_current("NoSuchPrompt").await);
        // unchanged after the failed call
        assert_eq!(store.get_current().await.name, "Terse");
    }

    #[tokio::test]
    async fn test_get_current_falls_back_to_first() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{
                "prompts": [
                    { "name": "First", "prompt": "first text" },
                    { "name": "Second", "prompt": "second text" }
                ],
                "currentPrompt": "Dangling"
            }"#,
        )
        .unwrap();

        let current = store.get_current().await;
        assert_eq!(current.name, "First");
    }

    #[tokio::test]
    async fn test_reads_see_external_edits() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.list().await; // seed

        // Another process rewrites the file between our calls
        std::fs::write(
            store.path(),
            r#"{
                "prompts": [{ "name": "External", "prompt": "edited" }],
                "currentPrompt": "External"
            }"#,
        )
        .unwrap();

        assert_eq!(store.get_current().await.name, "External");
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_json() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.add("Terse", "Only output JSON.").await;

        let data = std::fs::read_to_string(store.path()).unwrap();
        assert!(data.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert!(parsed["prompts"].is_array());
        assert!(parsed["currentPrompt"].is_string());
    }
}
