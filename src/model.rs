use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Structured recipe data as returned by an LLM backend.
///
/// `title`, `ingredients` and `steps` are required by the generation schema;
/// `duration` and `notes` may be absent when the source page does not
/// mention them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

impl Recipe {
    /// Parse the raw text of an LLM response into a `Recipe`.
    ///
    /// The backend is asked for schema-constrained JSON, but its output is
    /// untrusted text until this parse succeeds.
    pub fn from_llm_json(raw: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_recipe() {
        let raw = r#"{"title":"Soup","ingredients":["water"],"steps":[]}"#;
        let recipe = Recipe::from_llm_json(raw).unwrap();
        assert_eq!(recipe.title, "Soup");
        assert_eq!(recipe.ingredients, vec!["water"]);
        assert!(recipe.steps.is_empty());
        assert!(recipe.duration.is_none());
        assert!(recipe.notes.is_none());
    }

    #[test]
    fn test_parse_full_recipe() {
        let raw = r#"{
            "title": "Banana Bread",
            "duration": "1 hour",
            "ingredients": ["3 bananas", "2 cups flour"],
            "steps": ["Mash bananas", "Bake at 350F"],
            "notes": ["Use ripe bananas"]
        }"#;
        let recipe = Recipe::from_llm_json(raw).unwrap();
        assert_eq!(recipe.duration.as_deref(), Some("1 hour"));
        assert_eq!(recipe.notes.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_required_fields() {
        // title is required
        let raw = r#"{"ingredients":["water"],"steps":[]}"#;
        assert!(Recipe::from_llm_json(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(Recipe::from_llm_json("Sure! Here is your recipe:").is_err());
    }
}
