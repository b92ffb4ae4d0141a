//! JSON schema for the recipe shape requested from every backend.
//!
//! There is exactly one canonical definition; the per-backend representations
//! are derived from it so the two cannot drift apart.

use serde_json::{json, Value};

/// Field order requested from backends that support deterministic ordering.
pub const FIELD_ORDER: [&str; 5] = ["title", "duration", "ingredients", "steps", "notes"];

/// The canonical JSON-Schema document describing a recipe.
///
/// `title`, `ingredients` and `steps` are required; `duration` and `notes`
/// are optional.
pub fn recipe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "The title of the recipe"
            },
            "duration": {
                "type": "string",
                "description": "The cooking duration of the recipe"
            },
            "ingredients": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of ingredients needed for the recipe"
            },
            "steps": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of cooking steps"
            },
            "notes": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Additional notes or tips for the recipe"
            }
        },
        "required": ["title", "ingredients", "steps"]
    })
}

/// Schema representation for the Gemini backend.
///
/// Gemini honours `propertyOrdering` for stable field order in its output.
pub fn gemini_schema() -> Value {
    let mut schema = recipe_schema();
    schema["propertyOrdering"] = json!(FIELD_ORDER);
    schema
}

/// Schema representation for the Ollama backend: the bare canonical document,
/// passed as the request's `format` constraint.
pub fn ollama_schema() -> Value {
    recipe_schema()
}
