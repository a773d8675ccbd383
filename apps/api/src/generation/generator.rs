//! Brochure Generation — one prompt → generator → parse → structural check cycle.
//!
//! Every generator call in the service goes through `generate_brochure`, whether it
//! is the first draft, an optimization attempt, or a measurement-driven correction.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::generation::context::GenerationContext;
use crate::generation::prompts::build_brochure_prompt;
use crate::llm_client::prompts::BROCHURE_DESIGNER_SYSTEM;
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::models::brochure::{BrochureContent, Section};

/// Temperature for a first draft.
pub const BASE_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator was unreachable, returned a non-success status, or did not return JSON.
    #[error("Generator call failed: {0}")]
    Upstream(#[from] LlmError),

    /// The generator returned JSON that is not a usable brochure.
    #[error("Invalid brochure structure: {0}")]
    Structure(String),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Upstream(e) => AppError::Llm(e.to_string()),
            GenerationError::Structure(msg) => AppError::InvalidStructure(msg),
        }
    }
}

/// Generates one brochure for `context` at the given temperature.
///
/// The returned content always carries the request's settings, whatever the generator echoed.
pub async fn generate_brochure(
    generator: &dyn TextGenerator,
    context: &GenerationContext,
    temperature: f32,
) -> Result<BrochureContent, GenerationError> {
    let prompt = build_brochure_prompt(context);
    debug!(temperature, "Brochure prompt:\n{prompt}");

    let raw = generator
        .generate(&prompt, BROCHURE_DESIGNER_SYSTEM, temperature)
        .await?;
    debug!("Raw generator response:\n{raw}");

    let mut content = parse_brochure(&raw)?;

    if content.settings != context.settings {
        warn!(
            "Generator changed settings ({:?}); restoring request settings",
            content.settings
        );
        content.settings = context.settings;
    }

    Ok(content)
}

/// Parses generator output into a brochure.
///
/// Code fences are stripped first. Non-JSON text is an upstream failure; JSON that
/// lacks a title, lacks a sections array, or repeats a feature id is a structural one.
pub fn parse_brochure(raw: &str) -> Result<BrochureContent, GenerationError> {
    let text = strip_json_fences(raw);
    let value: Value = serde_json::from_str(text).map_err(LlmError::Parse)?;

    let has_title = value
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.trim().is_empty());
    if !has_title {
        return Err(GenerationError::Structure(
            "missing or empty \"title\"".to_string(),
        ));
    }

    if !value.get("sections").is_some_and(Value::is_array) {
        return Err(GenerationError::Structure(
            "missing \"sections\" array".to_string(),
        ));
    }

    let content: BrochureContent = serde_json::from_value(value)
        .map_err(|e| GenerationError::Structure(format!("schema mismatch: {e}")))?;

    for (index, section) in content.sections.iter().enumerate() {
        if let Section::Features(features) = section {
            if let Some(id) = features.duplicate_feature_id() {
                return Err(GenerationError::Structure(format!(
                    "section {index}: duplicate feature id {id:?}"
                )));
            }
        }
    }

    Ok(content)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
