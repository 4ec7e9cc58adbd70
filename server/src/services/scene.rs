//! Scene service — image generation and next-scene suggestions.
//!
//! DESIGN
//! ======
//! `generate_scene` composes the final prompt (user prompt + visual-style
//! suffix), requests one image, and returns a data-URL payload that still
//! carries the original pre-suffix prompt — the entry the browser appends
//! must equal what the user typed. `fetch_suggestions` normalizes the
//! provider's structured output to exactly one suggestion per fixed
//! category, in canonical order.

use std::sync::Arc;

use frames::ErrorCode;
use tracing::info;

use crate::genai::{AspectRatio, GenAi, GenAiError, Suggestion};

/// Fixed suggestion categories, in canonical display order.
pub const SUGGESTION_CATEGORIES: [&str; 3] = ["Camera Shot", "Action/Movement", "Detail Focus"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,
    #[error("unknown aspect ratio: {0}")]
    InvalidAspectRatio(String),
    #[error("suggestion set invalid: {0}")]
    InvalidSuggestions(String),
    #[error(transparent)]
    GenAi(#[from] GenAiError),
}

impl ErrorCode for SceneError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::InvalidAspectRatio(_) => "E_INVALID_ASPECT_RATIO",
            Self::InvalidSuggestions(_) => "E_INVALID_SUGGESTIONS",
            Self::GenAi(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::GenAi(e) if e.retryable())
    }
}

/// Result of a successful generation, ready to append as a storyboard entry.
#[derive(Debug, Clone)]
pub struct ScenePayload {
    /// Encoded raster image as a `data:` URL.
    pub image: String,
    /// The originating prompt, pre-style-suffix.
    pub prompt: String,
    /// Echo of the validated aspect-ratio token.
    pub aspect_ratio: &'static str,
}

// =============================================================================
// GENERATION
// =============================================================================

/// Append the visual-style suffix used for every image request.
#[must_use]
pub fn compose_full_prompt(prompt: &str, style: &str) -> String {
    format!("{prompt}, {style} style, high detail, cinematic lighting")
}

/// Generate one image for a scene prompt.
///
/// # Errors
///
/// Returns [`SceneError::EmptyPrompt`] / [`SceneError::InvalidAspectRatio`]
/// for bad input and a wrapped [`GenAiError`] when the provider call fails;
/// a failure aborts the pending generation.
pub async fn generate_scene(
    genai: &Arc<dyn GenAi>,
    prompt: &str,
    style: &str,
    aspect_ratio: &str,
) -> Result<ScenePayload, SceneError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(SceneError::EmptyPrompt);
    }
    let ratio = AspectRatio::parse(aspect_ratio)
        .ok_or_else(|| SceneError::InvalidAspectRatio(aspect_ratio.to_string()))?;

    let full_prompt = compose_full_prompt(prompt, style);
    info!(prompt_len = full_prompt.len(), ratio = %ratio, "scene: generating image");

    let image = genai.generate_image(&full_prompt, ratio).await?;

    Ok(ScenePayload {
        image: format!("data:{};base64,{}", image.mime_type, image.bytes_base64),
        prompt: prompt.to_string(),
        aspect_ratio: ratio.as_str(),
    })
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Fetch next-scene suggestions for the current scene's prompt.
///
/// # Errors
///
/// Returns a wrapped [`GenAiError`] on provider failure and
/// [`SceneError::InvalidSuggestions`] when the structured output does not
/// cover the fixed category set. Callers report the failure without rolling
/// back an already-produced image.
pub async fn fetch_suggestions(
    genai: &Arc<dyn GenAi>,
    scene_prompt: &str,
) -> Result<Vec<Suggestion>, SceneError> {
    let scene_prompt = scene_prompt.trim();
    if scene_prompt.is_empty() {
        return Err(SceneError::EmptyPrompt);
    }

    let raw = genai.suggest_scenes(scene_prompt).await?;
    let normalized = normalize_suggestions(raw)?;
    info!(count = normalized.len(), "scene: suggestions ready");
    Ok(normalized)
}

/// Validate the provider output against the fixed category contract:
/// exactly three items, one per category, reordered canonically.
pub(crate) fn normalize_suggestions(raw: Vec<Suggestion>) -> Result<Vec<Suggestion>, SceneError> {
    if raw.len() != SUGGESTION_CATEGORIES.len() {
        return Err(SceneError::InvalidSuggestions(format!(
            "expected {} suggestions, got {}",
            SUGGESTION_CATEGORIES.len(),
            raw.len()
        )));
    }

    let mut normalized = Vec::with_capacity(SUGGESTION_CATEGORIES.len());
    for category in SUGGESTION_CATEGORIES {
        let found = raw
            .iter()
            .find(|s| s.category.trim().eq_ignore_ascii_case(category))
            .ok_or_else(|| SceneError::InvalidSuggestions(format!("missing category {category:?}")))?;
        let prompt = found.prompt.trim();
        if prompt.is_empty() {
            return Err(SceneError::InvalidSuggestions(format!("empty prompt for {category:?}")));
        }
        normalized.push(Suggestion { category: category.to_string(), prompt: prompt.to_string() });
    }

    Ok(normalized)
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod tests;
