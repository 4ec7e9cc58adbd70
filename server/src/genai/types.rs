//! Generative-AI types — provider-neutral requests, results, and errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by generative-AI client operations.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider answered successfully but produced no usable content.
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl frames::ErrorCode for GenAiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::EmptyResponse(_) => "E_EMPTY_RESPONSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// ASPECT RATIO
// =============================================================================

/// Aspect-ratio token accepted by the image model. Fixed enumerated set;
/// anything else is rejected before the request leaves the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    FourThree,
    SixteenNine,
    NineSixteen,
}

impl AspectRatio {
    /// Parse a wire token (`"16:9"` etc.). Returns `None` for unknown tokens.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1:1" => Some(Self::Square),
            "4:3" => Some(Self::FourThree),
            "16:9" => Some(Self::SixteenNine),
            "9:16" => Some(Self::NineSixteen),
            _ => None,
        }
    }

    /// The wire/provider token form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::FourThree => "4:3",
            Self::SixteenNine => "16:9",
            Self::NineSixteen => "9:16",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CHAT TURNS
// =============================================================================

/// Attribution of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role label expected by the provider API ("user" / "model").
    #[must_use]
    pub fn provider_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "model",
        }
    }
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One generated raster image, still in the provider's base64 form.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes_base64: String,
    pub mime_type: String,
}

/// A categorized candidate prompt for the next scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: String,
    pub prompt: String,
}

// =============================================================================
// TRAITS
// =============================================================================

/// An in-flight streaming chat reply, consumed one chunk at a time.
///
/// The explicit pull model gives callers a defined cancellation point between
/// chunks: stop calling `next_chunk` and drop the value to abandon the stream.
#[async_trait::async_trait]
pub trait ChatChunks: Send {
    /// Await the next text chunk. `None` means the reply completed.
    async fn next_chunk(&mut self) -> Option<Result<String, GenAiError>>;
}

/// Provider-neutral async trait for the generative-AI gateway. Enables
/// mocking in tests.
#[async_trait::async_trait]
pub trait GenAi: Send + Sync {
    /// Request exactly one image for a finalized prompt.
    ///
    /// # Errors
    ///
    /// Returns a [`GenAiError`] if the request fails, the response is
    /// malformed, or no image was produced.
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, GenAiError>;

    /// Request categorized follow-up prompts for the current scene.
    ///
    /// The returned list is the provider's raw structured output; the scene
    /// service normalizes it against the fixed category set.
    ///
    /// # Errors
    ///
    /// Returns a [`GenAiError`] if the request fails or the structured
    /// output cannot be parsed.
    async fn suggest_scenes(&self, scene_prompt: &str) -> Result<Vec<Suggestion>, GenAiError>;

    /// Open one streaming chat turn over the prior history.
    ///
    /// # Errors
    ///
    /// Returns a [`GenAiError`] if the stream cannot be opened. Mid-stream
    /// failures surface through [`ChatChunks::next_chunk`].
    async fn stream_chat(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<Box<dyn ChatChunks>, GenAiError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
