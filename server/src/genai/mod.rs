//! Generative-AI gateway — the only external collaborator.
//!
//! DESIGN
//! ======
//! Three thin operations against the hosted Generative Language API: one
//! image per prompt, three categorized follow-up prompts per scene, and one
//! streaming chat turn. `GenAiClient` is configured from environment
//! variables; the [`GenAi`] trait is the seam services and tests depend on.

pub mod config;
pub mod gemini;
pub mod types;

use config::GenAiConfig;
pub use types::{AspectRatio, ChatChunks, ChatTurn, GenAi, GenAiError, GeneratedImage, Role, Suggestion};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete generative-AI client backed by the Gemini/Imagen HTTP API.
///
/// Configured from environment variables by [`GenAiClient::from_env`].
pub struct GenAiClient {
    inner: gemini::GeminiClient,
}

impl GenAiClient {
    /// Build a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, a config value cannot be
    /// parsed, or the HTTP client fails to build.
    pub fn from_env() -> Result<Self, GenAiError> {
        Self::from_config(GenAiConfig::from_env()?)
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: GenAiConfig) -> Result<Self, GenAiError> {
        Ok(Self { inner: gemini::GeminiClient::new(config)? })
    }

    /// The configured image model name (e.g. `"imagen-4.0-generate-001"`).
    #[must_use]
    pub fn image_model(&self) -> &str {
        self.inner.image_model()
    }

    /// The configured text model name (e.g. `"gemini-2.5-flash"`).
    #[must_use]
    pub fn text_model(&self) -> &str {
        self.inner.text_model()
    }
}

// =============================================================================
// TEST SUPPORT
// =============================================================================

/// Scripted [`GenAi`] mock shared by service and route tests.
#[cfg(test)]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::types::{
        AspectRatio, ChatChunks, ChatTurn, GenAi, GenAiError, GeneratedImage, Suggestion,
    };

    /// One scripted chat stream: its chunks, and whether the stream should
    /// hang forever after draining them (for cancellation tests).
    pub struct ScriptedStream {
        pub chunks: Vec<Result<String, GenAiError>>,
        pub hang_after: bool,
    }

    impl ScriptedStream {
        #[must_use]
        pub fn of(chunks: Vec<Result<String, GenAiError>>) -> Self {
            Self { chunks, hang_after: false }
        }

        #[must_use]
        pub fn hanging(chunks: Vec<Result<String, GenAiError>>) -> Self {
            Self { chunks, hang_after: true }
        }
    }

    struct ScriptedChunks {
        items: VecDeque<Result<String, GenAiError>>,
        hang_after: bool,
    }

    #[async_trait::async_trait]
    impl ChatChunks for ScriptedChunks {
        async fn next_chunk(&mut self) -> Option<Result<String, GenAiError>> {
            if let Some(item) = self.items.pop_front() {
                return Some(item);
            }
            if self.hang_after {
                futures::future::pending::<()>().await;
            }
            None
        }
    }

    /// Mock provider returning scripted responses in FIFO order. Records the
    /// arguments of the most recent call per operation.
    #[derive(Default)]
    pub struct MockGenAi {
        images: Mutex<VecDeque<Result<GeneratedImage, GenAiError>>>,
        suggestions: Mutex<VecDeque<Result<Vec<Suggestion>, GenAiError>>>,
        streams: Mutex<VecDeque<Result<ScriptedStream, GenAiError>>>,
        pub seen_image_prompts: Mutex<Vec<(String, AspectRatio)>>,
        pub seen_suggest_prompts: Mutex<Vec<String>>,
        pub seen_chat_calls: Mutex<Vec<(Vec<ChatTurn>, String)>>,
    }

    impl MockGenAi {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_image(self, result: Result<GeneratedImage, GenAiError>) -> Self {
            self.images.lock().unwrap().push_back(result);
            self
        }

        #[must_use]
        pub fn with_suggestions(self, result: Result<Vec<Suggestion>, GenAiError>) -> Self {
            self.suggestions.lock().unwrap().push_back(result);
            self
        }

        #[must_use]
        pub fn with_stream(self, result: Result<ScriptedStream, GenAiError>) -> Self {
            self.streams.lock().unwrap().push_back(result);
            self
        }
    }

    /// A plausible canonical suggestion batch.
    #[must_use]
    pub fn canned_suggestions() -> Vec<Suggestion> {
        vec![
            Suggestion { category: "Camera Shot".into(), prompt: "Low-angle shot of the door".into() },
            Suggestion { category: "Action/Movement".into(), prompt: "The detective stands up".into() },
            Suggestion { category: "Detail Focus".into(), prompt: "Close-up on the window".into() },
        ]
    }

    #[must_use]
    pub fn canned_image() -> GeneratedImage {
        GeneratedImage { bytes_base64: "QUJD".into(), mime_type: "image/png".into() }
    }

    #[async_trait::async_trait]
    impl GenAi for MockGenAi {
        async fn generate_image(
            &self,
            prompt: &str,
            aspect_ratio: AspectRatio,
        ) -> Result<GeneratedImage, GenAiError> {
            self.seen_image_prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), aspect_ratio));
            self.images
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(canned_image()))
        }

        async fn suggest_scenes(&self, scene_prompt: &str) -> Result<Vec<Suggestion>, GenAiError> {
            self.seen_suggest_prompts
                .lock()
                .unwrap()
                .push(scene_prompt.to_string());
            self.suggestions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(canned_suggestions()))
        }

        async fn stream_chat(
            &self,
            history: &[ChatTurn],
            message: &str,
        ) -> Result<Box<dyn ChatChunks>, GenAiError> {
            self.seen_chat_calls
                .lock()
                .unwrap()
                .push((history.to_vec(), message.to_string()));
            let scripted = self
                .streams
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ScriptedStream::of(vec![Ok("Hello".into()), Ok(" there".into())])))?;
            Ok(Box::new(ScriptedChunks {
                items: scripted.chunks.into(),
                hang_after: scripted.hang_after,
            }))
        }
    }
}

#[async_trait::async_trait]
impl GenAi for GenAiClient {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, GenAiError> {
        self.inner.generate_image(prompt, aspect_ratio).await
    }

    async fn suggest_scenes(&self, scene_prompt: &str) -> Result<Vec<Suggestion>, GenAiError> {
        self.inner.suggest_scenes(scene_prompt).await
    }

    async fn stream_chat(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<Box<dyn ChatChunks>, GenAiError> {
        self.inner.stream_chat(history, message).await
    }
}
