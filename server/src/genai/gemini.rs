//! Google Generative Language API client.
//!
//! Thin HTTP wrapper over three endpoints: `:predict` for image synthesis,
//! `:generateContent` for schema-constrained suggestion generation, and
//! `:streamGenerateContent?alt=sse` for streaming chat. Pure parsing
//! functions for testability; the provider's prompt/response formats are
//! taken as given.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};

use super::config::GenAiConfig;
use super::types::{AspectRatio, ChatChunks, ChatTurn, GenAiError, GeneratedImage, Suggestion};

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    image_model: String,
    text_model: String,
}

impl GeminiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::HttpClientBuild`] if the HTTP client fails.
    pub fn new(config: GenAiConfig) -> Result<Self, GenAiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| GenAiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            image_model: config.image_model,
            text_model: config.text_model,
        })
    }

    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<String, GenAiError> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenAiError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenAiError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(GenAiError::ApiResponse { status, body: text });
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl super::types::GenAi for GeminiClient {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, GenAiError> {
        let url = format!("{}/models/{}:predict", self.base_url, self.image_model);
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "outputMimeType": "image/png",
                "aspectRatio": aspect_ratio.as_str(),
            },
        });

        let text = self.post_json(&url, &body).await?;
        parse_image_response(&text)
    }

    async fn suggest_scenes(&self, scene_prompt: &str) -> Result<Vec<Suggestion>, GenAiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.text_model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": build_suggestion_prompt(scene_prompt) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": suggestion_response_schema(),
            },
        });

        let text = self.post_json(&url, &body).await?;
        parse_suggestions_response(&text)
    }

    async fn stream_chat(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<Box<dyn ChatChunks>, GenAiError> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.text_model
        );
        let body = json!({ "contents": chat_contents(history, message) });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let text = response.text().await.unwrap_or_default();
            return Err(GenAiError::ApiResponse { status, body: text });
        }

        let stream = response.bytes_stream().map(|r| {
            r.map(|b| b.to_vec())
                .map_err(|e| GenAiError::ApiRequest(e.to_string()))
        });
        Ok(Box::new(SseChunks::from_stream(stream)))
    }
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

/// Instruction sent with the current scene prompt to obtain exactly one
/// follow-up suggestion per fixed category.
fn build_suggestion_prompt(scene_prompt: &str) -> String {
    format!(
        "The current storyboard scene is: \"{scene_prompt}\".\n\
         Based on this, provide 3 creative and distinct suggestions for the next scene.\n\
         Each suggestion should be a concise, descriptive prompt suitable for an image generation model.\n\
         Categorize your suggestions into: \"Camera Shot\", \"Action/Movement\", and \"Detail Focus\".\n\
         Provide exactly one suggestion per category."
    )
}

/// JSON schema for the structured suggestion response. The API expects
/// uppercase type names.
fn suggestion_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "category": { "type": "STRING" },
                "prompt": { "type": "STRING" },
            },
            "required": ["category", "prompt"],
        },
    })
}

/// Convert prior turns plus the new user message into API `contents`.
fn chat_contents(history: &[ChatTurn], message: &str) -> Vec<Value> {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| json!({ "role": turn.role.provider_str(), "parts": [{ "text": turn.text }] }))
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));
    contents
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_image_response(body: &str) -> Result<GeneratedImage, GenAiError> {
    let api: PredictResponse =
        serde_json::from_str(body).map_err(|e| GenAiError::ApiParse(e.to_string()))?;

    api.predictions
        .into_iter()
        .find_map(|p| {
            p.bytes_base64_encoded.map(|bytes_base64| GeneratedImage {
                bytes_base64,
                mime_type: p.mime_type.unwrap_or_else(|| "image/png".to_string()),
            })
        })
        .ok_or_else(|| GenAiError::EmptyResponse("no image was generated".into()))
}

fn parse_suggestions_response(body: &str) -> Result<Vec<Suggestion>, GenAiError> {
    let api: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GenAiError::ApiParse(e.to_string()))?;

    let Some(text) = candidate_text(&api) else {
        return Err(GenAiError::EmptyResponse("no suggestions in response".into()));
    };

    serde_json::from_str::<Vec<Suggestion>>(text.trim())
        .map_err(|e| GenAiError::ApiParse(format!("structured suggestions: {e}")))
}

/// Concatenate the text parts of the first candidate, if any.
fn candidate_text(api: &GenerateContentResponse) -> Option<String> {
    let content = api.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

/// Extract the chunk text from one SSE `data:` line. Non-data lines,
/// keep-alives, and end-of-stream markers yield `None`.
fn parse_sse_data_line(line: &str) -> Option<String> {
    let line = line.trim();
    let payload = line.strip_prefix("data:")?.trim_start();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }

    let api: GenerateContentResponse = serde_json::from_str(payload).ok()?;
    candidate_text(&api)
}

/// Split complete (newline-terminated) lines off the front of `buffer`,
/// leaving any trailing partial line in place.
fn drain_complete_lines(buffer: &mut String) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(newline) = buffer.find('\n') {
        let line = buffer[..newline].trim_end_matches('\r').to_string();
        buffer.drain(..=newline);
        lines.push(line);
    }
    lines
}

// =============================================================================
// SSE CHUNK STREAM
// =============================================================================

type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, GenAiError>> + Send>>;

/// Pull-based reader over an SSE byte stream. Each `next_chunk` call
/// resolves to one text delta; transport failures end the stream with an
/// error item.
struct SseChunks {
    stream: ByteStream,
    buffer: String,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl SseChunks {
    fn from_stream(
        stream: impl Stream<Item = Result<Vec<u8>, GenAiError>> + Send + 'static,
    ) -> Self {
        Self {
            stream: Box::pin(stream),
            buffer: String::new(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    fn ingest(&mut self, bytes: &[u8]) {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        for line in drain_complete_lines(&mut self.buffer) {
            if let Some(text) = parse_sse_data_line(&line) {
                self.pending.push_back(text);
            }
        }
    }

    /// Flush a final unterminated line once the transport ends.
    fn ingest_tail(&mut self) {
        let tail = std::mem::take(&mut self.buffer);
        if let Some(text) = parse_sse_data_line(&tail) {
            self.pending.push_back(text);
        }
    }
}

#[async_trait::async_trait]
impl ChatChunks for SseChunks {
    async fn next_chunk(&mut self) -> Option<Result<String, GenAiError>> {
        loop {
            if let Some(text) = self.pending.pop_front() {
                return Some(Ok(text));
            }
            if self.exhausted {
                return None;
            }

            match self.stream.next().await {
                Some(Ok(bytes)) => self.ingest(&bytes),
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
                None => {
                    self.exhausted = true;
                    self.ingest_tail();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
