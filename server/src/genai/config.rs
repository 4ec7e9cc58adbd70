//! Generative-AI configuration parsed from environment variables.

use super::types::GenAiError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenAiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenAiConfig {
    pub api_key: String,
    pub image_model: String,
    pub text_model: String,
    pub base_url: String,
    pub timeouts: GenAiTimeouts,
}

impl GenAiConfig {
    /// Build typed config from process environment variables.
    ///
    /// Required:
    /// - the API key variable itself (named by `GENAI_API_KEY_ENV`,
    ///   default `GEMINI_API_KEY`)
    ///
    /// Optional:
    /// - `GENAI_API_KEY_ENV`: names the env var containing the key
    /// - `GENAI_IMAGE_MODEL`: default `imagen-4.0-generate-001`
    /// - `GENAI_TEXT_MODEL`: default `gemini-2.5-flash`
    /// - `GENAI_BASE_URL`: default Generative Language API base URL
    /// - `GENAI_REQUEST_TIMEOUT_SECS`: default 120
    /// - `GENAI_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::MissingApiKey`] when the key variable is unset
    /// and [`GenAiError::ConfigParse`] for unparseable values.
    pub fn from_env() -> Result<Self, GenAiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an injected variable lookup. Pure, so tests
    /// never have to mutate process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GenAiError> {
        let key_var = lookup("GENAI_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string());
        let api_key = lookup(&key_var).ok_or(GenAiError::MissingApiKey { var: key_var })?;

        let image_model = lookup("GENAI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        let text_model = lookup("GENAI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());
        let base_url = lookup("GENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = GenAiTimeouts {
            request_secs: parse_u64(&lookup, "GENAI_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "GENAI_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_key, image_model, text_model, base_url, timeouts })
    }
}

fn parse_u64(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, GenAiError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    raw.parse::<u64>()
        .map_err(|_| GenAiError::ConfigParse(format!("{key} must be an integer, got {raw:?}")))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
